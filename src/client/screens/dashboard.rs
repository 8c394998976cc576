use crate::{
    client::{
        Bazaar,
        gate::{self, DashboardView, GateDecision, MenuItem, Route},
        screens::Loadable,
    },
    models::{AdminStats, Favorite, Meal, Order, Review, Role, RoleRequest, User},
};

#[derive(Debug, Clone, PartialEq)]
pub enum DashboardContent {
    /// Not rendered: still loading, signed out, wrong role or blocked.
    Gated(GateDecision),
    Overview { role: Role },
    Profile(Loadable<User>),
    MyOrders(Loadable<Vec<Order>>),
    MyReviews(Loadable<Vec<Review>>),
    Favorites(Loadable<Vec<Favorite>>),
    CreateMeal,
    MyMeals(Loadable<Vec<Meal>>),
    OrderRequests(Loadable<Vec<Order>>),
    ManageUsers(Loadable<Vec<User>>),
    ManageRequests(Loadable<Vec<RoleRequest>>),
    Statistics(Loadable<AdminStats>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub role: Role,
    pub menu: Vec<MenuItem>,
}

impl Dashboard {
    pub async fn open(bazaar: &Bazaar) -> Self {
        let role = bazaar.current_role().await;
        Self {
            role,
            menu: gate::menu_for(role),
        }
    }

    /// Loads one dashboard view after checking it against the caller's
    /// current role.
    pub async fn view(&self, bazaar: &Bazaar, view: DashboardView) -> DashboardContent {
        let decision = bazaar.gate(&Route::Dashboard(view)).await;
        if decision != GateDecision::Render {
            tracing::debug!(view = view.label(), ?decision, "dashboard view gated");
            return DashboardContent::Gated(decision);
        }

        match view {
            DashboardView::Overview => DashboardContent::Overview { role: self.role },
            DashboardView::Profile => DashboardContent::Profile(bazaar.profile().await.into()),
            DashboardView::MyOrders => DashboardContent::MyOrders(bazaar.my_orders().await.into()),
            DashboardView::MyReviews => {
                DashboardContent::MyReviews(bazaar.my_reviews().await.into())
            }
            DashboardView::Favorites => {
                DashboardContent::Favorites(bazaar.favorites().await.into())
            }
            DashboardView::CreateMeal => DashboardContent::CreateMeal,
            DashboardView::MyMeals => DashboardContent::MyMeals(bazaar.chef_meals().await.into()),
            DashboardView::OrderRequests => {
                DashboardContent::OrderRequests(bazaar.chef_orders().await.into())
            }
            DashboardView::ManageUsers => DashboardContent::ManageUsers(bazaar.users().await.into()),
            DashboardView::ManageRequests => {
                DashboardContent::ManageRequests(bazaar.role_requests().await.into())
            }
            DashboardView::Statistics => {
                DashboardContent::Statistics(bazaar.admin_stats().await.into())
            }
        }
    }
}
