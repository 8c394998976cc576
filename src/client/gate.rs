//! Route table, auth gate and role-based menu.
//!
//! The gate only decides what the client shows. Every protected operation is
//! authorized again by the backend.

use reqwest::Url;
use uuid::Uuid;

use crate::{
    client::{
        Bazaar,
        session::{ProfileSync, SessionSnapshot},
    },
    models::Role,
};

const LOGIN_PATH: &str = "/login";
const DEFAULT_TARGET: &str = "/";
const LOCAL_ORIGIN: &str = "http://localhost";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DashboardView {
    Overview,
    Profile,
    MyOrders,
    MyReviews,
    Favorites,
    CreateMeal,
    MyMeals,
    OrderRequests,
    ManageUsers,
    ManageRequests,
    Statistics,
}

impl DashboardView {
    pub const ALL: [DashboardView; 11] = [
        DashboardView::Overview,
        DashboardView::Profile,
        DashboardView::MyOrders,
        DashboardView::MyReviews,
        DashboardView::Favorites,
        DashboardView::CreateMeal,
        DashboardView::MyMeals,
        DashboardView::OrderRequests,
        DashboardView::ManageUsers,
        DashboardView::ManageRequests,
        DashboardView::Statistics,
    ];

    fn segment(&self) -> &'static str {
        match self {
            DashboardView::Overview => "",
            DashboardView::Profile => "profile",
            DashboardView::MyOrders => "my-orders",
            DashboardView::MyReviews => "my-reviews",
            DashboardView::Favorites => "favorites",
            DashboardView::CreateMeal => "create-meal",
            DashboardView::MyMeals => "my-meals",
            DashboardView::OrderRequests => "order-requests",
            DashboardView::ManageUsers => "manage-users",
            DashboardView::ManageRequests => "manage-requests",
            DashboardView::Statistics => "statistics",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DashboardView::Overview => "Dashboard",
            DashboardView::Profile => "My Profile",
            DashboardView::MyOrders => "My Orders",
            DashboardView::MyReviews => "My Reviews",
            DashboardView::Favorites => "Favorite Meals",
            DashboardView::CreateMeal => "Create Meal",
            DashboardView::MyMeals => "My Meals",
            DashboardView::OrderRequests => "Order Requests",
            DashboardView::ManageUsers => "Manage Users",
            DashboardView::ManageRequests => "Manage Requests",
            DashboardView::Statistics => "Platform Statistics",
        }
    }

    pub fn path(&self) -> String {
        match self.segment() {
            "" => "/dashboard".to_string(),
            segment => format!("/dashboard/{segment}"),
        }
    }

    /// `None` means every signed-in role may open the view.
    pub fn required_role(&self) -> Option<Role> {
        match self {
            DashboardView::Overview | DashboardView::Profile => None,
            DashboardView::MyOrders | DashboardView::MyReviews | DashboardView::Favorites => {
                Some(Role::User)
            }
            DashboardView::CreateMeal | DashboardView::MyMeals | DashboardView::OrderRequests => {
                Some(Role::Chef)
            }
            DashboardView::ManageUsers
            | DashboardView::ManageRequests
            | DashboardView::Statistics => Some(Role::Admin),
        }
    }

    pub fn visible_to(&self, role: Role) -> bool {
        self.required_role().is_none_or(|required| required == role)
    }

    fn from_segment(segment: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.segment() == segment)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Meals,
    MealDetail(Uuid),
    Order(Uuid),
    Login,
    Register,
    Dashboard(DashboardView),
    NotFound,
}

impl Route {
    /// Query string and trailing slash are ignored.
    pub fn parse(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let path = path.trim_end_matches('/');
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Route::Home,
            ["meals"] => Route::Meals,
            ["meal", id] => parse_id(id).map_or(Route::NotFound, Route::MealDetail),
            ["order", id] => parse_id(id).map_or(Route::NotFound, Route::Order),
            ["login"] => Route::Login,
            ["register"] => Route::Register,
            ["dashboard"] => Route::Dashboard(DashboardView::Overview),
            ["dashboard", view] => DashboardView::from_segment(view)
                .filter(|v| *v != DashboardView::Overview)
                .map_or(Route::NotFound, Route::Dashboard),
            _ => Route::NotFound,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Meals => "/meals".to_string(),
            Route::MealDetail(id) => format!("/meal/{id}"),
            Route::Order(id) => format!("/order/{id}"),
            Route::Login => LOGIN_PATH.to_string(),
            Route::Register => "/register".to_string(),
            Route::Dashboard(view) => view.path(),
            Route::NotFound => "/404".to_string(),
        }
    }

    pub fn is_protected(&self) -> bool {
        matches!(
            self,
            Route::MealDetail(_) | Route::Order(_) | Route::Dashboard(_)
        )
    }

    /// Routes closed to accounts flagged as fraud.
    pub fn checks_standing(&self) -> bool {
        matches!(
            self,
            Route::Order(_) | Route::Dashboard(DashboardView::CreateMeal)
        )
    }
}

fn parse_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw).ok()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// The session has not settled yet; show a spinner, never redirect.
    Loading,
    Redirect { to: String },
    Render,
    Forbidden,
    Blocked { reason: String },
}

pub const FRAUD_BLOCKED: &str = "Your account has been flagged. Contact support to continue.";
pub const PROFILE_UNVERIFIED: &str = "We could not load your account. Please try again.";

/// Decides what to show for `route`. `role` should come from the role
/// resolver; the fraud check reads the profile on the snapshot, and a route
/// that checks standing never renders without one.
pub fn authorize(route: &Route, snapshot: &SessionSnapshot, role: Role) -> GateDecision {
    if !route.is_protected() {
        return GateDecision::Render;
    }
    if snapshot.loading() {
        return GateDecision::Loading;
    }
    if !snapshot.is_authenticated() {
        return GateDecision::Redirect {
            to: login_redirect(&route.path()),
        };
    }

    if let Route::Dashboard(view) = route {
        if !view.visible_to(role) {
            return GateDecision::Forbidden;
        }
    }
    if !route.checks_standing() {
        return GateDecision::Render;
    }

    match (&snapshot.profile, &snapshot.profile_sync) {
        (_, Some(ProfileSync::Pending)) => GateDecision::Loading,
        (Some(profile), _) if profile.is_fraud() => GateDecision::Blocked {
            reason: FRAUD_BLOCKED.to_string(),
        },
        (Some(_), _) => GateDecision::Render,
        (None, _) => GateDecision::Blocked {
            reason: PROFILE_UNVERIFIED.to_string(),
        },
    }
}

impl Bazaar {
    /// [`authorize`] against the live session. For routes that check standing
    /// the profile is read again from the backend first, so a flag raised
    /// during this session applies on the next navigation.
    pub async fn gate(&self, route: &Route) -> GateDecision {
        let role = self.current_role().await;
        let snapshot = self.session().snapshot();
        if !(route.checks_standing() && snapshot.is_authenticated()) {
            return authorize(route, &snapshot, role);
        }

        match self.session().refresh_profile().await {
            Ok(_) => authorize(route, &self.session().snapshot(), role),
            Err(err) if snapshot.profile_sync == Some(ProfileSync::Pending) => {
                tracing::debug!(error = %err, "profile not available yet");
                GateDecision::Loading
            }
            Err(err) => {
                tracing::warn!(error = %err, route = %route.path(), "profile check failed");
                GateDecision::Blocked {
                    reason: PROFILE_UNVERIFIED.to_string(),
                }
            }
        }
    }
}

/// `/login?from=<path>`.
pub fn login_redirect(from: &str) -> String {
    match Url::parse_with_params(&format!("{LOCAL_ORIGIN}{LOGIN_PATH}"), &[("from", from)]) {
        Ok(url) => format!("{LOGIN_PATH}?{}", url.query().unwrap_or_default()),
        Err(_) => LOGIN_PATH.to_string(),
    }
}

/// Destination to open after a successful login, read from the login page's
/// query string. Anything that is not a local path falls back to `/`.
pub fn resume_target(query: &str) -> String {
    let query = query.trim_start_matches('?');
    Url::parse(&format!("{LOCAL_ORIGIN}{LOGIN_PATH}?{query}"))
        .ok()
        .and_then(|url| {
            url.query_pairs()
                .find(|(name, _)| name == "from")
                .map(|(_, value)| value.into_owned())
        })
        .filter(|target| is_local_path(target))
        .unwrap_or_else(|| DEFAULT_TARGET.to_string())
}

fn is_local_path(target: &str) -> bool {
    target.starts_with('/') && !target.starts_with("//") && !target.contains('\\')
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub view: DashboardView,
    pub label: &'static str,
    pub path: String,
}

/// Dashboard navigation: the common profile entry followed by the items of
/// `role`.
pub fn menu_for(role: Role) -> Vec<MenuItem> {
    DashboardView::ALL
        .into_iter()
        .filter(|v| *v != DashboardView::Overview)
        .filter(|v| v.visible_to(role))
        .map(|view| MenuItem {
            view,
            label: view.label(),
            path: view.path(),
        })
        .collect()
}
