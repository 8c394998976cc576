mod common;

use chrono::Utc;
use local_chef_bazaar::{
    client::{
        error::ClientError,
        gate::{
            DashboardView, FRAUD_BLOCKED, GateDecision, PROFILE_UNVERIFIED, Route, authorize,
            login_redirect, menu_for, resume_target,
        },
        identity::IdentityUser,
        screens::{
            dashboard::{Dashboard, DashboardContent},
            order::OrderScreen,
        },
        session::{AuthState, ProfileSync, SessionSnapshot},
    },
    dto::orders::PlaceOrderRequest,
    models::{Role, User, UserStatus},
};
use uuid::Uuid;

fn signed_in(status: UserStatus) -> SessionSnapshot {
    let now = Utc::now();
    SessionSnapshot {
        auth: AuthState::Authenticated(IdentityUser {
            uid: "uid-1".to_string(),
            email: "sam@bazaar.test".to_string(),
            display_name: "Sam".to_string(),
            photo_url: None,
            provider_id: "password".to_string(),
        }),
        profile: Some(User {
            email: "sam@bazaar.test".to_string(),
            name: "Sam".to_string(),
            photo_url: None,
            address: None,
            phone: None,
            role: Role::User,
            status,
            chef_id: None,
            created_at: now,
            last_login_at: now,
        }),
        profile_sync: Some(ProfileSync::Synced),
    }
}

fn anonymous() -> SessionSnapshot {
    SessionSnapshot {
        auth: AuthState::Anonymous,
        ..SessionSnapshot::unknown()
    }
}

#[test]
fn parses_paths_into_routes() {
    let id = Uuid::new_v4();
    assert_eq!(Route::parse("/"), Route::Home);
    assert_eq!(Route::parse("/meals?search=rice"), Route::Meals);
    assert_eq!(Route::parse(&format!("/meal/{id}")), Route::MealDetail(id));
    assert_eq!(Route::parse(&format!("/order/{id}/")), Route::Order(id));
    assert_eq!(Route::parse("/order/not-a-uuid"), Route::NotFound);
    assert_eq!(
        Route::parse("/dashboard"),
        Route::Dashboard(DashboardView::Overview)
    );
    assert_eq!(
        Route::parse("/dashboard/manage-users"),
        Route::Dashboard(DashboardView::ManageUsers)
    );
    assert_eq!(Route::parse("/dashboard/unknown"), Route::NotFound);
    assert_eq!(Route::parse("/somewhere/else"), Route::NotFound);

    for view in DashboardView::ALL {
        assert_eq!(Route::parse(&view.path()), Route::Dashboard(view));
    }
}

#[test]
fn loading_session_never_redirects() {
    let route = Route::Dashboard(DashboardView::Profile);
    assert_eq!(
        authorize(&route, &SessionSnapshot::unknown(), Role::User),
        GateDecision::Loading
    );
    assert_eq!(
        authorize(&Route::Meals, &SessionSnapshot::unknown(), Role::User),
        GateDecision::Render
    );
}

#[test]
fn anonymous_visitors_are_sent_to_login_and_can_resume() {
    let id = Uuid::new_v4();
    let route = Route::MealDetail(id);
    let decision = authorize(&route, &anonymous(), Role::User);

    let GateDecision::Redirect { to } = decision else {
        panic!("expected a redirect");
    };
    assert_eq!(to, login_redirect(&format!("/meal/{id}")));
    assert!(to.starts_with("/login?from="));

    let query = to.split_once('?').map(|(_, q)| q).unwrap_or_default();
    assert_eq!(resume_target(query), format!("/meal/{id}"));
}

#[test]
fn resume_target_only_accepts_local_paths() {
    assert_eq!(resume_target(""), "/");
    assert_eq!(resume_target("from=https%3A%2F%2Fevil.test"), "/");
    assert_eq!(resume_target("from=%2F%2Fevil.test"), "/");
    assert_eq!(
        resume_target("?from=%2Fdashboard%2Fmy-orders"),
        "/dashboard/my-orders"
    );
}

#[test]
fn dashboard_views_are_checked_against_the_role() {
    let snapshot = signed_in(UserStatus::Active);
    let stats = Route::Dashboard(DashboardView::Statistics);
    assert_eq!(authorize(&stats, &snapshot, Role::User), GateDecision::Forbidden);
    assert_eq!(authorize(&stats, &snapshot, Role::Admin), GateDecision::Render);

    let profile = Route::Dashboard(DashboardView::Profile);
    for role in [Role::User, Role::Chef, Role::Admin] {
        assert_eq!(authorize(&profile, &snapshot, role), GateDecision::Render);
    }
}

#[test]
fn fraud_users_are_blocked_from_ordering_and_creating_meals() {
    let snapshot = signed_in(UserStatus::Fraud);
    let blocked = GateDecision::Blocked {
        reason: FRAUD_BLOCKED.to_string(),
    };
    assert_eq!(
        authorize(&Route::Order(Uuid::new_v4()), &snapshot, Role::User),
        blocked
    );
    assert_eq!(
        authorize(
            &Route::Dashboard(DashboardView::CreateMeal),
            &snapshot,
            Role::Chef
        ),
        blocked
    );
    assert_eq!(
        authorize(&Route::Dashboard(DashboardView::MyOrders), &snapshot, Role::User),
        GateDecision::Render
    );

    let mut syncing = signed_in(UserStatus::Active);
    syncing.profile = None;
    syncing.profile_sync = Some(ProfileSync::Pending);
    assert_eq!(
        authorize(&Route::Order(Uuid::new_v4()), &syncing, Role::User),
        GateDecision::Loading
    );
}

#[test]
fn ordering_without_a_profile_is_blocked() {
    let unverified = GateDecision::Blocked {
        reason: PROFILE_UNVERIFIED.to_string(),
    };

    let mut failed = signed_in(UserStatus::Active);
    failed.profile = None;
    failed.profile_sync = Some(ProfileSync::Failed("backend unavailable".to_string()));
    assert_eq!(
        authorize(&Route::Order(Uuid::new_v4()), &failed, Role::User),
        unverified
    );
    assert_eq!(
        authorize(
            &Route::Dashboard(DashboardView::CreateMeal),
            &failed,
            Role::Chef
        ),
        unverified
    );
    // Views that do not depend on standing still open.
    assert_eq!(
        authorize(&Route::Dashboard(DashboardView::MyOrders), &failed, Role::User),
        GateDecision::Render
    );
}

#[test]
fn menu_is_common_items_plus_role_items() {
    let labels = |role| {
        menu_for(role)
            .into_iter()
            .map(|item| item.label)
            .collect::<Vec<_>>()
    };
    assert_eq!(
        labels(Role::User),
        ["My Profile", "My Orders", "My Reviews", "Favorite Meals"]
    );
    assert_eq!(
        labels(Role::Chef),
        ["My Profile", "Create Meal", "My Meals", "Order Requests"]
    );
    assert_eq!(
        labels(Role::Admin),
        [
            "My Profile",
            "Manage Users",
            "Manage Requests",
            "Platform Statistics"
        ]
    );
}

#[tokio::test]
async fn flagged_customer_cannot_reach_or_submit_an_order() -> anyhow::Result<()> {
    let server = common::spawn_backend().await;
    let admin = common::admin(&server).await;
    let chef = common::chef(&server, &admin, "Maria", "maria@bazaar.test").await;
    let customer = common::signed_up(&server, "Sam", "sam@bazaar.test").await;
    let meal = common::create_meal(&chef, "Pasta Alfredo", 250).await;

    let flagged = admin.flag_fraud("sam@bazaar.test").await?;
    assert_eq!(flagged.status, UserStatus::Fraud);

    let screen = OrderScreen::open(&customer, meal.id).await;
    assert_eq!(
        screen.decision,
        GateDecision::Blocked {
            reason: FRAUD_BLOCKED.to_string()
        }
    );
    assert!(screen.form.is_none());

    let err = customer
        .place_order(&PlaceOrderRequest {
            meal_id: meal.id,
            quantity: 1,
            address: "Road 1".to_string(),
        })
        .await
        .expect_err("backend refuses fraud customers");
    assert_eq!(err.status(), Some(403));

    let err = admin
        .flag_fraud(common::ADMIN_EMAIL)
        .await
        .expect_err("admins cannot be flagged");
    assert_eq!(err.status(), Some(400));
    Ok(())
}

#[tokio::test]
async fn dashboard_loads_views_per_role() -> anyhow::Result<()> {
    let server = common::spawn_backend().await;
    let admin = common::admin(&server).await;
    let customer = common::signed_up(&server, "Sam", "sam@bazaar.test").await;

    let dashboard = Dashboard::open(&customer).await;
    assert_eq!(dashboard.role, Role::User);
    assert_eq!(
        dashboard.view(&customer, DashboardView::ManageUsers).await,
        DashboardContent::Gated(GateDecision::Forbidden)
    );
    let DashboardContent::MyOrders(orders) =
        dashboard.view(&customer, DashboardView::MyOrders).await
    else {
        panic!("expected my orders view");
    };
    assert_eq!(orders.ready().map(Vec::len), Some(0));

    let dashboard = Dashboard::open(&admin).await;
    let DashboardContent::ManageUsers(users) = dashboard.view(&admin, DashboardView::ManageUsers).await
    else {
        panic!("expected manage users view");
    };
    assert_eq!(users.ready().map(Vec::len), Some(2));
    Ok(())
}

#[tokio::test]
async fn flag_raised_mid_session_applies_on_next_navigation() -> anyhow::Result<()> {
    let server = common::spawn_backend().await;
    let admin = common::admin(&server).await;
    let chef = common::chef(&server, &admin, "Maria", "maria@bazaar.test").await;
    let customer = common::signed_up(&server, "Sam", "sam@bazaar.test").await;
    let meal = common::create_meal(&chef, "Pasta Alfredo", 250).await;

    let mut screen = OrderScreen::open(&customer, meal.id).await;
    assert_eq!(screen.decision, GateDecision::Render);
    if let Some(form) = screen.form.as_mut() {
        form.address = "House 4, Road 2".to_string();
    }

    admin.flag_fraud("sam@bazaar.test").await?;
    // The session still holds the profile synced at sign-in.
    let stale = customer.session().snapshot().profile.expect("synced profile");
    assert_eq!(stale.status, UserStatus::Active);

    let err = screen
        .submit(&customer)
        .await
        .expect_err("submit re-checks standing");
    let ClientError::Validation(errors) = err else {
        panic!("expected a validation error");
    };
    assert_eq!(errors.get("account"), Some(FRAUD_BLOCKED));

    let reopened = OrderScreen::open(&customer, meal.id).await;
    assert_eq!(
        reopened.decision,
        GateDecision::Blocked {
            reason: FRAUD_BLOCKED.to_string()
        }
    );
    assert!(reopened.form.is_none());

    admin.flag_fraud("maria@bazaar.test").await?;
    let dashboard = Dashboard::open(&chef).await;
    assert_eq!(
        dashboard.view(&chef, DashboardView::CreateMeal).await,
        DashboardContent::Gated(GateDecision::Blocked {
            reason: FRAUD_BLOCKED.to_string()
        })
    );
    Ok(())
}
