mod common;

use local_chef_bazaar::{
    client::{api::requests::ALREADY_PENDING, screens::dashboard::Dashboard},
    models::{RequestStatus, Role},
};

#[tokio::test]
async fn second_request_while_pending_is_refused() -> anyhow::Result<()> {
    let server = common::spawn_backend().await;
    let admin = common::admin(&server).await;
    let user = common::signed_up(&server, "Sam", "sam@bazaar.test").await;

    let request = user.request_role(Role::Chef).await?;
    assert_eq!(request.status, RequestStatus::Pending);

    let err = user
        .request_role(Role::Admin)
        .await
        .expect_err("one pending request at a time");
    assert_eq!(err.status(), Some(400));
    assert_eq!(err.user_message(), ALREADY_PENDING);

    let pending = admin.role_requests().await?;
    assert_eq!(pending.len(), 1);

    let rejected = admin
        .resolve_role_request(request.id, RequestStatus::Rejected)
        .await?;
    assert_eq!(rejected.status, RequestStatus::Rejected);
    assert_eq!(user.current_role().await, Role::User);

    // Resolved requests no longer block a new one.
    user.request_role(Role::Chef).await?;
    Ok(())
}

#[tokio::test]
async fn backend_refusals_reach_the_user_verbatim() -> anyhow::Result<()> {
    let server = common::spawn_backend().await;
    let admin = common::admin(&server).await;
    let chef = common::chef(&server, &admin, "Maria", "maria@bazaar.test").await;

    let err = chef
        .request_role(Role::Chef)
        .await
        .expect_err("already a chef");
    assert_eq!(err.status(), Some(400));
    assert_eq!(err.user_message(), "You are already chef");

    let err = chef
        .request_role(Role::User)
        .await
        .expect_err("user is not requestable");
    assert_eq!(err.user_message(), "Only chef or admin can be requested");
    assert!(admin.role_requests().await?.iter().all(|r| r.status != RequestStatus::Pending));
    Ok(())
}

#[tokio::test]
async fn approval_switches_role_and_menu() -> anyhow::Result<()> {
    let server = common::spawn_backend().await;
    let admin = common::admin(&server).await;
    let chef = common::chef(&server, &admin, "Maria", "maria@bazaar.test").await;

    let profile = chef.profile().await?;
    assert_eq!(profile.role, Role::Chef);
    assert!(profile.chef_id.is_some());

    let dashboard = Dashboard::open(&chef).await;
    assert!(dashboard.menu.iter().any(|item| item.label == "Create Meal"));

    let users = admin.users().await?;
    assert!(users.iter().any(|u| u.email == "maria@bazaar.test" && u.role == Role::Chef));
    Ok(())
}

#[tokio::test]
async fn non_admins_cannot_list_requests() -> anyhow::Result<()> {
    let server = common::spawn_backend().await;
    let user = common::signed_up(&server, "Sam", "sam@bazaar.test").await;

    let err = user.role_requests().await.expect_err("admin only");
    assert_eq!(err.status(), Some(403));
    Ok(())
}
