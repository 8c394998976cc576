mod common;

use local_chef_bazaar::client::{api::favorites::FavoriteOutcome, screens::meal_detail::MealDetailScreen};

#[tokio::test]
async fn favoriting_twice_keeps_one_record() -> anyhow::Result<()> {
    let server = common::spawn_backend().await;
    let admin = common::admin(&server).await;
    let chef = common::chef(&server, &admin, "Maria", "maria@bazaar.test").await;
    let customer = common::signed_up(&server, "Sam", "sam@bazaar.test").await;
    let meal = common::create_meal(&chef, "Vegetable Khichuri", 180).await;

    let mut screen = MealDetailScreen::load(&customer, meal.id).await;
    let first = screen.add_to_favorites(&customer).await?;
    assert!(matches!(first, FavoriteOutcome::Added(ref f) if f.meal_id == meal.id));

    let second = screen.add_to_favorites(&customer).await?;
    assert_eq!(second, FavoriteOutcome::AlreadyAdded);
    assert_eq!(screen.notice.as_deref(), Some("Already added to favorites"));

    let favorites = customer.favorites().await?;
    assert_eq!(favorites.len(), 1);
    assert_eq!(favorites[0].meal_name, "Vegetable Khichuri");
    assert_eq!(favorites[0].price, 180);

    customer.remove_favorite(favorites[0].id).await?;
    assert!(customer.favorites().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn favorites_of_someone_else_cannot_be_removed() -> anyhow::Result<()> {
    let server = common::spawn_backend().await;
    let admin = common::admin(&server).await;
    let chef = common::chef(&server, &admin, "Maria", "maria@bazaar.test").await;
    let owner = common::signed_up(&server, "Sam", "sam@bazaar.test").await;
    let other = common::signed_up(&server, "Lee", "lee@bazaar.test").await;
    let meal = common::create_meal(&chef, "Beef Tehari", 300).await;

    let FavoriteOutcome::Added(favorite) = owner.add_favorite(meal.id).await? else {
        panic!("first add should succeed");
    };
    let err = other
        .remove_favorite(favorite.id)
        .await
        .expect_err("not the owner");
    assert_eq!(err.status(), Some(403));
    Ok(())
}
