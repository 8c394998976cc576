mod common;

use local_chef_bazaar::{
    client::{
        api::reviews::{recent_reviews_key, reviews_key},
        error::ClientError,
        screens::meal_detail::{DetailTab, MealDetailScreen},
        validation::ReviewForm,
    },
    models::Review,
};

#[tokio::test]
async fn submitting_a_review_refreshes_lists_and_rating() -> anyhow::Result<()> {
    let server = common::spawn_backend().await;
    let admin = common::admin(&server).await;
    let chef = common::chef(&server, &admin, "Maria", "maria@bazaar.test").await;
    let customer = common::signed_up(&server, "Sam", "sam@bazaar.test").await;
    let meal = common::create_meal(&chef, "Pasta Alfredo", 250).await;

    let mut screen = MealDetailScreen::load(&customer, meal.id).await;
    assert_eq!(screen.review_count(), 0);
    assert!(customer.recent_reviews().await?.is_empty());
    assert!(
        customer
            .cache()
            .peek::<Vec<Review>>(&recent_reviews_key())
            .is_some()
    );

    screen.review_form = ReviewForm {
        rating: 4,
        comment: "Creamy and generous".to_string(),
    };
    let review = screen.submit_review(&customer).await?;

    assert_eq!(screen.tab, DetailTab::Reviews);
    assert_eq!(screen.review_count(), 1);
    assert_eq!(screen.review_form, ReviewForm::default());
    assert_eq!(screen.meal.ready().map(|m| m.rating), Some(4.0));
    assert!(
        customer
            .cache()
            .peek::<Vec<Review>>(&recent_reviews_key())
            .is_none()
    );

    let recent = customer.recent_reviews().await?;
    assert_eq!(recent.first().map(|r| r.id), Some(review.id));
    assert_eq!(customer.my_reviews().await?.len(), 1);

    customer.delete_review(review.id).await?;
    assert!(
        customer
            .cache()
            .peek::<Vec<Review>>(&reviews_key(meal.id))
            .is_none()
    );
    assert!(customer.reviews(meal.id).await?.is_empty());
    assert_eq!(customer.meal(meal.id).await?.rating, 0.0);
    Ok(())
}

#[tokio::test]
async fn invalid_review_is_stopped_client_side() -> anyhow::Result<()> {
    let server = common::spawn_backend().await;
    let admin = common::admin(&server).await;
    let chef = common::chef(&server, &admin, "Maria", "maria@bazaar.test").await;
    let customer = common::signed_up(&server, "Sam", "sam@bazaar.test").await;
    let meal = common::create_meal(&chef, "Pasta Alfredo", 250).await;

    let mut screen = MealDetailScreen::load(&customer, meal.id).await;
    screen.review_form = ReviewForm {
        rating: 6,
        comment: "  ".to_string(),
    };
    let err = screen
        .submit_review(&customer)
        .await
        .expect_err("invalid form");
    let ClientError::Validation(errors) = err else {
        panic!("expected validation errors");
    };
    assert!(errors.get("rating").is_some());
    assert_eq!(errors.get("comment"), Some("Comment is required"));
    assert!(customer.reviews(meal.id).await?.is_empty());
    Ok(())
}
