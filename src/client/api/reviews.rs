use reqwest::Method;
use uuid::Uuid;

use crate::{
    client::{
        Bazaar,
        cache::{CacheKey, keys},
        error::ClientResult,
    },
    dto::reviews::{CreateReviewRequest, ReviewList, UpdateReviewRequest},
    models::Review,
};

pub fn reviews_key(meal_id: Uuid) -> CacheKey {
    CacheKey::new(keys::REVIEWS).with(meal_id)
}

pub fn recent_reviews_key() -> CacheKey {
    CacheKey::new(keys::RECENT_REVIEWS)
}

impl Bazaar {
    pub async fn reviews(&self, meal_id: Uuid) -> ClientResult<Vec<Review>> {
        let api = self.api().clone();
        self.cache()
            .fetch(reviews_key(meal_id), move || async move {
                let list: ReviewList = api.get(&format!("/reviews/{meal_id}")).await?;
                Ok(list.items)
            })
            .await
    }

    pub async fn recent_reviews(&self) -> ClientResult<Vec<Review>> {
        let api = self.api().clone();
        self.cache()
            .fetch(recent_reviews_key(), move || async move {
                let list: ReviewList = api.get("/recent-reviews").await?;
                Ok(list.items)
            })
            .await
    }

    pub async fn my_reviews(&self) -> ClientResult<Vec<Review>> {
        let email = self.require_email()?;
        let api = self.api().clone();
        let path = format!("/reviews/user/{email}");
        self.cache()
            .fetch(CacheKey::new(keys::MY_REVIEWS).with(email), move || async move {
                let list: ReviewList = api.get(&path).await?;
                Ok(list.items)
            })
            .await
    }

    pub async fn add_review(&self, request: &CreateReviewRequest) -> ClientResult<Review> {
        let review: Review = self.api().send(Method::POST, "/reviews", request).await?;
        self.invalidate_reviews(review.meal_id);
        Ok(review)
    }

    pub async fn update_review(
        &self,
        id: Uuid,
        request: &UpdateReviewRequest,
    ) -> ClientResult<Review> {
        let review: Review = self
            .api()
            .send(Method::PUT, &format!("/reviews/{id}"), request)
            .await?;
        self.invalidate_reviews(review.meal_id);
        Ok(review)
    }

    pub async fn delete_review(&self, id: Uuid) -> ClientResult<()> {
        let removed: Review = self.api().delete(&format!("/reviews/{id}")).await?;
        self.invalidate_reviews(removed.meal_id);
        Ok(())
    }

    // Ratings are recomputed server-side, so the meal itself goes stale too.
    fn invalidate_reviews(&self, meal_id: Uuid) {
        let cache = self.cache();
        cache.invalidate(&reviews_key(meal_id));
        cache.invalidate(&recent_reviews_key());
        cache.invalidate_resource(keys::MY_REVIEWS);
        cache.invalidate(&super::meals::meal_key(meal_id));
        cache.invalidate_resource(keys::MEALS);
    }
}
