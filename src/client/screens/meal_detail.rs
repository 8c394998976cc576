use uuid::Uuid;

use crate::{
    client::{
        Bazaar,
        api::favorites::FavoriteOutcome,
        error::ClientResult,
        gate::Route,
        screens::Loadable,
        validation::ReviewForm,
    },
    models::{Meal, Review},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetailTab {
    #[default]
    Details,
    Reviews,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MealDetailScreen {
    pub meal_id: Uuid,
    pub meal: Loadable<Meal>,
    pub reviews: Loadable<Vec<Review>>,
    pub tab: DetailTab,
    pub review_form: ReviewForm,
    /// Last toast-style message, e.g. after adding a favorite.
    pub notice: Option<String>,
}

impl MealDetailScreen {
    /// Meal and reviews are fetched concurrently.
    pub async fn load(bazaar: &Bazaar, meal_id: Uuid) -> Self {
        let (meal, reviews) = tokio::join!(bazaar.meal(meal_id), bazaar.reviews(meal_id));
        Self {
            meal_id,
            meal: meal.into(),
            reviews: reviews.into(),
            tab: DetailTab::default(),
            review_form: ReviewForm::default(),
            notice: None,
        }
    }

    pub fn select_tab(&mut self, tab: DetailTab) {
        self.tab = tab;
    }

    pub fn review_count(&self) -> usize {
        self.reviews.ready().map_or(0, Vec::len)
    }

    pub fn order_path(&self) -> String {
        Route::Order(self.meal_id).path()
    }

    /// Posts the review form, then reloads the meal (its rating changed) and
    /// the review list.
    pub async fn submit_review(&mut self, bazaar: &Bazaar) -> ClientResult<Review> {
        let request = self.review_form.to_create(self.meal_id)?;
        let review = bazaar.add_review(&request).await?;

        self.review_form = ReviewForm::default();
        self.notice = Some("Review submitted".to_string());
        let (meal, reviews) = tokio::join!(bazaar.meal(self.meal_id), bazaar.reviews(self.meal_id));
        self.meal = meal.into();
        self.reviews = reviews.into();
        self.tab = DetailTab::Reviews;
        Ok(review)
    }

    pub async fn add_to_favorites(&mut self, bazaar: &Bazaar) -> ClientResult<FavoriteOutcome> {
        let outcome = bazaar.add_favorite(self.meal_id).await?;
        self.notice = Some(outcome.message().to_string());
        Ok(outcome)
    }
}
