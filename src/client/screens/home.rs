use crate::{
    client::{Bazaar, screens::Loadable},
    dto::params::MealListQuery,
    models::{Meal, Review},
};

pub const HOME_MEALS_PAGE_SIZE: i64 = 6;

#[derive(Debug, Clone, PartialEq)]
pub struct HomeScreen {
    pub meals: Loadable<Vec<Meal>>,
    pub recent_reviews: Loadable<Vec<Review>>,
}

impl HomeScreen {
    /// Loads the first page of meals and the review feed concurrently.
    pub async fn load(bazaar: &Bazaar) -> Self {
        let query = MealListQuery {
            page: Some(1),
            limit: Some(HOME_MEALS_PAGE_SIZE),
            ..Default::default()
        };
        let (meals, reviews) = tokio::join!(bazaar.meals(query), bazaar.recent_reviews());
        Self {
            meals: Loadable::from(meals).map(|page| page.items),
            recent_reviews: reviews.into(),
        }
    }
}
