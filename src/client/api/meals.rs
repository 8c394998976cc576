use reqwest::Method;
use uuid::Uuid;

use crate::{
    client::{
        Bazaar,
        api::Page,
        cache::{CacheKey, keys},
        error::ClientResult,
    },
    dto::{
        meals::{CreateMealRequest, MealList, UpdateMealRequest},
        params::MealListQuery,
    },
    models::Meal,
};

pub fn meals_key(query: &MealListQuery) -> CacheKey {
    let (page, limit, _) = query.pagination().normalize();
    CacheKey::new(keys::MEALS)
        .with(page)
        .with(limit)
        .with(query.search_term().unwrap_or_default())
        .with(query.sort.map(|s| s.as_str()).unwrap_or_default())
}

pub fn meal_key(id: Uuid) -> CacheKey {
    CacheKey::new(keys::MEAL).with(id)
}

impl Bazaar {
    /// Filtering, sorting and paging all happen on the backend.
    pub async fn meals(&self, query: MealListQuery) -> ClientResult<Page<Meal>> {
        let api = self.api().clone();
        self.cache()
            .fetch(meals_key(&query), move || async move {
                let (list, meta): (MealList, _) = api.get_page("/meals", &query).await?;
                Ok(Page::from_meta(list.items, &meta, query.pagination()))
            })
            .await
    }

    pub async fn meal(&self, id: Uuid) -> ClientResult<Meal> {
        let api = self.api().clone();
        self.cache()
            .fetch(meal_key(id), move || async move {
                api.get(&format!("/meal/{id}")).await
            })
            .await
    }

    pub async fn chef_meals(&self) -> ClientResult<Vec<Meal>> {
        let email = self.require_email()?;
        let api = self.api().clone();
        let path = format!("/meals/chef/{email}");
        self.cache()
            .fetch(CacheKey::new(keys::CHEF_MEALS).with(email), move || async move {
                let list: MealList = api.get(&path).await?;
                Ok(list.items)
            })
            .await
    }

    pub async fn create_meal(&self, request: &CreateMealRequest) -> ClientResult<Meal> {
        let meal: Meal = self.api().send(Method::POST, "/meals", request).await?;
        self.invalidate_meal(meal.id);
        Ok(meal)
    }

    pub async fn update_meal(&self, id: Uuid, request: &UpdateMealRequest) -> ClientResult<Meal> {
        let meal: Meal = self
            .api()
            .send(Method::PATCH, &format!("/meals/{id}"), request)
            .await?;
        self.invalidate_meal(id);
        Ok(meal)
    }

    pub async fn delete_meal(&self, id: Uuid) -> ClientResult<()> {
        let _: serde_json::Value = self.api().delete(&format!("/meals/{id}")).await?;
        self.invalidate_meal(id);
        self.cache().invalidate_resource(keys::FAVORITES);
        Ok(())
    }

    fn invalidate_meal(&self, id: Uuid) {
        let cache = self.cache();
        cache.invalidate_resource(keys::MEALS);
        cache.invalidate(&meal_key(id));
        cache.invalidate_resource(keys::CHEF_MEALS);
        cache.invalidate_resource(keys::ADMIN_STATS);
    }
}
