use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Meal;

#[derive(Debug, Deserialize, Serialize, Clone, ToSchema)]
pub struct CreateMealRequest {
    pub name: String,
    pub image_url: String,
    pub price: i64,
    pub ingredients: Vec<String>,
    pub chef_experience: String,
    pub delivery_area: String,
    pub estimated_delivery_minutes: u32,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, ToSchema)]
pub struct UpdateMealRequest {
    pub name: Option<String>,
    pub image_url: Option<String>,
    pub price: Option<i64>,
    pub ingredients: Option<Vec<String>>,
    pub chef_experience: Option<String>,
    pub delivery_area: Option<String>,
    pub estimated_delivery_minutes: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
#[serde(transparent)]
pub struct MealList {
    #[schema(value_type = Vec<Meal>)]
    pub items: Vec<Meal>,
}
