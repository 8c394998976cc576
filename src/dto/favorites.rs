use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::Favorite;

#[derive(Debug, Deserialize, Serialize, Clone, ToSchema)]
pub struct AddFavoriteRequest {
    pub meal_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
#[serde(transparent)]
pub struct FavoriteList {
    #[schema(value_type = Vec<Favorite>)]
    pub items: Vec<Favorite>,
}
