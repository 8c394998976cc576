use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::Review;

#[derive(Debug, Deserialize, Serialize, Clone, ToSchema)]
pub struct CreateReviewRequest {
    pub meal_id: Uuid,
    pub rating: u8,
    pub comment: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, ToSchema)]
pub struct UpdateReviewRequest {
    pub rating: u8,
    pub comment: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
#[serde(transparent)]
pub struct ReviewList {
    #[schema(value_type = Vec<Review>)]
    pub items: Vec<Review>,
}
