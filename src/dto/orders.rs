use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Order, OrderStatus};

#[derive(Debug, Deserialize, Serialize, Clone, ToSchema)]
pub struct PlaceOrderRequest {
    pub meal_id: Uuid,
    pub quantity: u32,
    pub address: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}

#[derive(Debug, Deserialize, Serialize, Clone, ToSchema)]
pub struct PayOrderRequest {
    pub transaction_id: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
#[serde(transparent)]
pub struct OrderList {
    #[schema(value_type = Vec<Order>)]
    pub items: Vec<Order>,
}
