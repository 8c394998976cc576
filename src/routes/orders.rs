use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, patch, post},
};
use uuid::Uuid;

use crate::{
    dto::orders::{OrderList, PayOrderRequest, PlaceOrderRequest, UpdateOrderStatusRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Order,
    response::ApiResponse,
    services::order_service,
    state::AppState,
};

// `/orders/{key}` is a customer email for GET and an order id for PATCH.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/orders", post(place_order))
        .route("/orders/{key}", get(list_customer_orders).patch(update_order_status))
        .route("/orders/{key}/pay", patch(pay_order))
        .route("/orders/chef/{chef_id}", get(list_chef_orders))
}

#[utoipa::path(
    post,
    path = "/orders",
    request_body = PlaceOrderRequest,
    responses(
        (status = 200, description = "Order placed", body = ApiResponse<Order>),
        (status = 400, description = "Invalid order"),
        (status = 403, description = "Customer flagged as fraud")
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn place_order(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<PlaceOrderRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = order_service::place_order(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/orders/{key}",
    params(("key" = String, Path, description = "Customer email")),
    responses((status = 200, description = "Orders of a customer", body = ApiResponse<OrderList>)),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn list_customer_orders(
    State(state): State<AppState>,
    user: AuthUser,
    Path(email): Path<String>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let resp = order_service::list_customer_orders(&state, &user, &email).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/orders/chef/{chef_id}",
    params(("chef_id" = String, Path, description = "Chef ID")),
    responses(
        (status = 200, description = "Incoming orders of a chef", body = ApiResponse<OrderList>),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn list_chef_orders(
    State(state): State<AppState>,
    user: AuthUser,
    Path(chef_id): Path<String>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let resp = order_service::list_chef_orders(&state, &user, &chef_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/orders/{key}",
    params(("key" = Uuid, Path, description = "Order ID")),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Order status updated", body = ApiResponse<Order>),
        (status = 400, description = "Invalid transition"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateOrderStatusRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = order_service::update_order_status(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/orders/{key}/pay",
    params(("key" = Uuid, Path, description = "Order ID")),
    request_body = PayOrderRequest,
    responses(
        (status = 200, description = "Payment recorded", body = ApiResponse<Order>),
        (status = 400, description = "Order not accepted yet"),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn pay_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<PayOrderRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = order_service::pay_order(&state, &user, id, payload).await?;
    Ok(Json(resp))
}
