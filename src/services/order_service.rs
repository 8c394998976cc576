use chrono::Utc;
use uuid::Uuid;

use crate::{
    dto::orders::{OrderList, PayOrderRequest, PlaceOrderRequest, UpdateOrderStatusRequest},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_self_or_admin, profile},
    models::{MAX_ORDER_QUANTITY, Order, OrderStatus, PaymentStatus, Role, order_total},
    response::{ApiResponse, Meta},
    services::meal_service::find_meal,
    state::AppState,
};

pub async fn place_order(
    state: &AppState,
    user: &AuthUser,
    payload: PlaceOrderRequest,
) -> AppResult<ApiResponse<Order>> {
    let customer = profile(state, user).await?;
    if customer.is_fraud() {
        return Err(AppError::Forbidden);
    }
    if payload.quantity == 0 {
        return Err(AppError::BadRequest("Quantity must be at least 1".into()));
    }
    if payload.quantity > MAX_ORDER_QUANTITY {
        return Err(AppError::BadRequest(format!(
            "Quantity must not exceed {MAX_ORDER_QUANTITY}"
        )));
    }
    if payload.address.trim().is_empty() {
        return Err(AppError::BadRequest("Delivery address is required".into()));
    }

    let meal = find_meal(state, payload.meal_id)
        .await?
        .ok_or_else(|| AppError::BadRequest("Meal not found".into()))?;
    let total = order_total(meal.price, payload.quantity)
        .ok_or_else(|| AppError::BadRequest("Order total is too large".into()))?;

    let now = Utc::now();
    let order: Order = sqlx::query_as(
        r#"
        INSERT INTO orders (
            id, meal_id, meal_name, price, quantity, total, chef_id, customer_email,
            address, status, payment_status, created_at, updated_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(meal.id)
    .bind(&meal.name)
    .bind(meal.price)
    .bind(payload.quantity)
    .bind(total)
    .bind(&meal.chef_id)
    .bind(&customer.email)
    .bind(payload.address.trim())
    .bind(OrderStatus::Pending)
    .bind(PaymentStatus::Pending)
    .bind(now)
    .bind(now)
    .fetch_one(&state.pool)
    .await?;

    tracing::info!(order_id = %order.id, total = order.total, "order placed");
    Ok(ApiResponse::success("Order placed", order, Some(Meta::empty())))
}

pub async fn list_customer_orders(
    state: &AppState,
    user: &AuthUser,
    email: &str,
) -> AppResult<ApiResponse<OrderList>> {
    ensure_self_or_admin(state, user, email).await?;
    let items = sqlx::query_as::<_, Order>(
        "SELECT * FROM orders WHERE customer_email = ? ORDER BY rowid DESC",
    )
    .bind(email)
    .fetch_all(&state.pool)
    .await?;
    let total = items.len() as i64;
    Ok(ApiResponse::success(
        "Ok",
        OrderList { items },
        Some(Meta::new(1, total, total)),
    ))
}

pub async fn list_chef_orders(
    state: &AppState,
    user: &AuthUser,
    chef_id: &str,
) -> AppResult<ApiResponse<OrderList>> {
    let caller = profile(state, user).await?;
    let owns = caller.role == Role::Chef && caller.chef_id.as_deref() == Some(chef_id);
    if !owns && caller.role != Role::Admin {
        return Err(AppError::Forbidden);
    }

    let items =
        sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE chef_id = ? ORDER BY rowid DESC")
            .bind(chef_id)
            .fetch_all(&state.pool)
            .await?;
    let total = items.len() as i64;
    Ok(ApiResponse::success(
        "Ok",
        OrderList { items },
        Some(Meta::new(1, total, total)),
    ))
}

/// The owning chef drives the status machine; a customer may only cancel
/// their own pending order.
pub async fn update_order_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateOrderStatusRequest,
) -> AppResult<ApiResponse<Order>> {
    let caller = profile(state, user).await?;
    let next = payload.status;

    let mut tx = state.pool.begin().await?;
    let order = sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(AppError::NotFound)?;

    let is_chef = caller.chef_id.as_deref() == Some(order.chef_id.as_str());
    let is_customer = order.customer_email == caller.email;
    if !(is_chef || (is_customer && next == OrderStatus::Cancelled)) {
        return Err(AppError::Forbidden);
    }
    if !order.status.can_transition_to(next) {
        return Err(AppError::BadRequest(format!(
            "Cannot move order from {} to {}",
            order.status, next
        )));
    }

    let order: Order =
        sqlx::query_as("UPDATE orders SET status = ?, updated_at = ? WHERE id = ? RETURNING *")
            .bind(next)
            .bind(Utc::now())
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
    tx.commit().await?;

    tracing::info!(order_id = %order.id, status = %order.status, "order status updated");
    Ok(ApiResponse::success("Order updated", order, Some(Meta::empty())))
}

/// Marking an already paid order again returns it unchanged.
pub async fn pay_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: PayOrderRequest,
) -> AppResult<ApiResponse<Order>> {
    let mut tx = state.pool.begin().await?;
    let order = sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(AppError::NotFound)?;

    if order.customer_email != user.email {
        return Err(AppError::Forbidden);
    }
    if order.payment_status == PaymentStatus::Paid {
        return Ok(ApiResponse::success("Payment recorded", order, Some(Meta::empty())));
    }
    if order.status != OrderStatus::Accepted {
        return Err(AppError::BadRequest(
            "Order must be accepted before payment".into(),
        ));
    }

    let now = Utc::now();
    let order: Order = sqlx::query_as(
        r#"
        UPDATE orders
        SET payment_status = ?, transaction_id = ?, paid_at = ?, updated_at = ?
        WHERE id = ?
        RETURNING *
        "#,
    )
    .bind(PaymentStatus::Paid)
    .bind(payload.transaction_id)
    .bind(now)
    .bind(now)
    .bind(id)
    .fetch_one(&mut *tx)
    .await?;
    tx.commit().await?;

    tracing::info!(order_id = %order.id, "order paid");
    Ok(ApiResponse::success("Payment recorded", order, Some(Meta::empty())))
}
