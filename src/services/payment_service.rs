use uuid::Uuid;

use crate::{
    dto::payments::CreatePaymentIntentRequest,
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Order, PaymentIntent},
    response::{ApiResponse, Meta},
    state::AppState,
};

/// Stands in for the processor-side intent creation. The amount must match
/// the order total in minor units.
pub async fn create_payment_intent(
    state: &AppState,
    user: &AuthUser,
    payload: CreatePaymentIntentRequest,
) -> AppResult<ApiResponse<PaymentIntent>> {
    let order = sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = ?")
        .bind(payload.order_id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or(AppError::NotFound)?;

    if order.customer_email != user.email {
        return Err(AppError::Forbidden);
    }
    let expected = order
        .amount_minor_units()
        .ok_or_else(|| AppError::BadRequest("Order total is too large".into()))?;
    if payload.amount <= 0 || payload.amount != expected {
        return Err(AppError::BadRequest("Amount does not match order total".into()));
    }

    let id = format!("pi_{}", Uuid::new_v4().simple());
    let intent = PaymentIntent {
        client_secret: format!("{id}_secret_{}", Uuid::new_v4().simple()),
        id,
        amount: payload.amount,
        currency: "usd".to_string(),
    };

    tracing::debug!(intent = %intent.id, amount = intent.amount, "payment intent created");
    Ok(ApiResponse::success("Payment intent", intent, Some(Meta::empty())))
}
