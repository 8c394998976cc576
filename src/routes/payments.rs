use axum::{
    Json, Router,
    extract::{Multipart, Query, State},
    routing::post,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    dto::payments::{CreatePaymentIntentRequest, UploadResponse, UploadedImage},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::PaymentIntent,
    response::ApiResponse,
    services::payment_service,
    state::AppState,
};

pub const IMAGE_HOST: &str = "https://images.localchefbazaar.test";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create-payment-intent", post(create_payment_intent))
        .route("/upload", post(upload_image))
}

#[derive(Debug, Deserialize)]
pub struct UploadQuery {
    pub key: Option<String>,
}

#[utoipa::path(
    post,
    path = "/create-payment-intent",
    request_body = CreatePaymentIntentRequest,
    responses(
        (status = 200, description = "Payment intent", body = ApiResponse<PaymentIntent>),
        (status = 400, description = "Amount does not match the order"),
        (status = 404, description = "Order not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Payments"
)]
pub async fn create_payment_intent(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreatePaymentIntentRequest>,
) -> AppResult<Json<ApiResponse<PaymentIntent>>> {
    let resp = payment_service::create_payment_intent(&state, &user, payload).await?;
    Ok(Json(resp))
}

/// Accepts a multipart `image` field the way imgbb does and answers with a
/// public URL. The bytes are not kept.
#[utoipa::path(
    post,
    path = "/upload",
    params(("key" = Option<String>, Query, description = "Upload API key")),
    responses(
        (status = 200, description = "Uploaded", body = UploadResponse),
        (status = 400, description = "Missing image"),
        (status = 401, description = "Invalid key")
    ),
    tag = "Payments"
)]
pub async fn upload_image(
    State(state): State<AppState>,
    Query(query): Query<UploadQuery>,
    mut multipart: Multipart,
) -> AppResult<Json<UploadResponse>> {
    if let Some(expected) = &state.config.image_upload_key {
        if query.key.as_deref() != Some(expected.as_str()) {
            return Err(AppError::Unauthorized("Invalid API key".into()));
        }
    }

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("image") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("image").to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        if bytes.is_empty() {
            return Err(AppError::BadRequest("Empty image".into()));
        }

        let url = format!("{IMAGE_HOST}/{}/{}", Uuid::new_v4().simple(), file_name);
        tracing::debug!(size = bytes.len(), %url, "image uploaded");
        return Ok(Json(UploadResponse {
            data: UploadedImage {
                display_url: url.clone(),
                url,
            },
            success: true,
            status: 200,
        }));
    }

    Err(AppError::BadRequest("Missing image field".into()))
}
