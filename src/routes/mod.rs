use axum::{
    Json, Router,
    http::{StatusCode, Uri},
    routing::get,
};

use crate::{
    response::{ApiResponse, Meta},
    state::AppState,
};

pub mod admin;
pub mod auth;
pub mod doc;
pub mod favorites;
pub mod health;
pub mod meals;
pub mod orders;
pub mod payments;
pub mod requests;
pub mod reviews;
pub mod users;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .merge(meals::router())
        .merge(reviews::router())
        .merge(favorites::router())
        .merge(orders::router())
        .merge(users::router())
        .merge(requests::router())
        .merge(admin::router())
        .merge(payments::router())
        .merge(auth::router())
}

/// The whole backend with state bound, minus the transport layers `main` adds.
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .merge(create_api_router())
        .merge(doc::scalar_docs())
        .fallback(not_found)
        .with_state(state)
}

async fn not_found(uri: Uri) -> (StatusCode, Json<ApiResponse<serde_json::Value>>) {
    let body = ApiResponse::success(
        "Not Found",
        serde_json::json!({ "path": uri.path() }),
        Some(Meta::empty()),
    );
    (StatusCode::NOT_FOUND, Json(body))
}
