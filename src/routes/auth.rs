use axum::{Json, Router, extract::State, routing::post};

use crate::{
    dto::auth::{IdToken, LoginRequest, RegisterRequest, SessionTokens, TokenRequest},
    error::AppResult,
    response::ApiResponse,
    services::auth_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/token", post(refresh_token))
        .route("/auth/logout", post(logout))
}

#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Account created and signed in", body = ApiResponse<SessionTokens>),
        (status = 400, description = "EMAIL_EXISTS or WEAK_PASSWORD")
    ),
    tag = "Auth"
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<Json<ApiResponse<SessionTokens>>> {
    let resp = auth_service::register_account(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = ApiResponse<SessionTokens>),
        (status = 400, description = "Invalid credentials")
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<ApiResponse<SessionTokens>>> {
    let resp = auth_service::login(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/auth/token",
    request_body = TokenRequest,
    responses(
        (status = 200, description = "Fresh id token", body = ApiResponse<IdToken>),
        (status = 401, description = "Unknown refresh token")
    ),
    tag = "Auth"
)]
pub async fn refresh_token(
    State(state): State<AppState>,
    Json(payload): Json<TokenRequest>,
) -> AppResult<Json<ApiResponse<IdToken>>> {
    let resp = auth_service::refresh(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/auth/logout",
    request_body = TokenRequest,
    responses((status = 200, description = "Refresh token revoked", body = ApiResponse<serde_json::Value>)),
    tag = "Auth"
)]
pub async fn logout(
    State(state): State<AppState>,
    Json(payload): Json<TokenRequest>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = auth_service::logout(&state, payload).await?;
    Ok(Json(resp))
}
