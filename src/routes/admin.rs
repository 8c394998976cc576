use axum::{Json, Router, extract::State, routing::get};

use crate::{
    error::AppResult, middleware::auth::AuthUser, models::AdminStats, response::ApiResponse,
    services::admin_service, state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/admin/stats", get(platform_stats))
}

#[utoipa::path(
    get,
    path = "/admin/stats",
    responses(
        (status = 200, description = "Platform statistics (admin only)", body = ApiResponse<AdminStats>),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn platform_stats(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<AdminStats>>> {
    let resp = admin_service::platform_stats(&state, &user).await?;
    Ok(Json(resp))
}
