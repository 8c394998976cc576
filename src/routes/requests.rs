use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, patch},
};
use uuid::Uuid;

use crate::{
    dto::requests::{ResolveRoleRequest, RoleRequestList, SubmitRoleRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::RoleRequest,
    response::ApiResponse,
    services::request_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/requests", get(list_requests).post(submit_request))
        .route("/requests/{id}", patch(resolve_request))
}

#[utoipa::path(
    post,
    path = "/requests",
    request_body = SubmitRoleRequest,
    responses(
        (status = 200, description = "Request submitted", body = ApiResponse<RoleRequest>),
        (status = 400, description = "A request is already pending")
    ),
    security(("bearer_auth" = [])),
    tag = "Requests"
)]
pub async fn submit_request(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<SubmitRoleRequest>,
) -> AppResult<Json<ApiResponse<RoleRequest>>> {
    let resp = request_service::submit_request(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/requests",
    responses(
        (status = 200, description = "All role requests (admin only)", body = ApiResponse<RoleRequestList>),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Requests"
)]
pub async fn list_requests(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<RoleRequestList>>> {
    let resp = request_service::list_requests(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/requests/{id}",
    params(("id" = Uuid, Path, description = "Request ID")),
    request_body = ResolveRoleRequest,
    responses(
        (status = 200, description = "Request resolved (admin only)", body = ApiResponse<RoleRequest>),
        (status = 400, description = "Already resolved"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Requests"
)]
pub async fn resolve_request(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ResolveRoleRequest>,
) -> AppResult<Json<ApiResponse<RoleRequest>>> {
    let resp = request_service::resolve_request(&state, &user, id, payload).await?;
    Ok(Json(resp))
}
