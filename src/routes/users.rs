use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, patch},
};

use crate::{
    dto::users::{RoleResponse, UpdateProfileRequest, UpsertUserRequest, UserList},
    error::AppResult,
    middleware::auth::AuthUser,
    models::User,
    response::ApiResponse,
    services::user_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).put(upsert_user))
        .route("/users/profile", patch(update_profile))
        .route("/users/fraud/{email}", patch(flag_fraud))
        .route("/user/{email}", get(get_user))
        .route("/user/role/{email}", get(get_role))
}

#[utoipa::path(
    put,
    path = "/users",
    request_body = UpsertUserRequest,
    responses(
        (status = 200, description = "Profile created or refreshed", body = ApiResponse<User>),
        (status = 403, description = "Email does not match the token")
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn upsert_user(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<UpsertUserRequest>,
) -> AppResult<Json<ApiResponse<User>>> {
    let resp = user_service::upsert_user(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/users/profile",
    request_body = UpdateProfileRequest,
    responses((status = 200, description = "Profile updated", body = ApiResponse<User>)),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn update_profile(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> AppResult<Json<ApiResponse<User>>> {
    let resp = user_service::update_profile(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/user/{email}",
    params(("email" = String, Path, description = "User email")),
    responses(
        (status = 200, description = "Profile", body = ApiResponse<User>),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn get_user(
    State(state): State<AppState>,
    user: AuthUser,
    Path(email): Path<String>,
) -> AppResult<Json<ApiResponse<User>>> {
    let resp = user_service::get_user(&state, &user, &email).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/user/role/{email}",
    params(("email" = String, Path, description = "User email")),
    responses((status = 200, description = "Role of a user", body = ApiResponse<RoleResponse>)),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn get_role(
    State(state): State<AppState>,
    user: AuthUser,
    Path(email): Path<String>,
) -> AppResult<Json<ApiResponse<RoleResponse>>> {
    let resp = user_service::get_role(&state, &user, &email).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/users",
    responses(
        (status = 200, description = "All users (admin only)", body = ApiResponse<UserList>),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn list_users(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<UserList>>> {
    let resp = user_service::list_users(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/users/fraud/{email}",
    params(("email" = String, Path, description = "User email")),
    responses(
        (status = 200, description = "User flagged (admin only)", body = ApiResponse<User>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn flag_fraud(
    State(state): State<AppState>,
    user: AuthUser,
    Path(email): Path<String>,
) -> AppResult<Json<ApiResponse<User>>> {
    let resp = user_service::flag_fraud(&state, &user, &email).await?;
    Ok(Json(resp))
}
