use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::reviews::{CreateReviewRequest, ReviewList, UpdateReviewRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Review,
    response::ApiResponse,
    services::review_service,
    state::AppState,
};

// `/reviews/{id}` is a meal id for GET and a review id for PUT and DELETE.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/reviews", post(create_review))
        .route(
            "/reviews/{id}",
            get(list_meal_reviews).put(update_review).delete(delete_review),
        )
        .route("/reviews/user/{email}", get(list_user_reviews))
        .route("/recent-reviews", get(list_recent_reviews))
}

#[utoipa::path(
    get,
    path = "/reviews/{id}",
    params(("id" = Uuid, Path, description = "Meal ID")),
    responses((status = 200, description = "Reviews of a meal", body = ApiResponse<ReviewList>)),
    tag = "Reviews"
)]
pub async fn list_meal_reviews(
    State(state): State<AppState>,
    Path(meal_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<ReviewList>>> {
    let resp = review_service::list_meal_reviews(&state, meal_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/recent-reviews",
    responses((status = 200, description = "Latest reviews", body = ApiResponse<ReviewList>)),
    tag = "Reviews"
)]
pub async fn list_recent_reviews(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<ReviewList>>> {
    let resp = review_service::list_recent_reviews(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/reviews/user/{email}",
    params(("email" = String, Path, description = "Reviewer email")),
    responses((status = 200, description = "Reviews written by a user", body = ApiResponse<ReviewList>)),
    security(("bearer_auth" = [])),
    tag = "Reviews"
)]
pub async fn list_user_reviews(
    State(state): State<AppState>,
    user: AuthUser,
    Path(email): Path<String>,
) -> AppResult<Json<ApiResponse<ReviewList>>> {
    let resp = review_service::list_user_reviews(&state, &user, &email).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/reviews",
    request_body = CreateReviewRequest,
    responses(
        (status = 200, description = "Review added", body = ApiResponse<Review>),
        (status = 400, description = "Invalid review")
    ),
    security(("bearer_auth" = [])),
    tag = "Reviews"
)]
pub async fn create_review(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateReviewRequest>,
) -> AppResult<Json<ApiResponse<Review>>> {
    let resp = review_service::create_review(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/reviews/{id}",
    params(("id" = Uuid, Path, description = "Review ID")),
    request_body = UpdateReviewRequest,
    responses(
        (status = 200, description = "Review updated", body = ApiResponse<Review>),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Reviews"
)]
pub async fn update_review(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateReviewRequest>,
) -> AppResult<Json<ApiResponse<Review>>> {
    let resp = review_service::update_review(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/reviews/{id}",
    params(("id" = Uuid, Path, description = "Review ID")),
    responses(
        (status = 200, description = "Review deleted", body = ApiResponse<Review>),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Reviews"
)]
pub async fn delete_review(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Review>>> {
    let resp = review_service::delete_review(&state, &user, id).await?;
    Ok(Json(resp))
}
