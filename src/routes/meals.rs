use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, patch},
};
use uuid::Uuid;

use crate::{
    dto::{
        meals::{CreateMealRequest, MealList, UpdateMealRequest},
        params::MealListQuery,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::Meal,
    response::ApiResponse,
    services::meal_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/meals", get(list_meals).post(create_meal))
        .route("/meals/{id}", patch(update_meal).delete(delete_meal))
        .route("/meals/chef/{email}", get(list_chef_meals))
        .route("/meal/{id}", get(get_meal))
}

#[utoipa::path(
    get,
    path = "/meals",
    params(MealListQuery),
    responses(
        (status = 200, description = "Paginated meals", body = ApiResponse<MealList>)
    ),
    tag = "Meals"
)]
pub async fn list_meals(
    State(state): State<AppState>,
    Query(query): Query<MealListQuery>,
) -> AppResult<Json<ApiResponse<MealList>>> {
    let resp = meal_service::list_meals(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/meal/{id}",
    params(("id" = Uuid, Path, description = "Meal ID")),
    responses(
        (status = 200, description = "Meal detail", body = ApiResponse<Meal>),
        (status = 404, description = "Not Found")
    ),
    tag = "Meals"
)]
pub async fn get_meal(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Meal>>> {
    let resp = meal_service::get_meal(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/meals/chef/{email}",
    params(("email" = String, Path, description = "Chef email")),
    responses(
        (status = 200, description = "Meals of a chef", body = ApiResponse<MealList>),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Meals"
)]
pub async fn list_chef_meals(
    State(state): State<AppState>,
    user: AuthUser,
    Path(email): Path<String>,
) -> AppResult<Json<ApiResponse<MealList>>> {
    let resp = meal_service::list_chef_meals(&state, &user, &email).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/meals",
    request_body = CreateMealRequest,
    responses(
        (status = 200, description = "Meal created", body = ApiResponse<Meal>),
        (status = 400, description = "Invalid meal"),
        (status = 403, description = "Not a chef or flagged as fraud")
    ),
    security(("bearer_auth" = [])),
    tag = "Meals"
)]
pub async fn create_meal(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateMealRequest>,
) -> AppResult<Json<ApiResponse<Meal>>> {
    let resp = meal_service::create_meal(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/meals/{id}",
    params(("id" = Uuid, Path, description = "Meal ID")),
    request_body = UpdateMealRequest,
    responses(
        (status = 200, description = "Meal updated", body = ApiResponse<Meal>),
        (status = 403, description = "Not the owning chef"),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Meals"
)]
pub async fn update_meal(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateMealRequest>,
) -> AppResult<Json<ApiResponse<Meal>>> {
    let resp = meal_service::update_meal(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/meals/{id}",
    params(("id" = Uuid, Path, description = "Meal ID")),
    responses(
        (status = 200, description = "Meal deleted", body = ApiResponse<serde_json::Value>),
        (status = 403, description = "Not the owning chef"),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Meals"
)]
pub async fn delete_meal(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = meal_service::delete_meal(&state, &user, id).await?;
    Ok(Json(resp))
}
