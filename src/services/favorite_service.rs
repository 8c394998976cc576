use chrono::Utc;
use uuid::Uuid;

use crate::{
    db::is_unique_violation,
    dto::favorites::{AddFavoriteRequest, FavoriteList},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_self_or_admin},
    models::Favorite,
    response::{ApiResponse, Meta},
    services::meal_service::find_meal,
    state::AppState,
};

pub const ALREADY_ADDED: &str = "Meal already added to favorites";

pub async fn list_favorites(
    state: &AppState,
    user: &AuthUser,
    email: &str,
) -> AppResult<ApiResponse<FavoriteList>> {
    ensure_self_or_admin(state, user, email).await?;
    let items = sqlx::query_as::<_, Favorite>(
        "SELECT * FROM favorites WHERE user_email = ? ORDER BY rowid DESC",
    )
    .bind(email)
    .fetch_all(&state.pool)
    .await?;

    let total = items.len() as i64;
    Ok(ApiResponse::success(
        "OK",
        FavoriteList { items },
        Some(Meta::new(1, total, total)),
    ))
}

/// Duplicate adds are rejected with a conflict so the caller can tell the
/// user the meal is already saved.
pub async fn add_favorite(
    state: &AppState,
    user: &AuthUser,
    payload: AddFavoriteRequest,
) -> AppResult<ApiResponse<Favorite>> {
    let meal = find_meal(state, payload.meal_id)
        .await?
        .ok_or_else(|| AppError::BadRequest("Meal not found".into()))?;

    let favorite: Favorite = sqlx::query_as(
        r#"
        INSERT INTO favorites (id, user_email, meal_id, meal_name, meal_image, price, chef_name, added_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&user.email)
    .bind(meal.id)
    .bind(&meal.name)
    .bind(&meal.image_url)
    .bind(meal.price)
    .bind(&meal.chef_name)
    .bind(Utc::now())
    .fetch_one(&state.pool)
    .await
    .map_err(|err| {
        if is_unique_violation(&err) {
            AppError::Conflict(ALREADY_ADDED.into())
        } else {
            AppError::DbError(err)
        }
    })?;

    Ok(ApiResponse::success(
        "Added to favorites",
        favorite,
        Some(Meta::empty()),
    ))
}

pub async fn remove_favorite(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let owner: Option<(String,)> = sqlx::query_as("SELECT user_email FROM favorites WHERE id = ?")
        .bind(id)
        .fetch_optional(&state.pool)
        .await?;
    match owner {
        None => return Err(AppError::NotFound),
        Some((owner,)) if owner != user.email => return Err(AppError::Forbidden),
        Some(_) => {}
    }

    sqlx::query("DELETE FROM favorites WHERE id = ?")
        .bind(id)
        .execute(&state.pool)
        .await?;

    Ok(ApiResponse::success(
        "Removed from favorites",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}
