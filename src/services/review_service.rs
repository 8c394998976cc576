use chrono::Utc;
use sqlx::SqliteConnection;
use uuid::Uuid;

use crate::{
    dto::reviews::{CreateReviewRequest, ReviewList, UpdateReviewRequest},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_self_or_admin, profile},
    models::Review,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub const RECENT_REVIEWS_LIMIT: i64 = 10;

pub async fn list_meal_reviews(
    state: &AppState,
    meal_id: Uuid,
) -> AppResult<ApiResponse<ReviewList>> {
    let items =
        sqlx::query_as::<_, Review>("SELECT * FROM reviews WHERE meal_id = ? ORDER BY rowid DESC")
            .bind(meal_id)
            .fetch_all(&state.pool)
            .await?;
    let total = items.len() as i64;
    Ok(ApiResponse::success(
        "Reviews",
        ReviewList { items },
        Some(Meta::new(1, total, total)),
    ))
}

pub async fn list_recent_reviews(state: &AppState) -> AppResult<ApiResponse<ReviewList>> {
    let items = sqlx::query_as::<_, Review>("SELECT * FROM reviews ORDER BY rowid DESC LIMIT ?")
        .bind(RECENT_REVIEWS_LIMIT)
        .fetch_all(&state.pool)
        .await?;
    Ok(ApiResponse::success(
        "Recent reviews",
        ReviewList { items },
        Some(Meta::empty()),
    ))
}

pub async fn list_user_reviews(
    state: &AppState,
    user: &AuthUser,
    email: &str,
) -> AppResult<ApiResponse<ReviewList>> {
    ensure_self_or_admin(state, user, email).await?;
    let items = sqlx::query_as::<_, Review>(
        "SELECT * FROM reviews WHERE reviewer_email = ? ORDER BY rowid DESC",
    )
    .bind(email)
    .fetch_all(&state.pool)
    .await?;
    let total = items.len() as i64;
    Ok(ApiResponse::success(
        "Reviews",
        ReviewList { items },
        Some(Meta::new(1, total, total)),
    ))
}

pub async fn create_review(
    state: &AppState,
    user: &AuthUser,
    payload: CreateReviewRequest,
) -> AppResult<ApiResponse<Review>> {
    validate_review(payload.rating, &payload.comment)?;
    let reviewer = profile(state, user).await?;

    let mut tx = state.pool.begin().await?;
    let meal_name: String = sqlx::query_scalar("SELECT name FROM meals WHERE id = ?")
        .bind(payload.meal_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::BadRequest("Meal not found".into()))?;

    let review: Review = sqlx::query_as(
        r#"
        INSERT INTO reviews (
            id, meal_id, meal_name, reviewer_email, reviewer_name, reviewer_photo,
            rating, comment, created_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(payload.meal_id)
    .bind(meal_name)
    .bind(&reviewer.email)
    .bind(&reviewer.name)
    .bind(&reviewer.photo_url)
    .bind(payload.rating)
    .bind(payload.comment.trim())
    .bind(Utc::now())
    .fetch_one(&mut *tx)
    .await?;
    refresh_rating(&mut tx, review.meal_id).await?;
    tx.commit().await?;

    Ok(ApiResponse::success("Review added", review, Some(Meta::empty())))
}

pub async fn update_review(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateReviewRequest,
) -> AppResult<ApiResponse<Review>> {
    validate_review(payload.rating, &payload.comment)?;

    let mut tx = state.pool.begin().await?;
    let existing = find_review(&mut tx, id).await?;
    if existing.reviewer_email != user.email {
        return Err(AppError::Forbidden);
    }

    let review: Review =
        sqlx::query_as("UPDATE reviews SET rating = ?, comment = ? WHERE id = ? RETURNING *")
            .bind(payload.rating)
            .bind(payload.comment.trim())
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
    refresh_rating(&mut tx, review.meal_id).await?;
    tx.commit().await?;

    Ok(ApiResponse::success("Review updated", review, Some(Meta::empty())))
}

pub async fn delete_review(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Review>> {
    let mut tx = state.pool.begin().await?;
    let removed = find_review(&mut tx, id).await?;
    if removed.reviewer_email != user.email {
        return Err(AppError::Forbidden);
    }

    sqlx::query("DELETE FROM reviews WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    refresh_rating(&mut tx, removed.meal_id).await?;
    tx.commit().await?;

    Ok(ApiResponse::success("Review deleted", removed, Some(Meta::empty())))
}

async fn find_review(conn: &mut SqliteConnection, id: Uuid) -> AppResult<Review> {
    sqlx::query_as::<_, Review>("SELECT * FROM reviews WHERE id = ?")
        .bind(id)
        .fetch_optional(conn)
        .await?
        .ok_or(AppError::NotFound)
}

/// Stores the meal's average rating rounded to one decimal, 0 without reviews.
async fn refresh_rating(conn: &mut SqliteConnection, meal_id: Uuid) -> AppResult<()> {
    let average: Option<f64> = sqlx::query_scalar("SELECT AVG(rating) FROM reviews WHERE meal_id = ?")
        .bind(meal_id)
        .fetch_one(&mut *conn)
        .await?;
    let rating = average.map_or(0.0, |avg| (avg * 10.0).round() / 10.0);

    sqlx::query("UPDATE meals SET rating = ? WHERE id = ?")
        .bind(rating)
        .bind(meal_id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

fn validate_review(rating: u8, comment: &str) -> AppResult<()> {
    if !(1..=5).contains(&rating) {
        return Err(AppError::BadRequest("Rating must be between 1 and 5".into()));
    }
    if comment.trim().is_empty() {
        return Err(AppError::BadRequest("Comment is required".into()));
    }
    Ok(())
}
