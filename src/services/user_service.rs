use chrono::Utc;

use crate::{
    dto::users::{RoleResponse, UpdateProfileRequest, UpsertUserRequest, UserList},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin, ensure_self_or_admin},
    models::{Role, User},
    response::{ApiResponse, Meta},
    state::AppState,
};

/// Creates the profile on first sign-in, otherwise refreshes name, photo and
/// last login. Role, status and chef id are never touched here.
pub async fn upsert_user(
    state: &AppState,
    user: &AuthUser,
    payload: UpsertUserRequest,
) -> AppResult<ApiResponse<User>> {
    if payload.email.to_lowercase() != user.email {
        return Err(AppError::Forbidden);
    }

    let role = if state.config.is_admin_email(&user.email) {
        Role::Admin
    } else {
        Role::User
    };
    let now = Utc::now();

    let inserted = sqlx::query(
        r#"
        INSERT INTO users (email, name, photo_url, role, created_at, last_login_at)
        VALUES (?, ?, ?, ?, ?, ?)
        ON CONFLICT (email) DO NOTHING
        "#,
    )
    .bind(&user.email)
    .bind(&payload.name)
    .bind(&payload.photo_url)
    .bind(role)
    .bind(now)
    .bind(now)
    .execute(&state.pool)
    .await?
    .rows_affected()
        > 0;

    let profile: User = if inserted {
        sqlx::query_as("SELECT * FROM users WHERE email = ?")
            .bind(&user.email)
            .fetch_one(&state.pool)
            .await?
    } else {
        sqlx::query_as(
            r#"
            UPDATE users
            SET name = ?, photo_url = COALESCE(?, photo_url), last_login_at = ?
            WHERE email = ?
            RETURNING *
            "#,
        )
        .bind(&payload.name)
        .bind(&payload.photo_url)
        .bind(now)
        .bind(&user.email)
        .fetch_one(&state.pool)
        .await?
    };

    if inserted {
        tracing::info!(email = %profile.email, role = %profile.role, "user profile created");
    }
    Ok(ApiResponse::success("User saved", profile, Some(Meta::empty())))
}

pub async fn update_profile(
    state: &AppState,
    user: &AuthUser,
    payload: UpdateProfileRequest,
) -> AppResult<ApiResponse<User>> {
    let profile: User = sqlx::query_as(
        r#"
        UPDATE users
        SET name = COALESCE(?, name),
            photo_url = COALESCE(?, photo_url),
            address = COALESCE(?, address),
            phone = COALESCE(?, phone)
        WHERE email = ?
        RETURNING *
        "#,
    )
    .bind(payload.name)
    .bind(payload.photo_url)
    .bind(payload.address)
    .bind(payload.phone)
    .bind(&user.email)
    .fetch_optional(&state.pool)
    .await?
    .ok_or(AppError::NotFound)?;

    Ok(ApiResponse::success("Profile updated", profile, Some(Meta::empty())))
}

pub async fn get_user(
    state: &AppState,
    user: &AuthUser,
    email: &str,
) -> AppResult<ApiResponse<User>> {
    ensure_self_or_admin(state, user, email).await?;
    let profile = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
        .bind(email)
        .fetch_optional(&state.pool)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("OK", profile, Some(Meta::empty())))
}

/// Unknown emails resolve to the default role rather than an error.
pub async fn get_role(
    state: &AppState,
    user: &AuthUser,
    email: &str,
) -> AppResult<ApiResponse<RoleResponse>> {
    ensure_self_or_admin(state, user, email).await?;
    let role: Option<Role> = sqlx::query_scalar("SELECT role FROM users WHERE email = ?")
        .bind(email)
        .fetch_optional(&state.pool)
        .await?;
    Ok(ApiResponse::success(
        "OK",
        RoleResponse {
            role: role.unwrap_or_default(),
        },
        Some(Meta::empty()),
    ))
}

pub async fn list_users(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<UserList>> {
    ensure_admin(state, user).await?;
    let items = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY rowid DESC")
        .fetch_all(&state.pool)
        .await?;
    let total = items.len() as i64;
    Ok(ApiResponse::success(
        "Users",
        UserList { items },
        Some(Meta::new(1, total, total)),
    ))
}

pub async fn flag_fraud(
    state: &AppState,
    user: &AuthUser,
    email: &str,
) -> AppResult<ApiResponse<User>> {
    ensure_admin(state, user).await?;
    if email == user.email {
        return Err(AppError::BadRequest("Admins cannot flag themselves".into()));
    }

    let target: Option<(Role,)> = sqlx::query_as("SELECT role FROM users WHERE email = ?")
        .bind(email)
        .fetch_optional(&state.pool)
        .await?;
    match target {
        None => return Err(AppError::NotFound),
        Some((Role::Admin,)) => {
            return Err(AppError::BadRequest("Admins cannot be flagged".into()));
        }
        Some(_) => {}
    }

    let flagged: User =
        sqlx::query_as("UPDATE users SET status = 'fraud' WHERE email = ? RETURNING *")
            .bind(email)
            .fetch_one(&state.pool)
            .await?;

    tracing::warn!(email = %flagged.email, by = %user.email, "user flagged as fraud");
    Ok(ApiResponse::success("User marked as fraud", flagged, Some(Meta::empty())))
}
