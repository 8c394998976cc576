use axum::{extract::FromRequestParts, http::header};
use jsonwebtoken::{DecodingKey, Validation, decode};

use crate::{
    dto::auth::Claims,
    error::{AppError, AppResult},
    models::{Role, User},
    state::AppState,
};

/// Caller identity taken from a verified bearer token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub uid: String,
    pub email: String,
}

/// Loads the marketplace profile behind an identity.
pub async fn profile(state: &AppState, user: &AuthUser) -> AppResult<User> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
        .bind(&user.email)
        .fetch_optional(&state.pool)
        .await?
        .ok_or(AppError::Forbidden)
}

pub async fn ensure_role(state: &AppState, user: &AuthUser, role: Role) -> AppResult<User> {
    let profile = profile(state, user).await?;
    if profile.role != role {
        return Err(AppError::Forbidden);
    }
    Ok(profile)
}

pub async fn ensure_admin(state: &AppState, user: &AuthUser) -> AppResult<User> {
    ensure_role(state, user, Role::Admin).await
}

/// Self access or admin access to data keyed by `email`.
pub async fn ensure_self_or_admin(state: &AppState, user: &AuthUser, email: &str) -> AppResult<()> {
    if user.email == email {
        return Ok(());
    }
    ensure_admin(state, user).await.map(|_| ())
}

pub fn decode_token(token: &str, secret: &str) -> AppResult<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::Unauthorized("Invalid or expired token".into()))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".into()))?;

        let auth_str = auth_header
            .to_str()
            .map_err(|_| AppError::Unauthorized("Invalid Authorization header".into()))?;

        let token = auth_str
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Unauthorized("Invalid Authorization scheme".into()))?
            .trim();

        let claims = decode_token(token, &state.config.jwt_secret)?;

        Ok(AuthUser {
            uid: claims.sub,
            email: claims.email,
        })
    }
}
