use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use password_hash::rand_core::OsRng;
use uuid::Uuid;

use crate::{
    dto::auth::{
        Claims, IdToken, IdentityUser, LoginRequest, RegisterRequest, SessionTokens,
        TokenRequest,
    },
    db::is_unique_violation,
    error::{AppError, AppResult},
    models::Account,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub const PASSWORD_PROVIDER: &str = "password";

pub const EMAIL_EXISTS: &str = "EMAIL_EXISTS";
pub const INVALID_CREDENTIALS: &str = "INVALID_LOGIN_CREDENTIALS";
pub const WEAK_PASSWORD: &str = "WEAK_PASSWORD";
pub const INVALID_REFRESH_TOKEN: &str = "INVALID_REFRESH_TOKEN";

pub async fn register_account(
    state: &AppState,
    payload: RegisterRequest,
) -> AppResult<ApiResponse<SessionTokens>> {
    let RegisterRequest {
        email,
        password,
        name,
        photo_url,
    } = payload;
    let email = email.trim().to_lowercase();

    if password.len() < 6 {
        return Err(AppError::BadRequest(WEAK_PASSWORD.into()));
    }
    let exist: Option<(String,)> = sqlx::query_as("SELECT uid FROM accounts WHERE email = ?")
        .bind(&email)
        .fetch_optional(&state.pool)
        .await?;
    if exist.is_some() {
        return Err(AppError::BadRequest(EMAIL_EXISTS.into()));
    }

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();

    // Another registration may have raced the hash computation; the unique
    // email column settles it.
    let account: Account = sqlx::query_as(
        r#"
        INSERT INTO accounts (uid, email, display_name, photo_url, password_hash, provider_id)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4().simple().to_string())
    .bind(&email)
    .bind(name)
    .bind(photo_url)
    .bind(password_hash)
    .bind(PASSWORD_PROVIDER)
    .fetch_one(&state.pool)
    .await
    .map_err(|err| {
        if is_unique_violation(&err) {
            AppError::BadRequest(EMAIL_EXISTS.into())
        } else {
            AppError::DbError(err)
        }
    })?;

    tracing::info!(uid = %account.uid, "account registered");
    let tokens = open_session(state, &account).await?;
    Ok(ApiResponse::success("Account created", tokens, Some(Meta::empty())))
}

pub async fn login(
    state: &AppState,
    payload: LoginRequest,
) -> AppResult<ApiResponse<SessionTokens>> {
    let LoginRequest { email, password } = payload;
    let email = email.trim().to_lowercase();

    let account = sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE email = ?")
        .bind(&email)
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| AppError::BadRequest(INVALID_CREDENTIALS.into()))?;

    let parsed_hash = PasswordHash::new(&account.password_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;

    if Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_err()
    {
        return Err(AppError::BadRequest(INVALID_CREDENTIALS.into()));
    }

    let tokens = open_session(state, &account).await?;
    Ok(ApiResponse::success("Logged in", tokens, Some(Meta::empty())))
}

/// Exchanges a refresh token for a newly minted id token.
pub async fn refresh(state: &AppState, payload: TokenRequest) -> AppResult<ApiResponse<IdToken>> {
    let account = sqlx::query_as::<_, Account>(
        r#"
        SELECT a.*
        FROM refresh_tokens t
        JOIN accounts a ON a.email = t.email
        WHERE t.token = ?
        "#,
    )
    .bind(&payload.refresh_token)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| AppError::Unauthorized(INVALID_REFRESH_TOKEN.into()))?;

    let id_token = mint_id_token(state, &account)?;
    Ok(ApiResponse::success(
        "OK",
        IdToken {
            id_token,
            expires_in: state.config.token_ttl_secs,
        },
        Some(Meta::empty()),
    ))
}

pub async fn logout(
    state: &AppState,
    payload: TokenRequest,
) -> AppResult<ApiResponse<serde_json::Value>> {
    sqlx::query("DELETE FROM refresh_tokens WHERE token = ?")
        .bind(&payload.refresh_token)
        .execute(&state.pool)
        .await?;
    Ok(ApiResponse::success(
        "Logged out",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

/// Issues a new token pair. An account holds one refresh token at a time, so
/// signing in again revokes the previous one.
async fn open_session(state: &AppState, account: &Account) -> AppResult<SessionTokens> {
    let id_token = mint_id_token(state, account)?;
    let refresh_token = Uuid::new_v4().simple().to_string();

    let mut tx = state.pool.begin().await?;
    let revoked = sqlx::query("DELETE FROM refresh_tokens WHERE email = ?")
        .bind(&account.email)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    sqlx::query("INSERT INTO refresh_tokens (token, email, created_at) VALUES (?, ?, ?)")
        .bind(&refresh_token)
        .bind(&account.email)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    if revoked > 0 {
        tracing::debug!(uid = %account.uid, revoked, "previous session revoked");
    }

    Ok(SessionTokens {
        id_token,
        refresh_token,
        expires_in: state.config.token_ttl_secs,
        user: IdentityUser {
            uid: account.uid.clone(),
            email: account.email.clone(),
            display_name: account.display_name.clone(),
            photo_url: account.photo_url.clone(),
            provider_id: account.provider_id.clone(),
        },
    })
}

fn mint_id_token(state: &AppState, account: &Account) -> AppResult<String> {
    let now = Utc::now();
    let expiration = now
        .checked_add_signed(Duration::seconds(state.config.token_ttl_secs))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    let claims = Claims {
        sub: account.uid.clone(),
        email: account.email.clone(),
        iat: now.timestamp() as usize,
        exp: expiration.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(state.config.jwt_secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
}
