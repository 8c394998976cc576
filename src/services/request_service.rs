use chrono::Utc;
use uuid::Uuid;

use crate::{
    db::is_unique_violation,
    dto::requests::{ResolveRoleRequest, RoleRequestList, SubmitRoleRequest},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin, profile},
    models::{RequestStatus, Role, RoleRequest},
    response::{ApiResponse, Meta},
    state::AppState,
};

pub const ALREADY_PENDING: &str = "You already have a pending request";

pub async fn submit_request(
    state: &AppState,
    user: &AuthUser,
    payload: SubmitRoleRequest,
) -> AppResult<ApiResponse<RoleRequest>> {
    let requester = profile(state, user).await?;
    if payload.requested_role == Role::User {
        return Err(AppError::BadRequest("Only chef or admin can be requested".into()));
    }
    if requester.role == payload.requested_role {
        return Err(AppError::BadRequest(format!(
            "You are already {}",
            payload.requested_role
        )));
    }

    // At most one pending request per user, enforced by a partial unique index.
    let request: RoleRequest = sqlx::query_as(
        r#"
        INSERT INTO role_requests (id, user_email, user_name, requested_role, status, created_at)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&requester.email)
    .bind(&requester.name)
    .bind(payload.requested_role)
    .bind(RequestStatus::Pending)
    .bind(Utc::now())
    .fetch_one(&state.pool)
    .await
    .map_err(|err| {
        if is_unique_violation(&err) {
            AppError::BadRequest(ALREADY_PENDING.into())
        } else {
            AppError::DbError(err)
        }
    })?;

    tracing::info!(email = %request.user_email, role = %request.requested_role, "role request submitted");
    Ok(ApiResponse::success("Request submitted", request, Some(Meta::empty())))
}

pub async fn list_requests(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<RoleRequestList>> {
    ensure_admin(state, user).await?;
    let items = sqlx::query_as::<_, RoleRequest>("SELECT * FROM role_requests ORDER BY rowid DESC")
        .fetch_all(&state.pool)
        .await?;
    let total = items.len() as i64;
    Ok(ApiResponse::success(
        "Requests",
        RoleRequestList { items },
        Some(Meta::new(1, total, total)),
    ))
}

/// Approval applies the role to the user; chefs receive a chef id.
pub async fn resolve_request(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: ResolveRoleRequest,
) -> AppResult<ApiResponse<RoleRequest>> {
    ensure_admin(state, user).await?;
    if payload.status == RequestStatus::Pending {
        return Err(AppError::BadRequest("Resolution must be approved or rejected".into()));
    }

    let mut tx = state.pool.begin().await?;
    let pending = sqlx::query_as::<_, RoleRequest>("SELECT * FROM role_requests WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(AppError::NotFound)?;
    if pending.status != RequestStatus::Pending {
        return Err(AppError::BadRequest("Request already resolved".into()));
    }

    let request: RoleRequest =
        sqlx::query_as("UPDATE role_requests SET status = ? WHERE id = ? RETURNING *")
            .bind(payload.status)
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

    if request.status == RequestStatus::Approved {
        sqlx::query(
            r#"
            UPDATE users
            SET role = ?,
                chef_id = CASE WHEN ? AND chef_id IS NULL THEN ? ELSE chef_id END
            WHERE email = ?
            "#,
        )
        .bind(request.requested_role)
        .bind(request.requested_role == Role::Chef)
        .bind(new_chef_id())
        .bind(&request.user_email)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;

    tracing::info!(request_id = %request.id, status = ?request.status, "role request resolved");
    Ok(ApiResponse::success("Request updated", request, Some(Meta::empty())))
}

fn new_chef_id() -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("chef-{}", &suffix[..8])
}
