use crate::{
    error::AppResult,
    middleware::auth::{AuthUser, ensure_admin},
    models::AdminStats,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn platform_stats(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<AdminStats>> {
    ensure_admin(state, user).await?;
    let (total_users,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
        .fetch_one(&state.pool)
        .await?;
    let (total_meals,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM meals")
        .fetch_one(&state.pool)
        .await?;
    let (total_orders, pending_orders, delivered_orders, total_payment): (i64, i64, i64, i64) =
        sqlx::query_as(
            r#"
            SELECT
                COUNT(*),
                COALESCE(SUM(status = 'pending'), 0),
                COALESCE(SUM(status = 'delivered'), 0),
                COALESCE(SUM(CASE WHEN payment_status = 'paid' THEN total ELSE 0 END), 0)
            FROM orders
            "#,
        )
        .fetch_one(&state.pool)
        .await?;

    let stats = AdminStats {
        total_users,
        total_meals,
        total_orders,
        pending_orders,
        delivered_orders,
        total_payment,
    };
    Ok(ApiResponse::success("Stats", stats, Some(Meta::empty())))
}
