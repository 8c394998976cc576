use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, types::Json};
use uuid::Uuid;

use crate::{
    dto::{
        meals::{CreateMealRequest, MealList, UpdateMealRequest},
        params::{MealListQuery, SortOrder},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_role, ensure_self_or_admin},
    models::{MAX_MEAL_PRICE, Meal, Role},
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn list_meals(state: &AppState, query: MealListQuery) -> AppResult<ApiResponse<MealList>> {
    let (page, limit, offset) = query.pagination().normalize();
    let pattern = query
        .search_term()
        .map(|term| format!("%{}%", escape_like(term)));

    // Insertion order breaks ties so equal prices page deterministically.
    let order_by = match query.sort {
        Some(SortOrder::Asc) => "price ASC, rowid DESC",
        Some(SortOrder::Desc) => "price DESC, rowid DESC",
        None => "rowid DESC",
    };

    let mut count = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM meals");
    push_search(&mut count, pattern.as_deref());
    let total: i64 = count
        .build_query_scalar()
        .fetch_one(&state.pool)
        .await?;

    let mut select = QueryBuilder::<Sqlite>::new("SELECT * FROM meals");
    push_search(&mut select, pattern.as_deref());
    select
        .push(" ORDER BY ")
        .push(order_by)
        .push(" LIMIT ")
        .push_bind(limit)
        .push(" OFFSET ")
        .push_bind(offset);
    let items = select
        .build_query_as::<Meal>()
        .fetch_all(&state.pool)
        .await?;

    Ok(ApiResponse::success(
        "Meals",
        MealList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

fn push_search(builder: &mut QueryBuilder<'_, Sqlite>, pattern: Option<&str>) {
    if let Some(pattern) = pattern {
        builder
            .push(" WHERE name LIKE ")
            .push_bind(pattern.to_string())
            .push(" ESCAPE '\\'");
    }
}

/// Search text is matched literally, so LIKE wildcards in it are escaped.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

pub async fn get_meal(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Meal>> {
    let meal = find_meal(state, id).await?.ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("OK", meal, Some(Meta::empty())))
}

pub async fn find_meal(state: &AppState, id: Uuid) -> AppResult<Option<Meal>> {
    let meal = sqlx::query_as::<_, Meal>("SELECT * FROM meals WHERE id = ?")
        .bind(id)
        .fetch_optional(&state.pool)
        .await?;
    Ok(meal)
}

pub async fn list_chef_meals(
    state: &AppState,
    user: &AuthUser,
    email: &str,
) -> AppResult<ApiResponse<MealList>> {
    ensure_self_or_admin(state, user, email).await?;
    let items = sqlx::query_as::<_, Meal>("SELECT * FROM meals WHERE chef_email = ? ORDER BY rowid")
        .bind(email)
        .fetch_all(&state.pool)
        .await?;
    let total = items.len() as i64;
    Ok(ApiResponse::success(
        "Meals",
        MealList { items },
        Some(Meta::new(1, total, total)),
    ))
}

pub async fn create_meal(
    state: &AppState,
    user: &AuthUser,
    payload: CreateMealRequest,
) -> AppResult<ApiResponse<Meal>> {
    let chef = ensure_role(state, user, Role::Chef).await?;
    if chef.is_fraud() {
        return Err(AppError::Forbidden);
    }
    validate_name(&payload.name)?;
    validate_price(payload.price)?;

    let chef_id = chef
        .chef_id
        .clone()
        .ok_or_else(|| AppError::BadRequest("Chef id is missing".into()))?;

    let meal: Meal = sqlx::query_as(
        r#"
        INSERT INTO meals (
            id, name, image_url, price, rating, ingredients, chef_id, chef_name,
            chef_experience, delivery_area, estimated_delivery_minutes, chef_email, created_at
        )
        VALUES (?, ?, ?, ?, 0, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(payload.name.trim())
    .bind(&payload.image_url)
    .bind(payload.price)
    .bind(Json(&payload.ingredients))
    .bind(chef_id)
    .bind(&chef.name)
    .bind(&payload.chef_experience)
    .bind(&payload.delivery_area)
    .bind(payload.estimated_delivery_minutes)
    .bind(&chef.email)
    .bind(Utc::now())
    .fetch_one(&state.pool)
    .await?;

    tracing::info!(meal_id = %meal.id, chef = %meal.chef_email, "meal created");
    Ok(ApiResponse::success("Meal created", meal, Some(Meta::empty())))
}

pub async fn update_meal(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateMealRequest,
) -> AppResult<ApiResponse<Meal>> {
    if let Some(name) = &payload.name {
        validate_name(name)?;
    }
    if let Some(price) = payload.price {
        validate_price(price)?;
    }

    let mut meal = find_meal(state, id).await?.ok_or(AppError::NotFound)?;
    if meal.chef_email != user.email {
        return Err(AppError::Forbidden);
    }

    if let Some(name) = payload.name {
        meal.name = name.trim().to_string();
    }
    if let Some(image) = payload.image_url {
        meal.image_url = image;
    }
    if let Some(price) = payload.price {
        meal.price = price;
    }
    if let Some(ingredients) = payload.ingredients {
        meal.ingredients = ingredients;
    }
    if let Some(experience) = payload.chef_experience {
        meal.chef_experience = experience;
    }
    if let Some(area) = payload.delivery_area {
        meal.delivery_area = area;
    }
    if let Some(minutes) = payload.estimated_delivery_minutes {
        meal.estimated_delivery_minutes = minutes;
    }

    let meal: Meal = sqlx::query_as(
        r#"
        UPDATE meals
        SET name = ?, image_url = ?, price = ?, ingredients = ?, chef_experience = ?,
            delivery_area = ?, estimated_delivery_minutes = ?
        WHERE id = ?
        RETURNING *
        "#,
    )
    .bind(&meal.name)
    .bind(&meal.image_url)
    .bind(meal.price)
    .bind(Json(&meal.ingredients))
    .bind(&meal.chef_experience)
    .bind(&meal.delivery_area)
    .bind(meal.estimated_delivery_minutes)
    .bind(id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or(AppError::NotFound)?;

    Ok(ApiResponse::success("Meal updated", meal, Some(Meta::empty())))
}

/// Removes the meal and every favorite pointing at it. Orders and reviews
/// keep their copied meal name.
pub async fn delete_meal(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let mut tx = state.pool.begin().await?;
    let owner: Option<(String,)> = sqlx::query_as("SELECT chef_email FROM meals WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
    let Some((owner,)) = owner else {
        return Err(AppError::NotFound);
    };
    if owner != user.email {
        return Err(AppError::Forbidden);
    }

    sqlx::query("DELETE FROM meals WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM favorites WHERE meal_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    tracing::info!(meal_id = %id, "meal deleted");
    Ok(ApiResponse::success(
        "Meal deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

fn validate_name(name: &str) -> AppResult<()> {
    if name.trim().is_empty() {
        return Err(AppError::BadRequest("Meal name is required".into()));
    }
    Ok(())
}

fn validate_price(price: i64) -> AppResult<()> {
    if price <= 0 {
        return Err(AppError::BadRequest("Price must be positive".into()));
    }
    if price > MAX_MEAL_PRICE {
        return Err(AppError::BadRequest(format!(
            "Price must not exceed {MAX_MEAL_PRICE}"
        )));
    }
    Ok(())
}

