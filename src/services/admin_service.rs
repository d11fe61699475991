use uuid::Uuid;

use crate::{
    db::DbPool,
    dto::admin::{CategoryList, CreateCategoryRequest, SummaryReport},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Category,
    response::{ApiResponse, Meta},
    services::role_service::ensure_admin,
};

const CATEGORY_KINDS: [&str; 3] = ["product", "service", "merchant"];

/// Aggregate counts for the admin dashboard. Revenue only counts payments
/// that actually succeeded, not pending mock payments.
pub async fn summary_report(
    pool: &DbPool,
    user: &AuthUser,
) -> AppResult<ApiResponse<SummaryReport>> {
    ensure_admin(pool, user).await?;

    let (users, merchants, orders, revenue) = tokio::try_join!(
        count(pool, "SELECT COUNT(*) FROM users"),
        count(pool, "SELECT COUNT(*) FROM merchants"),
        count(pool, "SELECT COUNT(*) FROM orders"),
        count(
            pool,
            "SELECT COALESCE(SUM(amount), 0) FROM payments WHERE status = 'succeeded'"
        ),
    )?;

    Ok(ApiResponse::success(
        "Summary",
        SummaryReport {
            users,
            merchants,
            orders,
            revenue,
        },
        Some(Meta::empty()),
    ))
}

pub async fn list_categories(
    pool: &DbPool,
    user: &AuthUser,
) -> AppResult<ApiResponse<CategoryList>> {
    ensure_admin(pool, user).await?;

    let items: Vec<Category> = sqlx::query_as("SELECT * FROM categories ORDER BY name")
        .fetch_all(pool)
        .await?;

    Ok(ApiResponse::success(
        "Categories",
        CategoryList { items },
        Some(Meta::empty()),
    ))
}

pub async fn create_category(
    pool: &DbPool,
    user: &AuthUser,
    payload: CreateCategoryRequest,
) -> AppResult<ApiResponse<Category>> {
    ensure_admin(pool, user).await?;

    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest("name is required".into()));
    }
    if !CATEGORY_KINDS.contains(&payload.kind.as_str()) {
        return Err(AppError::BadRequest(format!(
            "Unknown category type: {}",
            payload.kind
        )));
    }

    let category: Category = sqlx::query_as(
        r#"
        INSERT INTO categories (id, name, type)
        VALUES ($1, $2, $3)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(payload.name.trim())
    .bind(payload.kind)
    .fetch_one(pool)
    .await?;

    Ok(ApiResponse::success(
        "Category created",
        category,
        Some(Meta::empty()),
    ))
}

pub async fn delete_category(
    pool: &DbPool,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(pool, user).await?;

    let result = sqlx::query("DELETE FROM categories WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

async fn count(pool: &DbPool, sql: &str) -> AppResult<i64> {
    let row: (i64,) = sqlx::query_as(sql).fetch_one(pool).await?;
    Ok(row.0)
}
