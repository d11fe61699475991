use uuid::Uuid;

use crate::{
    db::DbPool,
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{DEFAULT_ROLE, VALID_ROLES},
};

/// All roles assigned to an identity, or `[customer]` when no role rows exist.
pub async fn fetch_roles(pool: &DbPool, user_id: Uuid) -> AppResult<Vec<String>> {
    let rows: Vec<(String,)> =
        sqlx::query_as("SELECT role FROM user_roles WHERE user_id = $1 ORDER BY role")
            .bind(user_id)
            .fetch_all(pool)
            .await?;

    if rows.is_empty() {
        return Ok(vec![DEFAULT_ROLE.to_string()]);
    }
    Ok(rows.into_iter().map(|(role,)| role).collect())
}

/// Strict membership check against user_roles. The customer default only
/// applies to `fetch_roles`; explicit checks read the table as-is.
pub async fn has_role(pool: &DbPool, user_id: Uuid, role: &str) -> AppResult<bool> {
    let row: Option<(Uuid,)> =
        sqlx::query_as("SELECT id FROM user_roles WHERE user_id = $1 AND role = $2")
            .bind(user_id)
            .bind(role)
            .fetch_optional(pool)
            .await?;
    Ok(row.is_some())
}

pub async fn ensure_role(pool: &DbPool, user: &AuthUser, role: &str) -> AppResult<()> {
    if has_role(pool, user.user_id, role).await? {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

pub async fn ensure_admin(pool: &DbPool, user: &AuthUser) -> AppResult<()> {
    ensure_role(pool, user, "admin").await
}

/// Idempotent role assignment.
pub async fn assign_role(pool: &DbPool, user_id: Uuid, role: &str) -> AppResult<()> {
    validate_role(role)?;
    sqlx::query(
        r#"
        INSERT INTO user_roles (id, user_id, role)
        VALUES ($1, $2, $3)
        ON CONFLICT (user_id, role) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(role)
    .execute(pool)
    .await?;
    Ok(())
}

pub fn validate_role(role: &str) -> AppResult<()> {
    if VALID_ROLES.contains(&role) {
        Ok(())
    } else {
        Err(AppError::BadRequest(format!("Unknown role: {role}")))
    }
}
