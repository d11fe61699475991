use serde_json::Value;
use uuid::Uuid;

use crate::{db::DbPool, error::AppResult};

/// Action names recorded in audit_logs. Fixed vocabulary so log queries can
/// filter on exact values.
pub mod action {
    pub const USER_REGISTER: &str = "user_register";
    pub const USER_LOGIN: &str = "user_login";
    pub const BOOTSTRAP: &str = "bootstrap";
    pub const CART_ADD: &str = "cart_add";
    pub const CART_REMOVE: &str = "cart_remove";
    pub const CHECKOUT: &str = "checkout";
    pub const BOOKING_CREATE: &str = "booking_create";
    pub const BOOKING_STATUS_UPDATE: &str = "booking_status_update";
}

pub async fn log_audit(
    pool: &DbPool,
    user_id: Option<Uuid>,
    action: &str,
    resource: Option<&str>,
    metadata: Option<Value>,
) -> AppResult<()> {
    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO audit_logs (id, user_id, action, resource, metadata)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(action)
    .bind(resource)
    .bind(metadata)
    .execute(pool)
    .await?;

    Ok(())
}
