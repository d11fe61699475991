use uuid::Uuid;

use crate::{
    audit::{action, log_audit},
    db::DbPool,
    dto::admin::{BootstrapRequest, BootstrapResponse},
    error::{AppError, AppResult},
    response::{ApiResponse, Meta},
    services::{auth_service, role_service},
};

/// Create-or-find an identity by email and assign it a role. Both halves are
/// idempotent, so rerunning bootstrap for the same email is safe.
pub async fn bootstrap(
    pool: &DbPool,
    payload: BootstrapRequest,
) -> AppResult<ApiResponse<BootstrapResponse>> {
    let email = payload.email.trim().to_lowercase();
    let password = payload.password;
    let role = payload.role.unwrap_or_else(|| "merchant".to_string());

    if email.is_empty() || password.is_empty() {
        return Err(AppError::BadRequest(
            "Email & password are required".to_string(),
        ));
    }
    role_service::validate_role(&role)?;

    let existing: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM users WHERE email = $1")
        .bind(email.as_str())
        .fetch_optional(pool)
        .await?;

    let user_id = match existing {
        Some((id,)) => id,
        None => {
            let password_hash = auth_service::hash_password(&password)?;
            // Derive a display name from the mailbox; bootstrap has nothing better.
            let full_name = email.split('@').next().unwrap_or("user").to_string();
            let row: (Uuid,) = sqlx::query_as(
                r#"
                INSERT INTO users (id, email, password_hash, full_name)
                VALUES ($1, $2, $3, $4)
                RETURNING id
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(email.as_str())
            .bind(password_hash)
            .bind(full_name)
            .fetch_one(pool)
            .await?;
            row.0
        }
    };

    role_service::assign_role(pool, user_id, &role).await?;

    if let Err(err) = log_audit(
        pool,
        Some(user_id),
        action::BOOTSTRAP,
        Some("users"),
        Some(serde_json::json!({ "user_id": user_id, "role": role })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Bootstrapped",
        BootstrapResponse { user_id, role },
        Some(Meta::empty()),
    ))
}
