use uuid::Uuid;

use crate::{
    db::DbPool,
    dto::chat::{Conversation, SendMessageRequest},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::ChatMessage,
    response::{ApiResponse, Meta},
    routes::params::Pagination,
};

pub async fn send_message(
    pool: &DbPool,
    user: &AuthUser,
    payload: SendMessageRequest,
) -> AppResult<ApiResponse<ChatMessage>> {
    if payload.message.trim().is_empty() {
        return Err(AppError::BadRequest("message must not be empty".into()));
    }

    let receiver: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM users WHERE id = $1")
        .bind(payload.receiver_id)
        .fetch_optional(pool)
        .await?;
    if receiver.is_none() {
        return Err(AppError::NotFound);
    }

    let message: ChatMessage = sqlx::query_as(
        r#"
        INSERT INTO chat_messages (id, sender_id, receiver_id, message)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user.user_id)
    .bind(payload.receiver_id)
    .bind(payload.message)
    .fetch_one(pool)
    .await?;

    Ok(ApiResponse::success("Sent", message, Some(Meta::empty())))
}

/// The implicit conversation between the caller and a peer: all messages in
/// either direction, chronological.
pub async fn conversation(
    pool: &DbPool,
    user: &AuthUser,
    peer_id: Uuid,
    pagination: Pagination,
) -> AppResult<ApiResponse<Conversation>> {
    let (page, limit, offset) = pagination.normalize();

    let messages: Vec<ChatMessage> = sqlx::query_as(
        r#"
        SELECT * FROM chat_messages
        WHERE (sender_id = $1 AND receiver_id = $2)
           OR (sender_id = $2 AND receiver_id = $1)
        ORDER BY created_at ASC
        LIMIT $3 OFFSET $4
        "#,
    )
    .bind(user.user_id)
    .bind(peer_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let total: (i64,) = sqlx::query_as(
        r#"
        SELECT COUNT(*) FROM chat_messages
        WHERE (sender_id = $1 AND receiver_id = $2)
           OR (sender_id = $2 AND receiver_id = $1)
        "#,
    )
    .bind(user.user_id)
    .bind(peer_id)
    .fetch_one(pool)
    .await?;

    let meta = Meta::new(page, limit, total.0);
    Ok(ApiResponse::success(
        "Conversation",
        Conversation { peer_id, messages },
        Some(meta),
    ))
}
