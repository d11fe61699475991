use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::chat::{Conversation, SendMessageRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::ChatMessage,
    response::ApiResponse,
    routes::params::Pagination,
    services::chat_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(send_message))
        .route("/conversation/{peer_id}", get(conversation))
}

#[utoipa::path(
    post,
    path = "/api/chat",
    request_body = SendMessageRequest,
    responses(
        (status = 200, description = "Send chat message", body = ApiResponse<ChatMessage>),
        (status = 400, description = "Empty message"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Receiver not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Chat"
)]
pub async fn send_message(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<SendMessageRequest>,
) -> AppResult<Json<ApiResponse<ChatMessage>>> {
    let resp = chat_service::send_message(&state.pool, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/chat/conversation/{peer_id}",
    params(
        ("peer_id" = Uuid, Path, description = "Peer user ID"),
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20")
    ),
    responses(
        (status = 200, description = "Messages between caller and peer", body = ApiResponse<Conversation>),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Chat"
)]
pub async fn conversation(
    State(state): State<AppState>,
    user: AuthUser,
    Path(peer_id): Path<Uuid>,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<Conversation>>> {
    let resp = chat_service::conversation(&state.pool, &user, peer_id, pagination).await?;
    Ok(Json(resp))
}
