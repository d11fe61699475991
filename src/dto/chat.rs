use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::ChatMessage;

#[derive(Debug, Deserialize, ToSchema)]
pub struct SendMessageRequest {
    pub receiver_id: Uuid,
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Conversation {
    pub peer_id: Uuid,
    pub messages: Vec<ChatMessage>,
}
