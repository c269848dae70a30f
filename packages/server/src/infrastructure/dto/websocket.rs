//! WebSocket message DTOs.
//!
//! Every frame is a JSON object tagged by `"type"`.

use serde::{Deserialize, Serialize};

/// Full room state, sent once to a newly connected client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomStateDto {
    pub current_url: Option<String>,
    pub is_playing: bool,
    /// Seconds (advisory)
    pub current_time: f64,
    /// Unix timestamp (milliseconds)
    pub last_updated: i64,
}

/// Server → client messages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    SyncState(RoomStateDto),
    SyncUrl { url: String },
    SyncPlay { time: f64 },
    SyncPause { time: f64 },
    SyncSeek { time: f64 },
    AdminSuccess { success: bool },
    ReceiveMessage {
        user: String,
        text: String,
        avatar: String,
    },
}

/// Client → server messages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    AuthAdmin { secret: String },
    AdminChangeUrl { url: String },
    AdminPlay { time: f64 },
    AdminPause { time: f64 },
    AdminSeek { time: f64 },
    ChatMessage {
        user: String,
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        avatar: Option<String>,
    },
}

impl ClientMessage {
    /// Message type name, safe to log (never includes the payload).
    pub fn kind(&self) -> &'static str {
        match self {
            ClientMessage::AuthAdmin { .. } => "auth_admin",
            ClientMessage::AdminChangeUrl { .. } => "admin_change_url",
            ClientMessage::AdminPlay { .. } => "admin_play",
            ClientMessage::AdminPause { .. } => "admin_pause",
            ClientMessage::AdminSeek { .. } => "admin_seek",
            ClientMessage::ChatMessage { .. } => "chat_message",
        }
    }
}
