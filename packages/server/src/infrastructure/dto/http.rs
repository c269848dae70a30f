//! HTTP API request/response DTOs.

use serde::{Deserialize, Serialize};

/// `POST /api/auth/identity` request body
#[derive(Debug, Clone, Deserialize)]
pub struct IdentityExchangeRequestDto {
    pub code: Option<String>,
    pub redirect_uri: Option<String>,
}

/// `POST /api/auth/identity` response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityProfileDto {
    pub username: String,
    pub id: String,
    pub avatar: String,
}

/// Generic error body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDto {
    pub error: String,
}

/// `GET /api/room` response body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomInfoDto {
    #[serde(flatten)]
    pub state: super::websocket::RoomStateDto,
    /// 接続数
    pub connections: usize,
}
