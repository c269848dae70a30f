//! Error types for the watchparty client.

use thiserror::Error;

/// Client session errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server URL cannot be used for a WebSocket connection
    #[error("Invalid server URL '{0}'")]
    InvalidUrl(String),

    /// Connection could not be established
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// An established connection was lost
    #[error("Connection lost")]
    ConnectionLost,

    /// Every reconnection attempt failed
    #[error("Failed to reconnect after {0} attempts")]
    ReconnectExhausted(u32),

    /// Failed to build the HTTP client
    #[error("HTTP client error: {0}")]
    HttpClient(String),
}

/// List lookup failures (recovered by the resolver, never shown as errors)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("list request failed: {0}")]
    Request(String),

    #[error("list request returned HTTP {0}")]
    Status(u16),

    #[error("list response could not be decoded: {0}")]
    Decode(String),

    #[error("list has no files")]
    EmptyList,
}
