//! HTTP and WebSocket handlers.

mod http;
mod websocket;

pub use http::{exchange_identity, get_room, health_check, keep_alive};
pub use websocket::websocket_handler;
