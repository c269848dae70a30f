//! Session state server for synchronized shared video playback.
//!
//! One shared room state is owned by the server. Privileged connections
//! mutate it through validated commands and every change is rebroadcast to
//! all connected viewers over WebSocket.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
