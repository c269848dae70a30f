//! Watch-party CLI client.
//!
//! Resolves share links into playable URLs, keeps a local playback adapter in
//! step with the server's broadcasts and turns local actions into commands when
//! the connection is privileged.

pub mod command;
pub mod domain;
pub mod error;
pub mod formatter;
pub mod keep_alive;
pub mod playback;
pub mod reconciler;
pub mod resolver;
mod runner;
mod session;
mod ui;

pub use runner::{ClientConfig, run_client};
