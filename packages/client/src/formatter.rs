//! Message formatting utilities for client display.

use watchparty_server::infrastructure::dto::websocket::{RoomStateDto, ServerMessage};
use watchparty_shared::time::{format_playback_position, timestamp_to_rfc3339};

use crate::resolver::{LinkKind, ResolvedLink};

const RULE: &str = "============================================================";

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format any server message
    pub fn format_server_message(message: &ServerMessage) -> String {
        match message {
            ServerMessage::SyncState(state) => Self::format_room_state(state),
            ServerMessage::SyncUrl { url } => format!("\n▶ Now watching {}\n", url),
            ServerMessage::SyncPlay { time } => {
                format!("\n▶ Playing from {}\n", format_playback_position(*time))
            }
            ServerMessage::SyncPause { time } => {
                format!("\n⏸ Paused at {}\n", format_playback_position(*time))
            }
            ServerMessage::SyncSeek { time } => {
                format!("\n⇥ Seeked to {}\n", format_playback_position(*time))
            }
            ServerMessage::AdminSuccess { success: true } => {
                "\n✔ You are now the admin of this room\n".to_string()
            }
            ServerMessage::AdminSuccess { success: false } => {
                "\n✘ Wrong admin secret\n".to_string()
            }
            ServerMessage::ReceiveMessage { user, text, .. } => {
                Self::format_chat_message(user, text)
            }
        }
    }

    /// Format the full room state received on connect
    ///
    /// # Returns
    ///
    /// A framed block with source, play state, position and last update time
    pub fn format_room_state(state: &RoomStateDto) -> String {
        let mut output = String::new();
        output.push_str(&format!("\n\n{}\n", RULE));
        match &state.current_url {
            Some(url) => {
                let status = if state.is_playing { "playing" } else { "paused" };
                output.push_str(&format!("Now watching: {}\n", url));
                output.push_str(&format!(
                    "Status: {} at {}\n",
                    status,
                    format_playback_position(state.current_time)
                ));
            }
            None => output.push_str("(Nothing is playing yet)\n"),
        }
        output.push_str(&format!(
            "Last updated at {}\n",
            timestamp_to_rfc3339(state.last_updated)
        ));
        output.push_str(&format!("{}\n", RULE));
        output
    }

    /// Format a chat message
    pub fn format_chat_message(user: &str, text: &str) -> String {
        format!("\n@{}: {}\n", user, text)
    }

    /// Format the local playback status for `/status`
    pub fn format_status(
        source: Option<&str>,
        is_playing: bool,
        position: f64,
        privileged: bool,
    ) -> String {
        let role = if privileged { "admin" } else { "viewer" };
        match source {
            Some(url) => {
                let status = if is_playing { "playing" } else { "paused" };
                format!(
                    "\n[{}] {} at {} - {}\n",
                    role,
                    status,
                    format_playback_position(position),
                    url
                )
            }
            None => format!("\n[{}] nothing loaded\n", role),
        }
    }

    /// Format the outcome of resolving a submitted link
    pub fn format_resolved_link(link: &ResolvedLink) -> String {
        match link.kind {
            LinkKind::Direct if link.playable_url != link.original_url => {
                format!("\n→ Resolved to {}\n", link.playable_url)
            }
            LinkKind::Direct => String::new(),
            LinkKind::Unresolved => {
                format!("\n(Could not resolve the link, sending it as is: {})\n", link.original_url)
            }
        }
    }

    /// Format a passive notice
    pub fn format_notice(text: &str) -> String {
        format!("\n{}\n", text)
    }

    /// Format a binary message notification
    pub fn format_binary_message(byte_count: usize) -> String {
        format!("\n← Received {} bytes of binary data\n", byte_count)
    }

    /// Format a raw text message (when parsing fails)
    pub fn format_raw_message(text: &str) -> String {
        format!("\n← Received: {}\n", text)
    }
}
