//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    domain::{
        ChatMessage, ChatText, ConnectionId, DisplayName, MediaUrl, PlaybackCommand,
        PlaybackPosition, ValueObjectError,
    },
    infrastructure::dto::websocket::ClientMessage,
    ui::state::AppState,
    usecase::ControlPlaybackError,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that receives messages from the rx channel and pushes them to the WebSocket sender.
///
/// Every event for this connection (its initial state, broadcasts, replies) flows through `rx`,
/// so they reach the socket in the order they were enqueued.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (sender, mut receiver) = socket.split();

    // Register the connection; the current RoomState is queued for this client only
    let (tx, rx) = mpsc::unbounded_channel();
    let connection_id = match state.connect_viewer_usecase.execute(tx).await {
        Ok(id) => id,
        Err(e) => {
            tracing::error!("Failed to register connection: {}", e);
            return;
        }
    };
    tracing::info!("Connection '{}' opened", connection_id);

    let mut send_task = pusher_loop(rx, sender);

    let state_clone = state.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!("WebSocket error on '{}': {}", connection_id, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    match serde_json::from_str::<ClientMessage>(text.as_str()) {
                        Ok(message) => dispatch(&state_clone, &connection_id, message).await,
                        Err(e) => {
                            tracing::warn!(
                                "Ignoring malformed frame from '{}': {}",
                                connection_id,
                                e
                            );
                        }
                    }
                }
                Message::Close(_) => {
                    tracing::info!("Connection '{}' requested close", connection_id);
                    break;
                }
                _ => {}
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    state.disconnect_viewer_usecase.execute(&connection_id).await;
    tracing::info!("Connection '{}' closed", connection_id);
}

/// Routes one inbound message to its use case.
async fn dispatch(state: &AppState, connection_id: &ConnectionId, message: ClientMessage) {
    tracing::debug!("Received '{}' from '{}'", message.kind(), connection_id);

    match message {
        ClientMessage::AuthAdmin { secret } => {
            if let Err(e) = state
                .authenticate_admin_usecase
                .execute(connection_id, &secret)
                .await
            {
                tracing::warn!("Admin authentication for '{}' failed: {}", connection_id, e);
            }
        }
        ClientMessage::ChatMessage { user, text, avatar } => {
            let message = match (DisplayName::new(user), ChatText::new(text)) {
                (Ok(user), Ok(text)) => ChatMessage::new(user, text, avatar),
                (Err(e), _) | (_, Err(e)) => {
                    tracing::warn!("Dropping chat message from '{}': {}", connection_id, e);
                    return;
                }
            };
            if let Err(e) = state.relay_chat_usecase.execute(message).await {
                tracing::warn!("Failed to relay chat message: {}", e);
            }
        }
        ClientMessage::AdminChangeUrl { url } => {
            let command = MediaUrl::new(url).map(PlaybackCommand::ChangeSource);
            control(state, connection_id, command).await;
        }
        ClientMessage::AdminPlay { time } => {
            let command = PlaybackPosition::new(time).map(PlaybackCommand::Play);
            control(state, connection_id, command).await;
        }
        ClientMessage::AdminPause { time } => {
            let command = PlaybackPosition::new(time).map(PlaybackCommand::Pause);
            control(state, connection_id, command).await;
        }
        ClientMessage::AdminSeek { time } => {
            let command = PlaybackPosition::new(time).map(PlaybackCommand::Seek);
            control(state, connection_id, command).await;
        }
    }
}

/// Runs a privileged command; invalid payloads and denied commands are dropped.
async fn control(
    state: &AppState,
    connection_id: &ConnectionId,
    command: Result<PlaybackCommand, ValueObjectError>,
) {
    let command = match command {
        Ok(command) => command,
        Err(e) => {
            tracing::warn!("Dropping invalid command from '{}': {}", connection_id, e);
            return;
        }
    };
    let name = command.name();
    match state
        .control_playback_usecase
        .execute(connection_id, command)
        .await
    {
        Ok(_) => tracing::info!("'{}' from '{}' broadcast", name, connection_id),
        Err(ControlPlaybackError::PrivilegeDenied) => {
            tracing::debug!(
                "Dropping '{}' from non-privileged connection '{}'",
                name,
                connection_id
            );
        }
        Err(e) => {
            tracing::warn!("Dropping '{}' from '{}': {}", name, connection_id, e);
        }
    }
}
