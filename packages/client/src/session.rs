//! WebSocket client session management.

use std::{sync::Arc, time::Instant};

use futures_util::{SinkExt, StreamExt};
use tokio::sync::{Mutex, mpsc};
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};
use watchparty_server::infrastructure::dto::websocket::{ClientMessage, ServerMessage};

use crate::{
    command::{HELP, InputCommand, parse_input},
    error::ClientError,
    formatter::MessageFormatter,
    playback::{HeadlessPlayer, PlaybackAdapter},
    reconciler::Reconciler,
    resolver::LinkResolver,
    ui::{print_and_prompt, redisplay_prompt},
};

/// Everything a session needs that outlives a single connection
pub struct SessionContext {
    /// WebSocket server URL
    pub url: String,
    /// Display name used for chat and the prompt
    pub name: String,
    pub resolver: LinkResolver,
    pub reconciler: Arc<Mutex<Reconciler<HeadlessPlayer>>>,
}

/// Run one WebSocket session until the user exits or the connection drops.
///
/// # Returns
///
/// * `Ok(())` - the user closed the input (Ctrl+C / Ctrl+D)
/// * `Err(ClientError)` - the connection could not be opened or was lost
pub async fn run_client_session(
    context: &SessionContext,
    input_rx: &mut mpsc::UnboundedReceiver<String>,
) -> Result<(), ClientError> {
    let (ws_stream, _response) = connect_async(context.url.as_str())
        .await
        .map_err(|e| match e {
            tokio_tungstenite::tungstenite::Error::Url(_) => {
                ClientError::InvalidUrl(context.url.clone())
            }
            other => ClientError::ConnectionError(other.to_string()),
        })?;

    // Privilege belongs to the previous connection, if any
    context.reconciler.lock().await.reset_privilege();

    tracing::info!("Connected to watch-party server!");
    println!(
        "\nYou are '{}'. Paste a link to watch it, /help for commands. Press Ctrl+C to exit.\n",
        context.name
    );

    let (mut write, mut read) = ws_stream.split();

    let reconciler = context.reconciler.clone();
    let name = context.name.clone();

    // Spawn a task to handle incoming messages
    let mut read_task = tokio::spawn(async move {
        while let Some(message) = read.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    match serde_json::from_str::<ServerMessage>(text.as_str()) {
                        Ok(server_message) => {
                            reconciler
                                .lock()
                                .await
                                .apply_remote(&server_message, Instant::now());
                            let formatted = MessageFormatter::format_server_message(&server_message);
                            print_and_prompt(&formatted, &name);
                        }
                        Err(e) => {
                            tracing::warn!("Ignoring unknown server message: {}", e);
                            print_and_prompt(&MessageFormatter::format_raw_message(text.as_str()), &name);
                        }
                    }
                }
                Ok(Message::Binary(data)) => {
                    print_and_prompt(&MessageFormatter::format_binary_message(data.len()), &name);
                }
                Ok(Message::Close(_)) => {
                    tracing::info!("Server closed the connection");
                    break;
                }
                Err(e) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    break;
                }
                _ => {}
            }
        }
    });

    loop {
        tokio::select! {
            _ = &mut read_task => {
                return Err(ClientError::ConnectionLost);
            }
            line = input_rx.recv() => {
                let Some(line) = line else {
                    read_task.abort();
                    return Ok(());
                };

                if let Some(outbound) = handle_input(context, &line).await {
                    let json = match serde_json::to_string(&outbound) {
                        Ok(json) => json,
                        Err(e) => {
                            tracing::error!("Failed to serialize '{}': {}", outbound.kind(), e);
                            continue;
                        }
                    };
                    if let Err(e) = write.send(Message::Text(json.into())).await {
                        tracing::warn!("Failed to send '{}': {}", outbound.kind(), e);
                        read_task.abort();
                        return Err(ClientError::ConnectionLost);
                    }
                }
                redisplay_prompt(&context.name);
            }
        }
    }
}

/// Turn one input line into an outbound message, printing local feedback.
async fn handle_input(context: &SessionContext, line: &str) -> Option<ClientMessage> {
    let not_admin = "(Applied locally only: you are not the admin. Use /admin <secret>.)";

    match parse_input(line) {
        InputCommand::Admin(secret) => Some(ClientMessage::AuthAdmin { secret }),
        InputCommand::Say(text) => Some(ClientMessage::ChatMessage {
            user: context.name.clone(),
            text,
            avatar: None,
        }),
        InputCommand::Play => {
            let outbound = context.reconciler.lock().await.play_locally();
            if outbound.is_none() {
                print!("{}", MessageFormatter::format_notice(not_admin));
            }
            outbound
        }
        InputCommand::Pause => {
            let outbound = context.reconciler.lock().await.pause_locally();
            if outbound.is_none() {
                print!("{}", MessageFormatter::format_notice(not_admin));
            }
            outbound
        }
        InputCommand::Seek(seconds) => {
            let outbound = context.reconciler.lock().await.seek_locally(seconds);
            if outbound.is_none() {
                print!("{}", MessageFormatter::format_notice(not_admin));
            }
            outbound
        }
        InputCommand::Status => {
            let reconciler = context.reconciler.lock().await;
            let player = reconciler.adapter();
            print!(
                "{}",
                MessageFormatter::format_status(
                    player.source(),
                    player.is_playing(),
                    player.current_time(),
                    reconciler.is_privileged(),
                )
            );
            None
        }
        InputCommand::Help => {
            print!("\n{}", HELP);
            None
        }
        InputCommand::Link(raw) => {
            if !context.reconciler.lock().await.is_privileged() {
                print!(
                    "{}",
                    MessageFormatter::format_notice(
                        "Only the admin can change the video. Use /admin <secret> first."
                    )
                );
                return None;
            }

            let resolved = context.resolver.resolve(&raw).await;
            print!("{}", MessageFormatter::format_resolved_link(&resolved));
            context
                .reconciler
                .lock()
                .await
                .request_source(&resolved.playable_url)
        }
        InputCommand::Invalid(hint) => {
            print!("{}", MessageFormatter::format_notice(&hint));
            None
        }
    }
}
