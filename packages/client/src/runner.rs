//! Client execution logic with reconnection support.

use std::{sync::Arc, time::Duration};

use tokio::sync::Mutex;
use watchparty_shared::time::SystemClock;

use crate::{
    domain::{should_attempt_reconnect, should_exit_immediately},
    error::ClientError,
    keep_alive::spawn_keep_alive,
    playback::HeadlessPlayer,
    reconciler::Reconciler,
    resolver::{HttpListLookup, LinkResolver, ProviderConfig},
    session::{SessionContext, run_client_session},
    ui::spawn_input_thread,
};

const MAX_RECONNECT_ATTEMPTS: u32 = 5;
const RECONNECT_INTERVAL_SECS: u64 = 5;
const HTTP_TIMEOUT_SECS: u64 = 10;

/// Client settings
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// WebSocket server URL
    pub url: String,
    /// Display name
    pub name: String,
    /// Provider hosts recognized by the link resolver
    pub provider: ProviderConfig,
    /// Base URL for list lookups
    pub provider_api: String,
    /// Optional URL pinged periodically
    pub keep_alive_url: Option<String>,
    pub keep_alive_interval: Duration,
}

/// Run the client with reconnection logic
pub async fn run_client(config: ClientConfig) -> Result<(), ClientError> {
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
        .build()
        .map_err(|e| ClientError::HttpClient(e.to_string()))?;

    let lookup = Arc::new(HttpListLookup::new(http.clone(), config.provider_api.clone()));
    let context = SessionContext {
        url: config.url.clone(),
        name: config.name.clone(),
        resolver: LinkResolver::new(config.provider.clone(), lookup),
        reconciler: Arc::new(Mutex::new(Reconciler::new(HeadlessPlayer::new(Arc::new(
            SystemClock,
        ))))),
    };

    let keep_alive = config.keep_alive_url.clone().map(|url| {
        tracing::info!(
            "Pinging {} every {} seconds",
            url,
            config.keep_alive_interval.as_secs()
        );
        spawn_keep_alive(http.clone(), url, config.keep_alive_interval)
    });

    let mut input_rx = spawn_input_thread(config.name.clone());
    let mut reconnect_count = 0;

    let result = loop {
        tracing::info!(
            "Attempting to connect to {} as '{}' (attempt {}/{})",
            config.url,
            config.name,
            reconnect_count + 1,
            MAX_RECONNECT_ATTEMPTS + 1
        );

        match run_client_session(&context, &mut input_rx).await {
            Ok(()) => {
                tracing::info!("Client session ended normally");
                break Ok(());
            }
            Err(e) => {
                if should_exit_immediately(&e) {
                    break Err(e);
                }

                tracing::warn!("{}", e);
                // A session that was up starts a fresh round of attempts
                if matches!(e, ClientError::ConnectionLost) {
                    reconnect_count = 0;
                }

                if !should_attempt_reconnect(&e, reconnect_count, MAX_RECONNECT_ATTEMPTS) {
                    break Err(ClientError::ReconnectExhausted(MAX_RECONNECT_ATTEMPTS));
                }
                reconnect_count += 1;

                tracing::info!(
                    "Reconnecting in {} seconds... (retry {}/{})",
                    RECONNECT_INTERVAL_SECS,
                    reconnect_count,
                    MAX_RECONNECT_ATTEMPTS
                );

                tokio::time::sleep(Duration::from_secs(RECONNECT_INTERVAL_SECS)).await;
            }
        }
    };

    if let Some(handle) = keep_alive {
        handle.abort();
    }

    result
}
