//! Watch-party CLI client with reconnection support.
//!
//! Connects to a watch-party server, follows the shared playback on a headless
//! player and accepts commands and links from stdin.
//! Automatically reconnects on disconnection (max 5 attempts with 5 second interval).
//!
//! Run with:
//! ```not_rust
//! cargo run --bin watchparty-client -- --name Alice
//! cargo run --bin watchparty-client -- -n Bob -u ws://127.0.0.1:3000/ws
//! ```

use std::time::Duration;

use clap::Parser;
use watchparty_client::{
    ClientConfig,
    resolver::{DEFAULT_ALIAS_HOST, DEFAULT_CANONICAL_HOST, ProviderConfig},
    run_client,
};
use watchparty_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "watchparty-client")]
#[command(about = "Watch-party CLI client with link resolution and playback sync", long_about = None)]
struct Args {
    /// Display name used in chat
    #[arg(short = 'n', long)]
    name: String,

    /// WebSocket server URL
    #[arg(short = 'u', long, env = "WATCHPARTY_URL", default_value = "ws://127.0.0.1:8080/ws")]
    url: String,

    /// Base URL of the provider API used for list lookups
    #[arg(long, env = "WATCHPARTY_PROVIDER_API", default_value = "https://pixeldrain.com")]
    provider_api: String,

    /// Canonical provider host used in playable URLs
    #[arg(long, default_value = DEFAULT_CANONICAL_HOST)]
    provider_host: String,

    /// Alternate provider hosts normalized to the canonical one
    #[arg(long = "provider-alias", default_value = DEFAULT_ALIAS_HOST)]
    provider_aliases: Vec<String>,

    /// URL pinged periodically to keep an idle host awake
    #[arg(long, env = "WATCHPARTY_KEEP_ALIVE_URL")]
    keep_alive_url: Option<String>,

    /// Seconds between keep-alive pings
    #[arg(long, default_value = "300")]
    keep_alive_interval_secs: u64,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    let config = ClientConfig {
        url: args.url,
        name: args.name,
        provider: ProviderConfig {
            canonical_host: args.provider_host,
            alias_hosts: args.provider_aliases,
        },
        provider_api: args.provider_api,
        keep_alive_url: args.keep_alive_url,
        keep_alive_interval: Duration::from_secs(args.keep_alive_interval_secs.max(1)),
    };

    // Run the client
    if let Err(e) = run_client(config).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
