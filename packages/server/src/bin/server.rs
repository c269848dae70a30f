//! Watch-party session server.
//!
//! Holds the shared room state, gates playback control behind a shared admin
//! secret and broadcasts accepted commands to every connected viewer.
//!
//! Run with:
//! ```not_rust
//! WATCHPARTY_ADMIN_SECRET=... cargo run --bin watchparty-server
//! cargo run --bin watchparty-server -- --host 0.0.0.0 --port 3000 --admin-secret ...
//! ```

use std::{sync::Arc, time::Duration};

use clap::Parser;
use secrecy::SecretString;
use watchparty_server::{
    domain::IdentityExchange,
    infrastructure::identity::{OAuthIdentityConfig, OAuthIdentityExchange},
    ui::{AppState, Server},
};
use watchparty_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "watchparty-server")]
#[command(about = "Synchronized watch-party session server", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// Shared secret that grants playback control
    #[arg(long, env = "WATCHPARTY_ADMIN_SECRET", hide_env_values = true)]
    admin_secret: String,

    /// OAuth2 client id of the identity provider (enables /api/auth/identity)
    #[arg(long, env = "WATCHPARTY_IDENTITY_CLIENT_ID")]
    identity_client_id: Option<String>,

    /// OAuth2 client secret of the identity provider
    #[arg(long, env = "WATCHPARTY_IDENTITY_CLIENT_SECRET", hide_env_values = true)]
    identity_client_secret: Option<String>,

    /// Redirect URI registered with the identity provider
    #[arg(long, env = "WATCHPARTY_IDENTITY_REDIRECT_URI", default_value = "")]
    identity_redirect_uri: String,

    /// Token endpoint of the identity provider
    #[arg(
        long,
        env = "WATCHPARTY_IDENTITY_TOKEN_URL",
        default_value = "https://discord.com/api/oauth2/token"
    )]
    identity_token_url: String,

    /// Profile endpoint of the identity provider
    #[arg(
        long,
        env = "WATCHPARTY_IDENTITY_PROFILE_URL",
        default_value = "https://discord.com/api/users/@me"
    )]
    identity_profile_url: String,

    /// Base URL of profile avatar images
    #[arg(
        long,
        env = "WATCHPARTY_IDENTITY_AVATAR_BASE_URL",
        default_value = "https://cdn.discordapp.com/avatars"
    )]
    identity_avatar_base_url: String,
}

impl Args {
    /// Identity provider settings, when both client credentials are present
    fn identity_config(&self) -> Option<OAuthIdentityConfig> {
        let client_id = self.identity_client_id.clone()?;
        let client_secret = self.identity_client_secret.clone()?;

        Some(OAuthIdentityConfig {
            client_id,
            client_secret: SecretString::from(client_secret),
            redirect_uri: self.identity_redirect_uri.clone(),
            token_url: self.identity_token_url.clone(),
            profile_url: self.identity_profile_url.clone(),
            avatar_base_url: self.identity_avatar_base_url.clone(),
        })
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    if args.admin_secret.is_empty() {
        tracing::error!("Admin secret must not be empty");
        std::process::exit(1);
    }

    // 1. Identity provider (optional)
    let identity: Option<Arc<dyn IdentityExchange>> = match args.identity_config() {
        Some(config) => {
            let http = match reqwest::Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
            {
                Ok(http) => http,
                Err(e) => {
                    tracing::error!("Failed to build HTTP client: {}", e);
                    std::process::exit(1);
                }
            };
            tracing::info!("Identity exchange enabled ({})", config.token_url);
            Some(Arc::new(OAuthIdentityExchange::new(http, config)))
        }
        None => {
            tracing::info!("Identity exchange disabled (no client credentials)");
            None
        }
    };

    // 2. Repository, MessagePusher and UseCases
    let state = AppState::in_memory(SecretString::from(args.admin_secret), identity);

    // 3. Run the server
    if let Err(e) = Server::new(state).run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
