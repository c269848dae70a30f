//! ID プロバイダ連携の実装
//!
//! - `oauth`: OAuth2 認可コードフローによる実装（reqwest）

pub mod oauth;

pub use oauth::{OAuthIdentityConfig, OAuthIdentityExchange};
