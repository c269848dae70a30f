//! 外部 ID プロバイダとの認可コード交換の抽象化
//!
//! ログインのハンドシェイク自体は外部に委ねる。ここでは「コードを
//! プロフィールに交換する」不透明な呼び出しとしてのみ扱う。

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

/// 交換結果のプロフィール
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentityProfile {
    pub username: String,
    pub id: String,
    pub avatar: String,
}

/// 交換要求（redirect_uri 未指定時は設定値を使う）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityRequest {
    pub code: String,
    pub redirect_uri: Option<String>,
}

/// 交換失敗（利用者には汎用の認証エラーとして見せる）
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityExchangeError {
    #[error("token exchange failed: {0}")]
    TokenExchange(String),

    #[error("profile request failed: {0}")]
    Profile(String),

    #[error("profile response has no username")]
    MissingUsername,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityExchange: Send + Sync {
    /// 認可コードをプロフィールに交換
    async fn exchange(
        &self,
        request: &IdentityRequest,
    ) -> Result<IdentityProfile, IdentityExchangeError>;
}
