//! UseCase 層のエラー型

use thiserror::Error;

use crate::domain::{IdentityExchangeError, MessagePushError, RepositoryError};

/// 接続処理のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    #[error("failed to register connection: {0}")]
    Registration(#[from] RepositoryError),

    #[error("failed to send initial state: {0}")]
    InitialStateFailed(#[from] MessagePushError),
}

/// admin 認証のエラー（シークレット不一致はエラーではなく `Ok(false)`）
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthenticateError {
    #[error("connection '{0}' not found")]
    ConnectionNotFound(String),

    #[error("failed to reply to connection: {0}")]
    ReplyFailed(#[from] MessagePushError),
}

/// 再生制御のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControlPlaybackError {
    #[error("connection '{0}' not found")]
    ConnectionNotFound(String),

    /// 匿名接続からの特権コマンド（黙って破棄する）
    #[error("connection is not privileged")]
    PrivilegeDenied,

    #[error("command rejected: {0}")]
    InvalidCommand(RepositoryError),

    #[error("broadcast failed: {0}")]
    BroadcastFailed(#[from] MessagePushError),
}

/// チャット中継のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelayChatError {
    #[error("broadcast failed: {0}")]
    BroadcastFailed(#[from] MessagePushError),
}

/// ID 交換のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExchangeIdentityError {
    #[error("no identity provider is configured")]
    NotConfigured,

    #[error("authorization code is missing")]
    MissingCode,

    #[error(transparent)]
    Exchange(#[from] IdentityExchangeError),
}
