//! ドメイン層のエラー型

use thiserror::Error;

/// 値オブジェクト生成時のバリデーションエラー
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValueObjectError {
    #[error("media url must not be empty")]
    EmptyMediaUrl,

    #[error("media url is too long ({0} bytes)")]
    MediaUrlTooLong(usize),

    #[error("playback position must be a finite, non-negative number of seconds (got {0})")]
    InvalidPlaybackPosition(f64),

    #[error("display name must not be empty")]
    EmptyDisplayName,

    #[error("display name is too long ({0} characters)")]
    DisplayNameTooLong(usize),

    #[error("chat text must not be empty")]
    EmptyChatText,

    #[error("chat text is too long ({0} characters)")]
    ChatTextTooLong(usize),

    #[error("invalid connection id: {0}")]
    InvalidConnectionId(String),
}

/// RoomState の状態遷移エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomStateError {
    /// ソース未設定のまま再生しようとした（current_url == None ⇒ is_playing == false）
    #[error("cannot play: no source is loaded")]
    NoSource,
}

/// Repository 操作のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("connection '{0}' not found")]
    ConnectionNotFound(String),

    #[error("connection '{0}' is already registered")]
    DuplicateConnection(String),

    #[error(transparent)]
    RoomState(#[from] RoomStateError),
}

/// MessagePusher 操作のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("client '{0}' not found")]
    ClientNotFound(String),

    #[error("failed to push message: {0}")]
    PushFailed(String),

    #[error("failed to serialize message: {0}")]
    Serialization(String),
}
