//! エンティティ
//!
//! - `RoomState`: サーバーが唯一所有する共有再生状態
//! - `Connection`: 接続ごとの権限
//! - `SessionEvent`: クライアントへ通知されるイベント

use serde::Serialize;

use super::{
    error::RoomStateError,
    value_object::{ChatText, ConnectionId, DisplayName, MediaUrl, PlaybackPosition, Timestamp},
};

/// アバター未指定時に使われるデフォルトのアバター画像
pub const DEFAULT_AVATAR_URL: &str = "https://cdn.discordapp.com/embed/avatars/0.png";

/// 共有再生状態（サーバー所有のシングルトン）
///
/// 不変条件: `current_url == None ⇒ is_playing == false`
///
/// フィールドは非公開で、状態遷移は `apply` 経由でのみ行われる。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomState {
    current_url: Option<MediaUrl>,
    is_playing: bool,
    current_time: PlaybackPosition,
    last_updated: Timestamp,
}

impl RoomState {
    /// 起動時の初期状態（ソースなし・停止中）を作成
    pub fn new(created_at: Timestamp) -> Self {
        Self {
            current_url: None,
            is_playing: false,
            current_time: PlaybackPosition::ZERO,
            last_updated: created_at,
        }
    }

    pub fn current_url(&self) -> Option<&MediaUrl> {
        self.current_url.as_ref()
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    /// 最後に記録された再生位置（参考値）
    pub fn current_time(&self) -> PlaybackPosition {
        self.current_time
    }

    pub fn last_updated(&self) -> Timestamp {
        self.last_updated
    }

    /// 検証済みコマンドを適用する
    ///
    /// 失敗した場合、状態は変更されない。
    pub fn apply(&mut self, command: &PlaybackCommand, at: Timestamp) -> Result<(), RoomStateError> {
        match command {
            PlaybackCommand::ChangeSource(url) => {
                self.current_url = Some(url.clone());
                self.is_playing = true;
                self.current_time = PlaybackPosition::ZERO;
            }
            PlaybackCommand::Play(time) => {
                if self.current_url.is_none() {
                    return Err(RoomStateError::NoSource);
                }
                self.is_playing = true;
                self.current_time = *time;
            }
            PlaybackCommand::Pause(time) => {
                self.is_playing = false;
                self.current_time = *time;
            }
            PlaybackCommand::Seek(time) => {
                self.current_time = *time;
            }
        }
        self.last_updated = at;
        Ok(())
    }
}

/// 特権コマンド（admin のみ発行可能）
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackCommand {
    ChangeSource(MediaUrl),
    Play(PlaybackPosition),
    Pause(PlaybackPosition),
    Seek(PlaybackPosition),
}

impl PlaybackCommand {
    /// ログ出力用のコマンド名
    pub fn name(&self) -> &'static str {
        match self {
            PlaybackCommand::ChangeSource(_) => "change_source",
            PlaybackCommand::Play(_) => "play",
            PlaybackCommand::Pause(_) => "pause",
            PlaybackCommand::Seek(_) => "seek",
        }
    }
}

/// 接続ごとの権限
///
/// 共有シークレットによる一段階の昇格のみ存在する。有効期限・ログアウトはなく、
/// 切断時に接続ごと破棄される。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Privilege {
    #[default]
    Anonymous,
    Privileged,
}

/// 接続エンティティ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub id: ConnectionId,
    pub privilege: Privilege,
    pub connected_at: Timestamp,
}

impl Connection {
    /// 匿名権限の接続を作成
    pub fn new(id: ConnectionId, connected_at: Timestamp) -> Self {
        Self {
            id,
            privilege: Privilege::Anonymous,
            connected_at,
        }
    }

    /// Anonymous → Privileged（一方向）
    pub fn grant_privilege(&mut self) {
        self.privilege = Privilege::Privileged;
    }

    pub fn is_privileged(&self) -> bool {
        self.privilege == Privilege::Privileged
    }
}

/// チャットメッセージ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub user: DisplayName,
    pub text: ChatText,
    pub avatar: String,
}

impl ChatMessage {
    /// アバター未指定の場合はデフォルトのアバターを使う
    pub fn new(user: DisplayName, text: ChatText, avatar: Option<String>) -> Self {
        let avatar = avatar
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty())
            .unwrap_or_else(|| DEFAULT_AVATAR_URL.to_string());
        Self { user, text, avatar }
    }
}

/// クライアントへ送られるイベント
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// 接続直後に送る完全な状態
    StateSnapshot(RoomState),
    SourceChanged(MediaUrl),
    Played(PlaybackPosition),
    Paused(PlaybackPosition),
    Seeked(PlaybackPosition),
    /// admin 認証の結果（要求した接続のみに送る）
    AdminResult(bool),
    ChatPosted(ChatMessage),
}

impl From<PlaybackCommand> for SessionEvent {
    fn from(command: PlaybackCommand) -> Self {
        match command {
            PlaybackCommand::ChangeSource(url) => SessionEvent::SourceChanged(url),
            PlaybackCommand::Play(time) => SessionEvent::Played(time),
            PlaybackCommand::Pause(time) => SessionEvent::Paused(time),
            PlaybackCommand::Seek(time) => SessionEvent::Seeked(time),
        }
    }
}
