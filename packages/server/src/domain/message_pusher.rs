//! MessagePusher trait 定義
//!
//! クライアントへのイベント通知（単一送信・ブロードキャスト）の抽象化。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{ConnectionId, MessagePushError, SessionEvent};

/// クライアントへのメッセージ送信チャンネル（シリアライズ済み JSON）
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// MessagePusher trait
///
/// UseCase 層はこの trait に依存し、具体的な送信手段（WebSocket など）には依存しない。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// クライアントの送信チャンネルを登録
    async fn register_client(&self, client_id: ConnectionId, sender: PusherChannel);

    /// クライアントの送信チャンネルを登録解除
    async fn unregister_client(&self, client_id: &ConnectionId);

    /// 特定のクライアントにイベントを送信
    async fn push_to(
        &self,
        client_id: &ConnectionId,
        event: &SessionEvent,
    ) -> Result<(), MessagePushError>;

    /// 複数のクライアントにイベントをブロードキャスト（一部の送信失敗は許容）
    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        event: &SessionEvent,
    ) -> Result<(), MessagePushError>;
}
