//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - WebSocket の `UnboundedSender` を管理
//! - `SessionEvent` を JSON（`ServerMessage`）にシリアライズして送信（push_to, broadcast）
//!
//! ## 設計ノート
//!
//! WebSocket の生成は UI 層（`ui/handler/websocket.rs`）で行われます。
//! この実装は生成された `UnboundedSender` を受け取り、メッセージ送信に使用します。
//! 送信はチャンネルへの enqueue のみで、遅いソケットがブロードキャストを止めることはありません。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    domain::{ConnectionId, MessagePushError, MessagePusher, PusherChannel, SessionEvent},
    infrastructure::dto::websocket::ServerMessage,
};

/// WebSocket を使った MessagePusher 実装
pub struct WebSocketMessagePusher {
    /// 接続中のクライアントの WebSocket sender
    clients: Arc<Mutex<HashMap<ConnectionId, PusherChannel>>>,
}

impl WebSocketMessagePusher {
    /// 新しい WebSocketMessagePusher を作成
    pub fn new(clients: Arc<Mutex<HashMap<ConnectionId, PusherChannel>>>) -> Self {
        Self { clients }
    }

    fn serialize(event: &SessionEvent) -> Result<String, MessagePushError> {
        serde_json::to_string(&ServerMessage::from(event))
            .map_err(|e| MessagePushError::Serialization(e.to_string()))
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(&self, client_id: ConnectionId, sender: PusherChannel) {
        let mut clients = self.clients.lock().await;
        clients.insert(client_id, sender);
        tracing::debug!("Client '{}' registered to MessagePusher", client_id);
    }

    async fn unregister_client(&self, client_id: &ConnectionId) {
        let mut clients = self.clients.lock().await;
        clients.remove(client_id);
        tracing::debug!("Client '{}' unregistered from MessagePusher", client_id);
    }

    async fn push_to(
        &self,
        client_id: &ConnectionId,
        event: &SessionEvent,
    ) -> Result<(), MessagePushError> {
        let content = Self::serialize(event)?;
        let clients = self.clients.lock().await;

        if let Some(sender) = clients.get(client_id) {
            sender
                .send(content)
                .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;
            tracing::debug!("Pushed message to client '{}'", client_id);
            Ok(())
        } else {
            Err(MessagePushError::ClientNotFound(client_id.to_string()))
        }
    }

    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        event: &SessionEvent,
    ) -> Result<(), MessagePushError> {
        let content = Self::serialize(event)?;
        let clients = self.clients.lock().await;

        for target in targets {
            if let Some(sender) = clients.get(&target) {
                // ブロードキャストでは一部の送信失敗を許容
                if let Err(e) = sender.send(content.clone()) {
                    tracing::warn!("Failed to push message to client '{}': {}", target, e);
                } else {
                    tracing::debug!("Broadcasted message to client '{}'", target);
                }
            } else {
                tracing::warn!("Client '{}' not found during broadcast, skipping", target);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ConnectionIdFactory, PlaybackPosition};
    use tokio::sync::mpsc;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - SessionEvent が ServerMessage の JSON として送信されること
    // - push_to: 特定のクライアントへの送信
    // - broadcast: 複数クライアントへの送信と部分失敗の許容
    // ========================================

    fn create_test_pusher() -> (
        WebSocketMessagePusher,
        Arc<Mutex<HashMap<ConnectionId, PusherChannel>>>,
    ) {
        let clients = Arc::new(Mutex::new(HashMap::new()));
        let pusher = WebSocketMessagePusher::new(clients.clone());
        (pusher, clients)
    }

    fn play_event(seconds: f64) -> SessionEvent {
        SessionEvent::Played(PlaybackPosition::new(seconds).unwrap())
    }

    #[tokio::test]
    async fn test_push_to_success() {
        // テスト項目: 特定のクライアントに JSON シリアライズされたイベントを送信できる
        // given (前提条件):
        let (pusher, _clients) = create_test_pusher();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let client_id = ConnectionIdFactory::generate();
        pusher.register_client(client_id, tx).await;

        // when (操作):
        let result = pusher
            .push_to(&client_id, &SessionEvent::AdminResult(true))
            .await;

        // then (期待する結果):
        assert!(result.is_ok());
        let received = rx.recv().await.unwrap();
        let json: serde_json::Value = serde_json::from_str(&received).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "admin_success", "success": true})
        );
    }

    #[tokio::test]
    async fn test_push_to_client_not_found() {
        // テスト項目: 存在しないクライアントへの送信はエラーを返す
        // given (前提条件):
        let (pusher, _clients) = create_test_pusher();
        let client_id = ConnectionIdFactory::generate();

        // when (操作):
        let result = pusher.push_to(&client_id, &play_event(1.0)).await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(MessagePushError::ClientNotFound(client_id.to_string()))
        );
    }

    #[tokio::test]
    async fn test_broadcast_success() {
        // テスト項目: 複数のクライアントに同じイベントをブロードキャストできる
        // given (前提条件):
        let (pusher, clients) = create_test_pusher();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        let alice = ConnectionIdFactory::generate();
        let bob = ConnectionIdFactory::generate();

        {
            let mut clients_lock = clients.lock().await;
            clients_lock.insert(alice, tx1);
            clients_lock.insert(bob, tx2);
        }

        // when (操作):
        let result = pusher.broadcast(vec![alice, bob], &play_event(12.0)).await;

        // then (期待する結果):
        assert!(result.is_ok());
        let expected = r#"{"type":"sync_play","time":12.0}"#.to_string();
        assert_eq!(rx1.recv().await, Some(expected.clone()));
        assert_eq!(rx2.recv().await, Some(expected));
    }

    #[tokio::test]
    async fn test_broadcast_partial_failure() {
        // テスト項目: ブロードキャスト時、一部のクライアントが存在しない・切断済みでも成功する
        // given (前提条件):
        let (pusher, clients) = create_test_pusher();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx_closed, rx_closed) = mpsc::unbounded_channel();
        drop(rx_closed);
        let alice = ConnectionIdFactory::generate();
        let closed = ConnectionIdFactory::generate();
        let nonexistent = ConnectionIdFactory::generate();

        {
            let mut clients_lock = clients.lock().await;
            clients_lock.insert(alice, tx1);
            clients_lock.insert(closed, tx_closed);
        }

        // when (操作):
        let result = pusher
            .broadcast(vec![alice, closed, nonexistent], &play_event(3.0))
            .await;

        // then (期待する結果):
        assert!(result.is_ok()); // ブロードキャストは部分失敗を許容
        assert!(rx1.recv().await.is_some());
    }

    #[tokio::test]
    async fn test_unregister_client_stops_delivery() {
        // テスト項目: 登録解除したクライアントには送信されない
        // given (前提条件):
        let (pusher, _clients) = create_test_pusher();
        let (tx, _rx) = mpsc::unbounded_channel();
        let client_id = ConnectionIdFactory::generate();
        pusher.register_client(client_id, tx).await;

        // when (操作):
        pusher.unregister_client(&client_id).await;
        let result = pusher.push_to(&client_id, &play_event(1.0)).await;

        // then (期待する結果):
        assert!(matches!(result, Err(MessagePushError::ClientNotFound(_))));
    }
}
