//! UseCase: 視聴者の切断処理

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, SessionRepository};

/// 視聴者切断のユースケース
pub struct DisconnectViewerUseCase {
    repository: Arc<dyn SessionRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl DisconnectViewerUseCase {
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// 切断を実行
    ///
    /// 接続とその権限を破棄する。RoomState は変更しない。
    /// 同じ接続に対して複数回呼ばれても安全。
    pub async fn execute(&self, id: &ConnectionId) {
        self.message_pusher.unregister_client(id).await;
        if let Err(e) = self.repository.remove_connection(id).await {
            tracing::warn!("Failed to remove connection '{}': {}", id, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{MediaUrl, PlaybackCommand, Timestamp},
        usecase::{
            CommandSequencer,
            test_support::{
                connect_viewer, create_test_message_pusher, create_test_repository, promote,
            },
        },
    };

    #[tokio::test]
    async fn test_disconnect_discards_connection_and_keeps_room_state() {
        // テスト項目: 切断すると接続は破棄されるが、RoomState はそのまま残る
        // given (前提条件):
        let repository = create_test_repository();
        let message_pusher = create_test_message_pusher();
        let sequencer = Arc::new(CommandSequencer::new());
        let mut admin =
            connect_viewer(repository.clone(), message_pusher.clone(), sequencer).await;
        promote(repository.clone(), message_pusher.clone(), &mut admin).await;
        repository
            .apply_command(
                &PlaybackCommand::ChangeSource(MediaUrl::new("v1".to_string()).unwrap()),
                Timestamp::new(2000),
            )
            .await
            .unwrap();
        let usecase = DisconnectViewerUseCase::new(repository.clone(), message_pusher);

        // when (操作):
        usecase.execute(&admin.id).await;
        usecase.execute(&admin.id).await;

        // then (期待する結果):
        assert_eq!(repository.count_connections().await, 0);
        assert!(repository.get_connection(&admin.id).await.is_none());
        let state = repository.get_room_state().await;
        assert_eq!(state.current_url().map(|u| u.as_str()), Some("v1"));
        assert!(state.is_playing());
    }

    #[tokio::test]
    async fn test_reconnect_starts_anonymous() {
        // テスト項目: 切断後に再接続した場合、権限は引き継がれない
        // given (前提条件):
        let repository = create_test_repository();
        let message_pusher = create_test_message_pusher();
        let sequencer = Arc::new(CommandSequencer::new());
        let mut admin =
            connect_viewer(repository.clone(), message_pusher.clone(), sequencer.clone()).await;
        promote(repository.clone(), message_pusher.clone(), &mut admin).await;
        DisconnectViewerUseCase::new(repository.clone(), message_pusher.clone())
            .execute(&admin.id)
            .await;

        // when (操作):
        let reconnected = connect_viewer(repository.clone(), message_pusher, sequencer).await;

        // then (期待する結果):
        let connection = repository.get_connection(&reconnected.id).await.unwrap();
        assert!(!connection.is_privileged());
    }
}
