//! UseCase: チャットの中継
//!
//! チャットは権限に関係なく全接続へブロードキャストされる。RoomState は変更しない。
//! 接続時のスナップショットより先にチャットが届かないよう、CommandSequencer を通す。

use std::sync::Arc;

use crate::domain::{ChatMessage, MessagePusher, SessionEvent, SessionRepository};

use super::{error::RelayChatError, sequencer::CommandSequencer};

/// チャット中継のユースケース
pub struct RelayChatUseCase {
    repository: Arc<dyn SessionRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    sequencer: Arc<CommandSequencer>,
}

impl RelayChatUseCase {
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        sequencer: Arc<CommandSequencer>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            sequencer,
        }
    }

    /// チャットメッセージを送信者を含む全接続にブロードキャスト
    pub async fn execute(&self, message: ChatMessage) -> Result<(), RelayChatError> {
        let _turn = self.sequencer.enter().await;
        let targets = self.repository.get_all_connection_ids().await;
        self.message_pusher
            .broadcast(targets, &SessionEvent::ChatPosted(message))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{ChatText, DEFAULT_AVATAR_URL, DisplayName},
        usecase::{
            CommandSequencer,
            test_support::{connect_viewer, create_test_message_pusher, create_test_repository},
        },
    };

    #[tokio::test]
    async fn test_chat_is_relayed_to_everyone_without_privilege() {
        // テスト項目: 匿名接続のチャットも送信者を含む全接続に届き、RoomState は変わらない
        // given (前提条件):
        let repository = create_test_repository();
        let message_pusher = create_test_message_pusher();
        let sequencer = Arc::new(CommandSequencer::new());
        let mut alice =
            connect_viewer(repository.clone(), message_pusher.clone(), sequencer.clone()).await;
        let mut bob =
            connect_viewer(repository.clone(), message_pusher.clone(), sequencer.clone()).await;
        alice.drain();
        bob.drain();
        let before = repository.get_room_state().await;
        let usecase = RelayChatUseCase::new(repository.clone(), message_pusher, sequencer);
        let message = ChatMessage::new(
            DisplayName::new("alice".to_string()).unwrap(),
            ChatText::new("hello".to_string()).unwrap(),
            None,
        );

        // when (操作):
        usecase.execute(message).await.unwrap();

        // then (期待する結果):
        let expected = vec![serde_json::json!({
            "type": "receive_message",
            "user": "alice",
            "text": "hello",
            "avatar": DEFAULT_AVATAR_URL
        })];
        assert_eq!(alice.drain(), expected);
        assert_eq!(bob.drain(), expected);
        assert_eq!(repository.get_room_state().await, before);
    }

    #[tokio::test]
    async fn test_chat_waits_for_sequencer() {
        // テスト項目: 直列化区間の実行中（接続時のスナップショット送信中など）はチャットが配信されない
        // given (前提条件):
        let repository = create_test_repository();
        let message_pusher = create_test_message_pusher();
        let sequencer = Arc::new(CommandSequencer::new());
        let mut alice =
            connect_viewer(repository.clone(), message_pusher.clone(), sequencer.clone()).await;
        alice.drain();
        let usecase = Arc::new(RelayChatUseCase::new(
            repository,
            message_pusher,
            sequencer.clone(),
        ));
        let turn = sequencer.enter().await;

        // when (操作):
        let relay = tokio::spawn({
            let usecase = usecase.clone();
            async move {
                let message = ChatMessage::new(
                    DisplayName::new("bob".to_string()).unwrap(),
                    ChatText::new("hi".to_string()).unwrap(),
                    None,
                );
                usecase.execute(message).await
            }
        });
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        let while_held = alice.drain();
        drop(turn);
        relay.await.unwrap().unwrap();

        // then (期待する結果):
        assert!(while_held.is_empty());
        assert_eq!(alice.drain().len(), 1);
    }
}
