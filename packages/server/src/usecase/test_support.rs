//! UseCase テスト用の共通ヘルパー

use std::{collections::HashMap, sync::Arc};

use secrecy::SecretString;
use tokio::sync::{Mutex, mpsc};

use crate::{
    domain::{ConnectionId, MessagePusher, RoomState, SessionRepository, Timestamp},
    infrastructure::{
        message_pusher::WebSocketMessagePusher, repository::InMemorySessionRepository,
    },
};

use super::{AuthenticateAdminUseCase, CommandSequencer, ConnectViewerUseCase};

pub const TEST_SECRET: &str = "open-sesame";

pub fn create_test_repository() -> Arc<InMemorySessionRepository> {
    let room_state = Arc::new(Mutex::new(RoomState::new(Timestamp::new(1000))));
    Arc::new(InMemorySessionRepository::new(room_state))
}

pub fn create_test_message_pusher() -> Arc<WebSocketMessagePusher> {
    let clients = Arc::new(Mutex::new(HashMap::new()));
    Arc::new(WebSocketMessagePusher::new(clients))
}

/// 接続済みのテスト用クライアント
pub struct TestViewer {
    pub id: ConnectionId,
    pub rx: mpsc::UnboundedReceiver<String>,
}

impl TestViewer {
    /// 受信済みのメッセージを全て取り出して JSON として返す
    pub fn drain(&mut self) -> Vec<serde_json::Value> {
        let mut messages = Vec::new();
        while let Ok(raw) = self.rx.try_recv() {
            if let Ok(value) = serde_json::from_str(&raw) {
                messages.push(value);
            }
        }
        messages
    }
}

/// テスト用の接続を確立する（sync_state は受信キューに残る）
pub async fn connect_viewer(
    repository: Arc<dyn SessionRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    sequencer: Arc<CommandSequencer>,
) -> TestViewer {
    let usecase = ConnectViewerUseCase::new(repository, message_pusher, sequencer);
    let (tx, rx) = mpsc::unbounded_channel();
    let id = usecase.execute(tx).await.unwrap();
    TestViewer { id, rx }
}

/// 接続を admin に昇格させ、受信キューを空にする
pub async fn promote(
    repository: Arc<dyn SessionRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    viewer: &mut TestViewer,
) {
    let usecase =
        AuthenticateAdminUseCase::new(repository, message_pusher, SecretString::from(TEST_SECRET));
    assert_eq!(usecase.execute(&viewer.id, TEST_SECRET).await, Ok(true));
    viewer.drain();
}
