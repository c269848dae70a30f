//! UseCase: RoomState の取得

use std::sync::Arc;

use crate::domain::{RoomState, SessionRepository};

/// RoomState 取得のユースケース（読み取り専用）
pub struct GetRoomStateUseCase {
    repository: Arc<dyn SessionRepository>,
}

impl GetRoomStateUseCase {
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self { repository }
    }

    /// 現在の RoomState と接続数を返す
    pub async fn execute(&self) -> (RoomState, usize) {
        let state = self.repository.get_room_state().await;
        let connections = self.repository.count_connections().await;
        (state, connections)
    }
}
