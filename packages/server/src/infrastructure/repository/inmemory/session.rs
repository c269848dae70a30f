//! InMemory Session Repository 実装
//!
//! ドメイン層が定義する SessionRepository trait の具体的な実装。
//! RoomState と接続レジストリをプロセスのメモリ上に保持します（永続化なし）。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    Connection, ConnectionId, PlaybackCommand, RepositoryError, RoomState, SessionRepository,
    Timestamp,
};

/// インメモリ Session Repository 実装
pub struct InMemorySessionRepository {
    /// 共有 RoomState（サーバー起動時に作成され、プロセス終了まで生存）
    room_state: Arc<Mutex<RoomState>>,
    /// 接続中のクライアント
    connections: Arc<Mutex<HashMap<ConnectionId, Connection>>>,
}

impl InMemorySessionRepository {
    /// 新しい InMemorySessionRepository を作成
    pub fn new(room_state: Arc<Mutex<RoomState>>) -> Self {
        Self {
            room_state,
            connections: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn get_room_state(&self) -> RoomState {
        let room_state = self.room_state.lock().await;
        room_state.clone()
    }

    async fn apply_command(
        &self,
        command: &PlaybackCommand,
        at: Timestamp,
    ) -> Result<RoomState, RepositoryError> {
        let mut room_state = self.room_state.lock().await;
        room_state.apply(command, at)?;
        Ok(room_state.clone())
    }

    async fn add_connection(&self, connection: Connection) -> Result<(), RepositoryError> {
        let mut connections = self.connections.lock().await;
        if connections.contains_key(&connection.id) {
            return Err(RepositoryError::DuplicateConnection(
                connection.id.to_string(),
            ));
        }
        connections.insert(connection.id, connection);
        Ok(())
    }

    async fn remove_connection(&self, id: &ConnectionId) -> Result<(), RepositoryError> {
        let mut connections = self.connections.lock().await;
        connections.remove(id);
        Ok(())
    }

    async fn get_connection(&self, id: &ConnectionId) -> Option<Connection> {
        let connections = self.connections.lock().await;
        connections.get(id).cloned()
    }

    async fn grant_privilege(&self, id: &ConnectionId) -> Result<(), RepositoryError> {
        let mut connections = self.connections.lock().await;
        let connection = connections
            .get_mut(id)
            .ok_or_else(|| RepositoryError::ConnectionNotFound(id.to_string()))?;
        connection.grant_privilege();
        Ok(())
    }

    async fn get_all_connection_ids(&self) -> Vec<ConnectionId> {
        let connections = self.connections.lock().await;
        connections.keys().copied().collect()
    }

    async fn count_connections(&self) -> usize {
        let connections = self.connections.lock().await;
        connections.len()
    }
}
