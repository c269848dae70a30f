//! Repository trait 定義
//!
//! ドメイン層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{Connection, ConnectionId, PlaybackCommand, RepositoryError, RoomState, Timestamp};

/// Session Repository trait
///
/// 共有 RoomState と接続レジストリへのインターフェース。
/// RoomState の変更は検証済みコマンドの適用（`apply_command`）に限られる。
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// 現在の RoomState のスナップショットを取得
    async fn get_room_state(&self) -> RoomState;

    /// コマンドを RoomState に適用し、適用後のスナップショットを返す
    async fn apply_command(
        &self,
        command: &PlaybackCommand,
        at: Timestamp,
    ) -> Result<RoomState, RepositoryError>;

    /// 接続を追加
    async fn add_connection(&self, connection: Connection) -> Result<(), RepositoryError>;

    /// 接続を削除（存在しなくてもエラーにしない）
    async fn remove_connection(&self, id: &ConnectionId) -> Result<(), RepositoryError>;

    /// 接続を取得
    async fn get_connection(&self, id: &ConnectionId) -> Option<Connection>;

    /// 接続を Privileged に昇格
    async fn grant_privilege(&self, id: &ConnectionId) -> Result<(), RepositoryError>;

    /// 接続中の全ての接続 ID を取得
    async fn get_all_connection_ids(&self) -> Vec<ConnectionId>;

    /// 接続数を取得
    async fn count_connections(&self) -> usize;
}
