//! 値オブジェクトの生成ファクトリ

use uuid::Uuid;

use super::value_object::ConnectionId;

/// ConnectionId を採番するファクトリ
pub struct ConnectionIdFactory;

impl ConnectionIdFactory {
    /// 新しい ConnectionId（UUID v4）を生成
    pub fn generate() -> ConnectionId {
        ConnectionId::new(Uuid::new_v4())
    }
}
