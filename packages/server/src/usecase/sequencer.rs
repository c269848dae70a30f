//! コマンドの直列化
//!
//! 「検証 → 変更 → ブロードキャスト」を 1 コマンドずつ完了させるためのロック。
//! 接続時のスナップショット送信も同じロックを通るため、新規接続のクライアントは
//! 変更順と同じ順序でイベントを受け取る。

use tokio::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
pub struct CommandSequencer {
    lock: Mutex<()>,
}

impl CommandSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// 直列化区間に入る（ガードを drop すると次のコマンドが進む）
    pub async fn enter(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().await
    }
}
