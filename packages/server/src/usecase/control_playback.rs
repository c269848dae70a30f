//! UseCase: 再生制御（ソース変更・再生・一時停止・シーク）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ControlPlaybackUseCase::execute() メソッド
//! - 権限チェック、RoomState の更新、全接続へのブロードキャスト
//!
//! ### なぜこのテストが必要か
//! - 匿名接続からのコマンドは状態を変えず、何もブロードキャストしてはならない
//! - admin のコマンドは送信者を含む全接続に、受理された順で届く必要がある
//!
//! ### どのような状況を想定しているか
//! - 正常系：admin によるソース変更・再生・一時停止・シーク
//! - 異常系：匿名接続からのコマンド、ソース未設定での再生
//! - エッジケース：admin が複数いる場合、同時に発行されたコマンド

use std::sync::Arc;

use watchparty_shared::time::Clock;

use crate::domain::{
    ConnectionId, MessagePusher, PlaybackCommand, RoomState, SessionEvent, SessionRepository,
    Timestamp,
};

use super::{error::ControlPlaybackError, sequencer::CommandSequencer};

/// 再生制御のユースケース
pub struct ControlPlaybackUseCase {
    repository: Arc<dyn SessionRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    sequencer: Arc<CommandSequencer>,
    clock: Arc<dyn Clock>,
}

impl ControlPlaybackUseCase {
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        sequencer: Arc<CommandSequencer>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            sequencer,
            clock,
        }
    }

    /// 再生制御コマンドを実行
    ///
    /// 検証・状態更新・ブロードキャストは `CommandSequencer` の内側で行うため、
    /// 全ての接続は受理された順序でイベントを受け取る。
    ///
    /// # Returns
    ///
    /// * `Ok(RoomState)` - 適用後の RoomState
    /// * `Err(ControlPlaybackError::PrivilegeDenied)` - 匿名接続からのコマンド（状態は変更なし）
    /// * `Err(ControlPlaybackError::InvalidCommand)` - 現在の状態に適用できないコマンド
    pub async fn execute(
        &self,
        id: &ConnectionId,
        command: PlaybackCommand,
    ) -> Result<RoomState, ControlPlaybackError> {
        let _turn = self.sequencer.enter().await;

        // 1. 権限チェック
        let connection = self
            .repository
            .get_connection(id)
            .await
            .ok_or_else(|| ControlPlaybackError::ConnectionNotFound(id.to_string()))?;
        if !connection.is_privileged() {
            return Err(ControlPlaybackError::PrivilegeDenied);
        }

        // 2. RoomState に適用
        let at = Timestamp::new(self.clock.now_millis());
        let state = self
            .repository
            .apply_command(&command, at)
            .await
            .map_err(ControlPlaybackError::InvalidCommand)?;
        tracing::debug!("Applied '{}' from connection '{}'", command.name(), id);

        // 3. 送信者を含む全接続にブロードキャスト
        let targets = self.repository.get_all_connection_ids().await;
        self.message_pusher
            .broadcast(targets, &SessionEvent::from(command))
            .await?;

        Ok(state)
    }
}
