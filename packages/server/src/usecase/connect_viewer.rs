//! UseCase: 視聴者の接続処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectViewerUseCase::execute() メソッド
//! - 接続の登録（匿名権限）と、現在の RoomState の送信
//!
//! ### なぜこのテストが必要か
//! - 新規接続のクライアントは現在の状態を即座に、かつ自分だけが受け取る必要がある
//! - 他のクライアントへのブロードキャストが発生してはならない
//!
//! ### どのような状況を想定しているか
//! - 正常系：ソース未設定の初期状態での接続
//! - 正常系：再生中の状態での接続
//! - エッジケース：既存の接続がある場合（既存の接続には何も送られない）

use std::sync::Arc;

use watchparty_shared::time::get_unix_timestamp;

use crate::domain::{
    Connection, ConnectionId, ConnectionIdFactory, MessagePusher, PusherChannel,
    SessionEvent, SessionRepository, Timestamp,
};

use super::{error::ConnectError, sequencer::CommandSequencer};

/// 視聴者接続のユースケース
pub struct ConnectViewerUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn SessionRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    /// 状態変更との順序付け
    sequencer: Arc<CommandSequencer>,
}

impl ConnectViewerUseCase {
    /// 新しい ConnectViewerUseCase を作成
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

    /// 視聴者接続を実行
    ///
    /// # Arguments
    ///
    /// * `sender` - クライアントへのメッセージ送信用チャンネル
    ///
    /// # Returns
    ///
    /// * `Ok(ConnectionId)` - 接続成功（採番された接続 ID）
    /// * `Err(ConnectError)` - 接続失敗（登録はロールバックされる）
    pub async fn execute(&self, sender: PusherChannel) -> Result<ConnectionId, ConnectError> {
        let _turn = self.sequencer.enter().await;

        // 1. 匿名の接続として登録
        let id = ConnectionIdFactory::generate();
        let connected_at = Timestamp::new(get_unix_timestamp());
        self.repository
            .add_connection(Connection::new(id, connected_at))
            .await?;

        // 2. MessagePusher にクライアントを登録
        self.message_pusher.register_client(id, sender).await;

        // 3. 現在の状態をこのクライアントにだけ送信
        let snapshot = self.repository.get_room_state().await;
        if let Err(e) = self
            .message_pusher
            .push_to(&id, &SessionEvent::StateSnapshot(snapshot))
            .await
        {
            self.message_pusher.unregister_client(&id).await;
            self.repository.remove_connection(&id).await?;
            return Err(ConnectError::InitialStateFailed(e));
        }

        Ok(id)
    }
}
