//! Shared application state.

use std::{collections::HashMap, sync::Arc};

use secrecy::SecretString;
use tokio::sync::Mutex;
use watchparty_shared::time::{Clock, SystemClock};

use crate::{
    domain::{IdentityExchange, MessagePusher, RoomState, SessionRepository, Timestamp},
    infrastructure::{
        message_pusher::WebSocketMessagePusher, repository::InMemorySessionRepository,
    },
    usecase::{
        AuthenticateAdminUseCase, CommandSequencer, ConnectViewerUseCase, ControlPlaybackUseCase,
        DisconnectViewerUseCase, ExchangeIdentityUseCase, GetRoomStateUseCase, RelayChatUseCase,
    },
};

/// Shared application state
///
/// ハンドラはユースケースだけに依存する。RoomState と admin シークレットは
/// それぞれ Repository と AuthenticateAdminUseCase が所有する。
pub struct AppState {
    /// ConnectViewerUseCase（視聴者接続のユースケース）
    pub connect_viewer_usecase: Arc<ConnectViewerUseCase>,
    /// DisconnectViewerUseCase（視聴者切断のユースケース）
    pub disconnect_viewer_usecase: Arc<DisconnectViewerUseCase>,
    /// AuthenticateAdminUseCase（admin 認証のユースケース）
    pub authenticate_admin_usecase: Arc<AuthenticateAdminUseCase>,
    /// ControlPlaybackUseCase（再生制御のユースケース）
    pub control_playback_usecase: Arc<ControlPlaybackUseCase>,
    /// RelayChatUseCase（チャット中継のユースケース）
    pub relay_chat_usecase: Arc<RelayChatUseCase>,
    /// GetRoomStateUseCase（RoomState 取得のユースケース）
    pub get_room_state_usecase: Arc<GetRoomStateUseCase>,
    /// ExchangeIdentityUseCase（認可コード交換のユースケース）
    pub exchange_identity_usecase: Arc<ExchangeIdentityUseCase>,
}

impl AppState {
    /// Repository と MessagePusher からユースケース一式を組み立てる
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
        admin_secret: SecretString,
        identity: Option<Arc<dyn IdentityExchange>>,
    ) -> Self {
        let sequencer = Arc::new(CommandSequencer::new());

        Self {
            connect_viewer_usecase: Arc::new(ConnectViewerUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                sequencer.clone(),
            )),
            disconnect_viewer_usecase: Arc::new(DisconnectViewerUseCase::new(
                repository.clone(),
                message_pusher.clone(),
            )),
            authenticate_admin_usecase: Arc::new(AuthenticateAdminUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                admin_secret,
            )),
            control_playback_usecase: Arc::new(ControlPlaybackUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                sequencer.clone(),
                clock,
            )),
            relay_chat_usecase: Arc::new(RelayChatUseCase::new(
                repository.clone(),
                message_pusher,
                sequencer,
            )),
            get_room_state_usecase: Arc::new(GetRoomStateUseCase::new(repository)),
            exchange_identity_usecase: Arc::new(ExchangeIdentityUseCase::new(identity)),
        }
    }

    /// インメモリの Repository と WebSocket の MessagePusher で組み立てる
    pub fn in_memory(
        admin_secret: SecretString,
        identity: Option<Arc<dyn IdentityExchange>>,
    ) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let room_state = Arc::new(Mutex::new(RoomState::new(Timestamp::new(
            clock.now_millis(),
        ))));
        let repository = Arc::new(InMemorySessionRepository::new(room_state));
        let message_pusher = Arc::new(WebSocketMessagePusher::new(Arc::new(Mutex::new(
            HashMap::new(),
        ))));

        Self::new(repository, message_pusher, clock, admin_secret, identity)
    }
}
