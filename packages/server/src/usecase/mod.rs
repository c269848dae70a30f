//! UseCase 層
//!
//! 接続・認証・再生制御・チャットの各ユースケースを提供します。
//! 共有 RoomState を変更する経路（接続時のスナップショット送信と再生制御）は
//! `CommandSequencer` で直列化されます。

mod authenticate_admin;
mod connect_viewer;
mod control_playback;
mod disconnect_viewer;
mod error;
mod exchange_identity;
mod get_room_state;
mod relay_chat;
mod sequencer;

#[cfg(test)]
mod test_support;

pub use authenticate_admin::AuthenticateAdminUseCase;
pub use connect_viewer::ConnectViewerUseCase;
pub use control_playback::ControlPlaybackUseCase;
pub use disconnect_viewer::DisconnectViewerUseCase;
pub use error::{
    AuthenticateError, ConnectError, ControlPlaybackError, ExchangeIdentityError, RelayChatError,
};
pub use exchange_identity::ExchangeIdentityUseCase;
pub use get_room_state::GetRoomStateUseCase;
pub use relay_chat::RelayChatUseCase;
pub use sequencer::CommandSequencer;
