//! ドメイン層
//!
//! 共有セッション（RoomState）と接続ごとの権限を表現するモデル、
//! およびインフラ層が実装するインターフェース（trait）を定義します。

pub mod entity;
pub mod error;
pub mod factory;
pub mod identity;
pub mod message_pusher;
pub mod repository;
pub mod value_object;

pub use entity::{
    ChatMessage, Connection, DEFAULT_AVATAR_URL, PlaybackCommand, Privilege, RoomState,
    SessionEvent,
};
pub use error::{MessagePushError, RepositoryError, RoomStateError, ValueObjectError};
pub use factory::ConnectionIdFactory;
pub use identity::{IdentityExchange, IdentityExchangeError, IdentityProfile, IdentityRequest};
pub use message_pusher::{MessagePusher, PusherChannel};
pub use repository::SessionRepository;
pub use value_object::{ChatText, ConnectionId, DisplayName, MediaUrl, PlaybackPosition, Timestamp};

#[cfg(test)]
pub use identity::MockIdentityExchange;
#[cfg(test)]
pub use message_pusher::MockMessagePusher;
