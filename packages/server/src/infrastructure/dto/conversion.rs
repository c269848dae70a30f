//! Conversion logic between DTOs and domain entities.

use crate::domain::{IdentityProfile, RoomState, SessionEvent};
use crate::infrastructure::dto::{http as http_dto, websocket as dto};

// ========================================
// Domain Entity → DTO
// ========================================

impl From<&RoomState> for dto::RoomStateDto {
    fn from(model: &RoomState) -> Self {
        Self {
            current_url: model.current_url().map(|url| url.as_str().to_string()),
            is_playing: model.is_playing(),
            current_time: model.current_time().seconds(),
            last_updated: model.last_updated().value(),
        }
    }
}

impl From<&SessionEvent> for dto::ServerMessage {
    fn from(event: &SessionEvent) -> Self {
        match event {
            SessionEvent::StateSnapshot(state) => dto::ServerMessage::SyncState(state.into()),
            SessionEvent::SourceChanged(url) => dto::ServerMessage::SyncUrl {
                url: url.as_str().to_string(),
            },
            SessionEvent::Played(time) => dto::ServerMessage::SyncPlay {
                time: time.seconds(),
            },
            SessionEvent::Paused(time) => dto::ServerMessage::SyncPause {
                time: time.seconds(),
            },
            SessionEvent::Seeked(time) => dto::ServerMessage::SyncSeek {
                time: time.seconds(),
            },
            SessionEvent::AdminResult(success) => {
                dto::ServerMessage::AdminSuccess { success: *success }
            }
            SessionEvent::ChatPosted(message) => dto::ServerMessage::ReceiveMessage {
                user: message.user.as_str().to_string(),
                text: message.text.as_str().to_string(),
                avatar: message.avatar.clone(),
            },
        }
    }
}

impl From<IdentityProfile> for http_dto::IdentityProfileDto {
    fn from(model: IdentityProfile) -> Self {
        Self {
            username: model.username,
            id: model.id,
            avatar: model.avatar,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        ChatMessage, ChatText, DisplayName, MediaUrl, PlaybackCommand, PlaybackPosition, Timestamp,
    };

    #[test]
    fn test_room_state_to_dto() {
        // テスト項目: RoomState が RoomStateDto に変換される
        // given (前提条件):
        let mut state = RoomState::new(Timestamp::new(1000));
        state
            .apply(
                &PlaybackCommand::ChangeSource(MediaUrl::new("v1".to_string()).unwrap()),
                Timestamp::new(2000),
            )
            .unwrap();

        // when (操作):
        let dto: dto::RoomStateDto = (&state).into();

        // then (期待する結果):
        assert_eq!(dto.current_url.as_deref(), Some("v1"));
        assert!(dto.is_playing);
        assert_eq!(dto.current_time, 0.0);
        assert_eq!(dto.last_updated, 2000);
    }

    #[test]
    fn test_playback_events_to_server_messages() {
        // テスト項目: 再生系イベントが対応する sync_* メッセージに変換される
        // given (前提条件):
        let time = PlaybackPosition::new(12.0).unwrap();

        // when (操作):
        let play = dto::ServerMessage::from(&SessionEvent::Played(time));
        let pause = dto::ServerMessage::from(&SessionEvent::Paused(time));
        let seek = dto::ServerMessage::from(&SessionEvent::Seeked(time));

        // then (期待する結果):
        assert_eq!(play, dto::ServerMessage::SyncPlay { time: 12.0 });
        assert_eq!(pause, dto::ServerMessage::SyncPause { time: 12.0 });
        assert_eq!(seek, dto::ServerMessage::SyncSeek { time: 12.0 });
    }

    #[test]
    fn test_chat_event_to_receive_message() {
        // テスト項目: チャットイベントが receive_message に変換される
        // given (前提条件):
        let message = ChatMessage::new(
            DisplayName::new("alice".to_string()).unwrap(),
            ChatText::new("hello".to_string()).unwrap(),
            Some("https://a/b.png".to_string()),
        );

        // when (操作):
        let msg = dto::ServerMessage::from(&SessionEvent::ChatPosted(message));

        // then (期待する結果):
        assert_eq!(
            msg,
            dto::ServerMessage::ReceiveMessage {
                user: "alice".to_string(),
                text: "hello".to_string(),
                avatar: "https://a/b.png".to_string(),
            }
        );
    }
}
