//! Client reconciler.
//!
//! Applies server broadcasts to the local [`PlaybackAdapter`] and turns local
//! actions into outbound commands. A remote change applied to the adapter must
//! not come back as a local action, so applying one opens a short suppression
//! window ([`EchoGuard`]). Every operation takes the current `Instant`
//! explicitly.

use std::time::{Duration, Instant};

use watchparty_server::infrastructure::dto::websocket::{ClientMessage, RoomStateDto, ServerMessage};

use crate::playback::PlaybackAdapter;

/// Positions closer than this to the authoritative time are left alone on play.
pub const DRIFT_THRESHOLD_SECS: f64 = 0.5;

/// Echo suppression state: `Idle → ApplyingRemote { until } → Idle`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EchoGuard {
    #[default]
    Idle,
    ApplyingRemote { until: Instant },
}

impl EchoGuard {
    /// Suppression window opened by each remote change
    pub const WINDOW: Duration = Duration::from_millis(250);

    fn enter(&mut self, now: Instant) {
        *self = EchoGuard::ApplyingRemote {
            until: now + Self::WINDOW,
        };
    }

    /// Moves back to `Idle` once the window has elapsed.
    pub fn poll(&mut self, now: Instant) -> EchoGuard {
        if let EchoGuard::ApplyingRemote { until } = *self
            && now >= until
        {
            *self = EchoGuard::Idle;
        }
        *self
    }
}

/// Mirror of the room state as last applied locally
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocalPlaybackModel {
    pub current_url: Option<String>,
    pub is_playing: bool,
}

pub struct Reconciler<P: PlaybackAdapter> {
    adapter: P,
    privileged: bool,
    guard: EchoGuard,
    model: LocalPlaybackModel,
}

impl<P: PlaybackAdapter> Reconciler<P> {
    pub fn new(adapter: P) -> Self {
        Self {
            adapter,
            privileged: false,
            guard: EchoGuard::Idle,
            model: LocalPlaybackModel::default(),
        }
    }

    pub fn adapter(&self) -> &P {
        &self.adapter
    }

    pub fn is_privileged(&self) -> bool {
        self.privileged
    }

    pub fn model(&self) -> &LocalPlaybackModel {
        &self.model
    }

    pub fn guard(&mut self, now: Instant) -> EchoGuard {
        self.guard.poll(now)
    }

    /// Privilege belongs to a connection; a new connection starts without it.
    pub fn reset_privilege(&mut self) {
        self.privileged = false;
    }

    /// Apply one server message.
    pub fn apply_remote(&mut self, message: &ServerMessage, now: Instant) {
        match message {
            ServerMessage::SyncState(state) => {
                self.guard.enter(now);
                self.apply_state(state);
            }
            ServerMessage::SyncUrl { url } => {
                self.guard.enter(now);
                self.adapter.load(url);
                self.adapter.play();
                self.model.current_url = Some(url.clone());
                self.model.is_playing = true;
            }
            ServerMessage::SyncPlay { time } => {
                self.guard.enter(now);
                self.adapter.play();
                if (self.adapter.current_time() - time).abs() > DRIFT_THRESHOLD_SECS {
                    self.adapter.seek(*time);
                }
                self.model.is_playing = true;
            }
            ServerMessage::SyncPause { time } => {
                self.guard.enter(now);
                self.adapter.pause();
                self.adapter.seek(*time);
                self.model.is_playing = false;
            }
            ServerMessage::SyncSeek { time } => {
                self.guard.enter(now);
                self.adapter.seek(*time);
            }
            ServerMessage::AdminSuccess { success } => {
                if *success {
                    self.privileged = true;
                }
            }
            ServerMessage::ReceiveMessage { .. } => {}
        }
    }

    fn apply_state(&mut self, state: &RoomStateDto) {
        match &state.current_url {
            Some(url) => {
                self.adapter.load(url);
                if state.is_playing {
                    self.adapter.play();
                } else {
                    self.adapter.pause();
                }
                self.adapter.seek(state.current_time);
            }
            None => self.adapter.pause(),
        }
        self.model.current_url = state.current_url.clone();
        self.model.is_playing = state.current_url.is_some() && state.is_playing;
    }

    /// Whether a local action should be reported to the server
    fn should_emit(&mut self, now: Instant) -> bool {
        self.privileged && self.guard.poll(now) == EchoGuard::Idle
    }

    /// Adapter reported a play
    pub fn on_local_play(&mut self, now: Instant) -> Option<ClientMessage> {
        self.model.is_playing = true;
        self.should_emit(now).then(|| ClientMessage::AdminPlay {
            time: self.adapter.current_time(),
        })
    }

    /// Adapter reported a pause
    pub fn on_local_pause(&mut self, now: Instant) -> Option<ClientMessage> {
        self.model.is_playing = false;
        self.should_emit(now).then(|| ClientMessage::AdminPause {
            time: self.adapter.current_time(),
        })
    }

    /// Adapter reported a seek to `seconds`
    pub fn on_local_seek(&mut self, seconds: f64, now: Instant) -> Option<ClientMessage> {
        self.should_emit(now)
            .then_some(ClientMessage::AdminSeek { time: seconds })
    }

    /// Local play initiated from the CLI; typed commands bypass the echo guard
    pub fn play_locally(&mut self) -> Option<ClientMessage> {
        self.adapter.play();
        self.model.is_playing = true;
        self.privileged.then(|| ClientMessage::AdminPlay {
            time: self.adapter.current_time(),
        })
    }

    /// Local pause initiated from the CLI
    pub fn pause_locally(&mut self) -> Option<ClientMessage> {
        self.adapter.pause();
        self.model.is_playing = false;
        self.privileged.then(|| ClientMessage::AdminPause {
            time: self.adapter.current_time(),
        })
    }

    /// Local seek initiated from the CLI
    pub fn seek_locally(&mut self, seconds: f64) -> Option<ClientMessage> {
        self.adapter.seek(seconds);
        self.privileged
            .then_some(ClientMessage::AdminSeek { time: seconds })
    }

    /// Source changes are only requested; the source is loaded when the server echoes it.
    pub fn request_source(&self, playable_url: &str) -> Option<ClientMessage> {
        self.privileged.then(|| ClientMessage::AdminChangeUrl {
            url: playable_url.to_string(),
        })
    }
}
