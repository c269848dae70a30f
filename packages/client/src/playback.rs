//! Playback Adapter: the capability surface the reconciler drives.
//!
//! The rendering technology behind it is opaque; the CLI uses [`HeadlessPlayer`],
//! which only keeps a clock-based playback position.

use std::sync::Arc;

use watchparty_shared::time::Clock;

/// Playback capabilities used identically regardless of the renderer.
#[cfg_attr(test, mockall::automock)]
pub trait PlaybackAdapter: Send {
    /// Load a new source (position resets to 0, paused)
    fn load(&mut self, url: &str);
    fn play(&mut self);
    fn pause(&mut self);
    /// Jump to `seconds`
    fn seek(&mut self, seconds: f64);
    /// Current position in seconds
    fn current_time(&self) -> f64;
}

/// A player without a screen: tracks source, play state and position.
pub struct HeadlessPlayer {
    clock: Arc<dyn Clock>,
    source: Option<String>,
    playing: bool,
    /// Position at `anchor_millis`
    anchor_position: f64,
    anchor_millis: i64,
}

impl HeadlessPlayer {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        let anchor_millis = clock.now_millis();
        Self {
            clock,
            source: None,
            playing: false,
            anchor_position: 0.0,
            anchor_millis,
        }
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    fn reanchor(&mut self, position: f64) {
        self.anchor_position = position;
        self.anchor_millis = self.clock.now_millis();
    }
}

impl PlaybackAdapter for HeadlessPlayer {
    fn load(&mut self, url: &str) {
        self.source = Some(url.to_string());
        self.playing = false;
        self.reanchor(0.0);
    }

    fn play(&mut self) {
        if self.source.is_none() || self.playing {
            return;
        }
        let position = self.current_time();
        self.reanchor(position);
        self.playing = true;
    }

    fn pause(&mut self) {
        if !self.playing {
            return;
        }
        let position = self.current_time();
        self.reanchor(position);
        self.playing = false;
    }

    fn seek(&mut self, seconds: f64) {
        if self.source.is_none() || !seconds.is_finite() {
            return;
        }
        self.reanchor(seconds.max(0.0));
    }

    fn current_time(&self) -> f64 {
        if !self.playing {
            return self.anchor_position;
        }
        let elapsed = (self.clock.now_millis() - self.anchor_millis).max(0) as f64 / 1000.0;
        self.anchor_position + elapsed
    }
}
