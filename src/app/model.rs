//! Application model types: `App`, `PlaybackState` and request bookkeeping.
//!
//! `App` is the window state: what is loaded, what is being resolved, and
//! the fullscreen / pointer / header-bar flags the shortcuts flip.

use crate::config::WindowSettings;
use crate::media::Resolution;
use crate::resolver::ResolveOutcome;

/// The playback state of the surface as far as we know it.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// A request that has been issued but not yet committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest {
    pub seq: u64,
    pub input: String,
    /// Label of the site being resolved.
    pub label: String,
}

/// What happened to an outcome handed to `App::apply_outcome`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    /// New media is now current and should be loaded.
    Committed,
    /// Resolution failed; current media is untouched.
    Rejected(String),
    /// A newer request was issued since; outcome dropped.
    Stale,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Geometry {
    pub width: u32,
    pub height: u32,
}

/// The main application model.
pub struct App {
    pub title: String,
    pub now_playing: Option<Resolution>,
    pub pending: Option<PendingRequest>,
    pub last_error: Option<String>,
    pub status: Option<String>,
    pub playback: PlaybackState,

    pub fullscreen: bool,
    pub cursor_visible: bool,
    pub header_visible: bool,
    pub geometry: Geometry,

    latest_seq: u64,
    header_height: u32,
    min_height: u32,
    /// Height actually taken off the window when the header was last hidden.
    header_shrink: Option<u32>,
}

impl App {
    /// Create a new `App` seeded from window settings.
    pub fn new(window: &WindowSettings) -> Self {
        Self {
            title: window.title.clone(),
            now_playing: None,
            pending: None,
            last_error: None,
            status: None,
            playback: PlaybackState::Stopped,

            fullscreen: window.fullscreen,
            cursor_visible: window.cursor_visible,
            header_visible: window.header_visible,
            geometry: Geometry {
                width: window.width,
                height: window.height,
            },

            latest_seq: 0,
            header_height: window.header_height,
            min_height: window.min_height,
            header_shrink: None,
        }
    }

    /// Sequence number of the most recent request.
    #[cfg(test)]
    pub fn latest_seq(&self) -> u64 {
        self.latest_seq
    }

    /// Issue a new request number. Anything still in flight becomes stale.
    pub fn begin_request(&mut self, input: &str) -> u64 {
        self.latest_seq += 1;
        self.pending = None;
        tracing::debug!(seq = self.latest_seq, input, "new media request");
        self.latest_seq
    }

    /// Record that request `seq` is waiting on the external resolver.
    pub fn mark_resolving(&mut self, seq: u64, input: &str, label: &str) {
        if seq != self.latest_seq {
            return;
        }
        self.pending = Some(PendingRequest {
            seq,
            input: input.to_string(),
            label: label.to_string(),
        });
        self.status = Some(format!("Resolving {label}…"));
    }

    /// Commit or reject an outcome, unless a newer request superseded it.
    pub fn apply_outcome(&mut self, outcome: ResolveOutcome) -> Applied {
        if outcome.seq != self.latest_seq {
            return Applied::Stale;
        }
        self.pending = None;

        match outcome.result {
            Ok(resolution) => {
                self.title = resolution.title.clone();
                self.now_playing = Some(resolution);
                self.last_error = None;
                self.status = None;
                self.playback = PlaybackState::Playing;
                Applied::Committed
            }
            Err(e) => {
                let msg = e.to_string();
                self.last_error = Some(msg.clone());
                self.status = None;
                Applied::Rejected(msg)
            }
        }
    }

    #[cfg(test)]
    pub fn is_resolving(&self) -> bool {
        self.pending.is_some()
    }

    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.last_error = Some(msg.into());
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status = Some(msg.into());
    }

    /// Flip fullscreen; returns the new value.
    pub fn toggle_fullscreen(&mut self) -> bool {
        self.fullscreen = !self.fullscreen;
        self.fullscreen
    }

    /// Flip pointer visibility; returns the new value.
    pub fn toggle_cursor(&mut self) -> bool {
        self.cursor_visible = !self.cursor_visible;
        self.cursor_visible
    }

    /// Flip the header bar and keep the picture the same size: hiding the
    /// header shrinks the window by its height (never below the minimum),
    /// showing it gives back exactly what hiding took.
    pub fn toggle_header(&mut self) -> bool {
        self.header_visible = !self.header_visible;
        let height = self.geometry.height;
        if self.header_visible {
            let grow = self.header_shrink.take().unwrap_or(self.header_height);
            self.geometry.height = height.saturating_add(grow);
        } else {
            let shrunk = height
                .saturating_sub(self.header_height)
                .max(self.min_height)
                .min(height);
            self.header_shrink = Some(height - shrunk);
            self.geometry.height = shrunk;
        }
        self.header_visible
    }

    /// Next playback state for a play/pause toggle, or `None` with nothing loaded.
    pub fn toggle_pause(&mut self) -> Option<PlaybackState> {
        self.now_playing.as_ref()?;
        self.playback = match self.playback {
            PlaybackState::Playing => PlaybackState::Paused,
            PlaybackState::Paused | PlaybackState::Stopped => PlaybackState::Playing,
        };
        Some(self.playback)
    }

    pub fn stop(&mut self) {
        self.playback = PlaybackState::Stopped;
    }
}
