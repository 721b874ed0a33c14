//! The video surface: the window that actually shows the picture.
//!
//! `MediaSurface` is what the runtime talks to. `MpvSurface` implements it by
//! running `mpv` in idle mode and driving it over its JSON IPC socket.

mod ipc;
mod mpv;

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::media::MediaReference;

pub use ipc::{IpcClient, command_line};
pub use mpv::MpvSurface;

#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("could not connect to IPC socket {}: {source}", .path.display())]
    Connect {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("video surface I/O: {0}")]
    Io(#[from] io::Error),

    #[error("failed to encode IPC command: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("video surface exited")]
    Exited,
}

/// Operations the runtime needs from whatever renders the video.
pub trait MediaSurface {
    fn load(&mut self, media: &MediaReference) -> Result<(), PlayerError>;
    fn set_title(&mut self, title: &str) -> Result<(), PlayerError>;
    fn set_fullscreen(&mut self, on: bool) -> Result<(), PlayerError>;
    fn set_cursor_visible(&mut self, visible: bool) -> Result<(), PlayerError>;
    /// Show or hide the window decorations (title bar).
    fn set_decorations(&mut self, visible: bool) -> Result<(), PlayerError>;
    fn set_geometry(&mut self, width: u32, height: u32) -> Result<(), PlayerError>;
    fn set_paused(&mut self, paused: bool) -> Result<(), PlayerError>;
    fn stop(&mut self) -> Result<(), PlayerError>;
    /// False once the surface process is gone (e.g. the user closed it).
    fn is_alive(&mut self) -> bool;
    fn quit(&mut self) -> Result<(), PlayerError>;
}
