//! Clipboard text for the paste action.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),
    #[error("clipboard holds no text")]
    Empty,
}

pub trait ClipboardSource {
    /// Current clipboard text, trimmed. Empty text is an error.
    fn read_text(&mut self) -> Result<String, ClipboardError>;
}

/// The desktop clipboard via `arboard`. The handle is opened lazily so a
/// headless session can still run the player.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClipboardSource for SystemClipboard {
    fn read_text(&mut self) -> Result<String, ClipboardError> {
        if self.inner.is_none() {
            let cb =
                arboard::Clipboard::new().map_err(|e| ClipboardError::Unavailable(e.to_string()))?;
            self.inner = Some(cb);
        }
        let Some(cb) = self.inner.as_mut() else {
            return Err(ClipboardError::Unavailable("not initialized".to_string()));
        };

        match cb.get_text() {
            Ok(text) => non_empty(text),
            Err(arboard::Error::ContentNotAvailable) => Err(ClipboardError::Empty),
            Err(e) => Err(ClipboardError::Unavailable(e.to_string())),
        }
    }
}

pub(crate) fn non_empty(text: String) -> Result<String, ClipboardError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        Err(ClipboardError::Empty)
    } else {
        Ok(trimmed.to_string())
    }
}
