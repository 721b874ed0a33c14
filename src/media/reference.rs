use std::fmt;
use std::path::PathBuf;

use url::Url;

/// A playable locator handed to the video surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaReference {
    LocalFile(PathBuf),
    Stream(String),
}

impl MediaReference {
    /// URI form: a percent-encoded `file://` URI for local paths, the URL
    /// itself for streams.
    pub fn uri(&self) -> String {
        match self {
            MediaReference::LocalFile(path) => Url::from_file_path(path)
                .map(String::from)
                .unwrap_or_else(|()| format!("file://{}", path.display())),
            MediaReference::Stream(url) => url.clone(),
        }
    }

    /// What the surface should be asked to open.
    ///
    /// Local files are passed as plain paths; mpv accepts both, and paths keep
    /// characters that would need percent-encoding in a URI intact.
    pub fn locator(&self) -> String {
        match self {
            MediaReference::LocalFile(path) => path.display().to_string(),
            MediaReference::Stream(url) => url.clone(),
        }
    }
}

impl fmt::Display for MediaReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.uri())
    }
}

/// A successfully resolved input: what to play and what to call it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub reference: MediaReference,
    pub title: String,
    /// Label of the streaming site that was resolved, if any.
    pub site: Option<String>,
}
