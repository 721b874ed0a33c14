use std::path::PathBuf;

use url::Url;

use crate::config::SiteRule;

/// How a raw input will become playable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputKind<'a> {
    /// A page on a known streaming site; needs the external resolver.
    StreamingPage(&'a SiteRule),
    /// An `http(s)` URL played as-is.
    WebVideo,
    /// Anything else is treated as a filesystem path.
    LocalFile,
}

/// Classify `raw` against the ordered `sites` table.
///
/// Only the first `window` characters of a web URL are searched, so a marker
/// that shows up later (e.g. in a query string) does not count.
pub fn classify<'a>(raw: &str, sites: &'a [SiteRule], window: usize) -> InputKind<'a> {
    if !raw.starts_with("http") {
        return InputKind::LocalFile;
    }

    // Char-based so a multi-byte prefix never splits a code point.
    let prefix: String = raw.chars().take(window).collect();
    match sites.iter().find(|rule| prefix.contains(rule.marker.as_str())) {
        Some(rule) => InputKind::StreamingPage(rule),
        None => InputKind::WebVideo,
    }
}

/// Filesystem path for a local input.
///
/// `file:` URIs are percent-decoded and may name `localhost` as their host.
/// Anything that does not parse as one is taken as a literal path, minus a
/// leading `file://`.
pub fn local_path(raw: &str) -> PathBuf {
    if raw.starts_with("file:") {
        if let Some(path) = Url::parse(raw).ok().and_then(|u| u.to_file_path().ok()) {
            return path;
        }
    }
    PathBuf::from(raw.strip_prefix("file://").unwrap_or(raw))
}
