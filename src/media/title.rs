/// Derive a display title from the last `/`-segment of `raw`, minus its final
/// `.`-extension.
///
/// Returns `None` when there is no `/`, no extension, or nothing left once the
/// extension is removed (e.g. `/home/me/.hidden`).
pub fn display_title(raw: &str) -> Option<String> {
    let (_, segment) = raw.rsplit_once('/')?;
    let (stem, _ext) = segment.rsplit_once('.')?;
    if stem.is_empty() {
        return None;
    }
    Some(stem.to_string())
}

/// `display_title`, falling back to the raw input itself.
pub fn title_or_raw(raw: &str) -> String {
    display_title(raw).unwrap_or_else(|| raw.to_string())
}
