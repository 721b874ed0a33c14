//! Native file-open dialog for picking a local video.
//!
//! The dialog is blocking, so it runs on its own thread and reports the
//! choice back over the control channel.

use std::path::PathBuf;
use std::sync::mpsc::Sender;
use std::thread;

use crate::config::DialogSettings;
use crate::mpris::ControlCmd;

/// File extensions matching a video MIME type from the allow-list.
pub fn extensions_for_mime(mime: &str) -> &'static [&'static str] {
    match mime {
        "video/mp4" => &["mp4", "m4v"],
        "video/quicktime" => &["mov", "qt"],
        "video/webm" => &["webm"],
        "video/mpeg" => &["mpeg", "mpg", "mpe", "m1v", "m2v"],
        "video/x-msvideo" => &["avi"],
        "video/3gpp" => &["3gp", "3gpp"],
        "video/ogg" => &["ogv", "ogg"],
        "video/x-matroska" => &["mkv"],
        _ => &[],
    }
}

/// Deduplicated extensions for all configured MIME types, in order.
pub fn filter_extensions(mime_types: &[String]) -> Vec<&'static str> {
    let mut out: Vec<&'static str> = Vec::new();
    for mime in mime_types {
        let exts = extensions_for_mime(mime.trim());
        if exts.is_empty() {
            tracing::debug!(%mime, "no known extensions for MIME type");
        }
        for ext in exts {
            if !out.contains(ext) {
                out.push(ext);
            }
        }
    }
    out
}

/// Where the dialog opens: configured dir, else the user's Videos dir.
pub fn start_dir(settings: &DialogSettings) -> Option<PathBuf> {
    settings.start_dir.clone().or_else(dirs::video_dir)
}

/// Show the dialog on a background thread; sends `ControlCmd::Open` with the
/// chosen path, or nothing when cancelled.
pub fn spawn_open_dialog(settings: &DialogSettings, tx: Sender<ControlCmd>) {
    let title = settings.title.clone();
    let filter_name = settings.filter_name.clone();
    let extensions = filter_extensions(&settings.mime_types);
    let dir = start_dir(settings);

    let spawned = thread::Builder::new()
        .name("open-dialog".to_string())
        .spawn(move || {
            let mut dialog = rfd::FileDialog::new().set_title(&title);
            if !extensions.is_empty() {
                dialog = dialog.add_filter(&filter_name, &extensions);
            }
            if let Some(dir) = dir {
                dialog = dialog.set_directory(dir);
            }

            match dialog.pick_file() {
                Some(path) => {
                    tracing::info!(path = %path.display(), "file chosen");
                    let _ = tx.send(ControlCmd::Open(path.display().to_string()));
                }
                None => tracing::debug!("open dialog cancelled"),
            }
        });

    if let Err(e) = spawned {
        tracing::warn!("failed to spawn open dialog: {e}");
    }
}
