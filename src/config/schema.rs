use std::path::PathBuf;

use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/pasteplay/config.toml` or `~/.config/pasteplay/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `PASTEPLAY__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub resolver: ResolverSettings,
    pub player: PlayerSettings,
    pub window: WindowSettings,
    pub dialog: DialogSettings,
    pub ui: UiSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ResolverSettings {
    /// External resolver executable (looked up on `PATH` unless absolute).
    pub program: String,
    /// Format selector passed via `-f` when the matched site has none of its own.
    pub default_format: String,
    /// Number of leading characters of a URL searched for site markers.
    pub prefix_window: usize,
    /// Kill the resolver after this many seconds. 0 waits forever.
    pub timeout_secs: u64,
    /// Title shown for plain web video URLs.
    pub web_label: String,
    /// Streaming sites that need resolving, checked in order.
    pub sites: Vec<SiteRule>,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            program: "yt-dlp".to_string(),
            default_format: "worst".to_string(),
            prefix_window: 25,
            timeout_secs: 60,
            web_label: "Web Video".to_string(),
            sites: default_sites(),
        }
    }
}

/// One streaming-site marker and how to present and resolve it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SiteRule {
    /// Substring looked for inside the URL prefix window.
    pub marker: String,
    /// Window title used once the page is resolved.
    pub label: String,
    /// Format selector for this site. Falls back to `default_format`.
    #[serde(default)]
    pub format: Option<String>,
}

impl SiteRule {
    pub fn new(marker: &str, label: &str, format: Option<&str>) -> Self {
        Self {
            marker: marker.to_string(),
            label: label.to_string(),
            format: format.map(str::to_string),
        }
    }
}

fn default_sites() -> Vec<SiteRule> {
    let broadcaster_format = Some("best[height<=?720]/best");
    vec![
        SiteRule::new("youtube", "Youtube Video", None),
        SiteRule::new("youtu.be", "Youtube Video", None),
        SiteRule::new("ardmediathek", "ARD Mediathek", broadcaster_format),
        SiteRule::new("zdf.de", "ZDF Mediathek", broadcaster_format),
        SiteRule::new("arte.tv", "ARTE", broadcaster_format),
    ]
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlayerSettings {
    /// Video surface executable.
    pub program: String,
    /// Extra arguments appended to the surface command line.
    pub extra_args: Vec<String>,
    /// IPC socket path. Defaults to a per-process path in the runtime dir.
    pub ipc_socket: Option<PathBuf>,
    /// How long to wait for the IPC socket to come up (milliseconds).
    pub connect_timeout_ms: u64,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            program: "mpv".to_string(),
            extra_args: Vec::new(),
            ipc_socket: None,
            connect_timeout_ms: 3000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    /// Title shown before anything is loaded.
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub min_width: u32,
    pub min_height: u32,
    /// Pixels added to / removed from the height when the header bar is toggled.
    pub header_height: u32,
    pub fullscreen: bool,
    pub cursor_visible: bool,
    pub header_visible: bool,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "Video Player".to_string(),
            width: 640,
            height: 406,
            min_width: 320,
            min_height: 230,
            header_height: 46,
            fullscreen: false,
            cursor_visible: true,
            header_visible: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DialogSettings {
    /// Dialog window title.
    pub title: String,
    /// Name of the file filter shown in the dialog.
    pub filter_name: String,
    /// MIME types offered by the filter.
    pub mime_types: Vec<String>,
    /// Initial directory. Defaults to the platform "Videos" directory.
    pub start_dir: Option<PathBuf>,
}

impl Default for DialogSettings {
    fn default() -> Self {
        Self {
            title: "Open".to_string(),
            filter_name: "Video Files".to_string(),
            mime_types: [
                "video/mp4",
                "video/quicktime",
                "video/webm",
                "video/mpeg",
                "video/x-msvideo",
                "video/3gpp",
                "video/ogg",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            start_dir: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// Color scheme used at startup.
    pub theme: ThemeSetting,
    /// Text rendered inside the header bar box.
    pub header_text: String,
    /// Register on the session bus as an MPRIS player.
    pub mpris: bool,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            theme: ThemeSetting::Dark,
            header_text: " ~ paste a link, press p ~ ".to_string(),
            mpris: true,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ThemeSetting {
    #[serde(alias = "day")]
    Light,
    #[serde(alias = "night")]
    Dark,
}
