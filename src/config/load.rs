use std::{
    env,
    path::{Path, PathBuf},
};

use super::schema::Settings;

/// Configuration loading helpers.
///
/// `Settings::load` reads an optional config file, then environment variables
/// (prefix `PASTEPLAY__`) on top, and falls back to struct defaults.
/// `Settings::load_required` does the same for a file that must exist.
impl Settings {
    /// Load settings from the resolved config path and the environment.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        Self::load_from(resolve_config_path().as_deref())
    }

    /// Load settings from an optional file plus the environment. A missing
    /// file is the same as an empty one.
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, ::config::ConfigError> {
        Self::build(config_path, false)
    }

    /// Load settings from a file the user named explicitly; a missing file is
    /// an error.
    pub fn load_required(config_path: &Path) -> Result<Self, ::config::ConfigError> {
        Self::build(Some(config_path), true)
    }

    fn build(config_path: Option<&Path>, required: bool) -> Result<Self, ::config::ConfigError> {
        let mut builder = ::config::Config::builder();

        if let Some(path) = config_path {
            builder = builder.add_source(::config::File::from(path).required(required));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("PASTEPLAY")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        if self.resolver.program.trim().is_empty() {
            return Err("resolver.program must not be empty".to_string());
        }
        if self.resolver.prefix_window == 0 {
            return Err("resolver.prefix_window must be >= 1".to_string());
        }
        if let Some(rule) = self.resolver.sites.iter().find(|r| r.marker.is_empty()) {
            return Err(format!("resolver.sites: empty marker for {:?}", rule.label));
        }
        if self.player.program.trim().is_empty() {
            return Err("player.program must not be empty".to_string());
        }
        let w = &self.window;
        if w.width < w.min_width || w.height < w.min_height {
            return Err(format!(
                "window size {}x{} is below the minimum {}x{}",
                w.width, w.height, w.min_width, w.min_height
            ));
        }
        Ok(())
    }
}

/// Resolve the config path from `PASTEPLAY_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("PASTEPLAY_CONFIG_PATH") {
        return Some(PathBuf::from(p));
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/pasteplay/config.toml`
/// or `~/.config/pasteplay/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".config"))
    };

    config_home.map(|d| d.join("pasteplay").join("config.toml"))
}
