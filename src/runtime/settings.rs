use std::path::Path;

use anyhow::Context;

use crate::config;

/// Load settings from `explicit` (the `--config` flag) or the usual lookup.
///
/// A file named with `--config` must exist and parse. A discovered config is
/// optional: a broken or invalid one is logged and defaults are used.
pub fn load_settings(explicit: Option<&Path>) -> anyhow::Result<config::Settings> {
    let loaded = match explicit {
        Some(path) => {
            let s = config::Settings::load_required(path)
                .with_context(|| format!("failed to load config {}", path.display()))?;
            tracing::info!(path = %path.display(), "loaded config");
            Ok(s)
        }
        None => config::Settings::load(),
    };

    let settings = match loaded {
        Ok(s) => {
            if let Err(msg) = s.validate() {
                tracing::warn!("invalid config, using defaults: {msg}");
                config::Settings::default()
            } else {
                s
            }
        }
        Err(e) => {
            tracing::warn!("failed to load config, using defaults: {e}");
            config::Settings::default()
        }
    };
    Ok(settings)
}
