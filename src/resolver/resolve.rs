use std::io;
use std::time::Duration;

use crate::config::{ResolverSettings, SiteRule};
use crate::media::{self, InputKind, MediaReference, Resolution};

use super::command::{CommandRunner, SystemRunner};
use super::error::ResolveError;

/// Turns raw input into a `Resolution`, shelling out for streaming pages.
///
/// Nothing is cached: every call for a streaming page runs the resolver again.
#[derive(Clone)]
pub struct Resolver<R = SystemRunner> {
    settings: ResolverSettings,
    runner: R,
}

impl Resolver<SystemRunner> {
    pub fn new(settings: ResolverSettings) -> Self {
        Self::with_runner(settings, SystemRunner::default())
    }
}

impl<R: CommandRunner> Resolver<R> {
    pub fn with_runner(settings: ResolverSettings, runner: R) -> Self {
        Self { settings, runner }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub fn classify<'a>(&'a self, raw: &str) -> InputKind<'a> {
        media::classify(raw, &self.settings.sites, self.settings.prefix_window)
    }

    /// Resolve `raw`. Only streaming pages touch the external process.
    pub fn resolve(&self, raw: &str) -> Result<Resolution, ResolveError> {
        match self.classify(raw) {
            InputKind::StreamingPage(rule) => {
                let url = self.resolve_stream(raw, rule)?;
                Ok(Resolution {
                    reference: MediaReference::Stream(url),
                    title: rule.label.clone(),
                    site: Some(rule.label.clone()),
                })
            }
            InputKind::WebVideo => Ok(Resolution {
                reference: MediaReference::Stream(raw.to_string()),
                title: self.settings.web_label.clone(),
                site: None,
            }),
            InputKind::LocalFile => {
                let path = media::local_path(raw);
                Ok(Resolution {
                    title: media::title_or_raw(&path.to_string_lossy()),
                    reference: MediaReference::LocalFile(path),
                    site: None,
                })
            }
        }
    }

    /// Arguments for the external resolver: `-g -f <format> <url>`.
    pub fn command_args(&self, url: &str, rule: &SiteRule) -> Vec<String> {
        let format = rule
            .format
            .as_deref()
            .unwrap_or(&self.settings.default_format);
        vec![
            "-g".to_string(),
            "-f".to_string(),
            format.to_string(),
            url.to_string(),
        ]
    }

    fn resolve_stream(&self, url: &str, rule: &SiteRule) -> Result<String, ResolveError> {
        let program = self.settings.program.clone();
        let args = self.command_args(url, rule);
        let timeout = match self.settings.timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };

        tracing::debug!(%program, ?args, site = %rule.label, "running resolver");

        let output = match self.runner.run(&program, &args, timeout) {
            Ok(output) => output,
            Err(e) if e.kind() == io::ErrorKind::TimedOut => {
                return Err(ResolveError::TimedOut {
                    program,
                    secs: self.settings.timeout_secs,
                });
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {
                return Err(ResolveError::Cancelled { program });
            }
            Err(source) => return Err(ResolveError::Launch { program, source }),
        };

        if !output.success {
            return Err(ResolveError::Failed {
                program,
                code: output.code,
                output: output.combined(),
            });
        }

        match first_stream_url(&output.stdout) {
            Some(url) => Ok(url.to_string()),
            None => Err(ResolveError::NoStreamUrl {
                program,
                output: output.combined(),
            }),
        }
    }
}

/// First line of resolver output that looks like a URL.
///
/// With `-g` the resolver prints one URL per selected stream; anything else on
/// stdout (warnings) is skipped.
pub fn first_stream_url(stdout: &str) -> Option<&str> {
    stdout
        .lines()
        .map(str::trim)
        .find(|line| line.starts_with("http"))
}
