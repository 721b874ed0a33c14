//! Everything the event loop drives, in one place.
//!
//! `Session` ties the app model to the video surface, the clipboard, the
//! resolver worker and MPRIS. Keys and control commands map onto its methods;
//! nothing here touches the terminal.

use crate::app::{App, Applied, PlaybackState};
use crate::clipboard::ClipboardSource;
use crate::media::InputKind;
use crate::mpris::{ControlCmd, MprisHandle};
use crate::player::{MediaSurface, PlayerError};
use crate::resolver::{
    CommandRunner, ResolveOutcome, ResolveRequest, Resolver, ResolverWorker, SystemRunner,
};
use crate::theme::ThemeController;

use super::mpris_sync::update_mpris;

pub struct Session<S, C, R = SystemRunner> {
    pub app: App,
    pub theme: ThemeController,
    surface: S,
    clipboard: C,
    resolver: Resolver<R>,
    worker: ResolverWorker,
    mpris: MprisHandle,
}

impl<S, C, R> Session<S, C, R>
where
    S: MediaSurface,
    C: ClipboardSource,
    R: CommandRunner + Clone + Send + 'static,
{
    /// Build a session and start the resolver worker with a copy of `resolver`.
    pub fn new(
        app: App,
        theme: ThemeController,
        surface: S,
        clipboard: C,
        resolver: Resolver<R>,
        mpris: MprisHandle,
    ) -> Self {
        let worker = ResolverWorker::spawn(resolver.clone());
        update_mpris(&mpris, &app);
        Self {
            app,
            theme,
            surface,
            clipboard,
            resolver,
            worker,
            mpris,
        }
    }

    /// Feed one raw input (path or URL) into the pipeline.
    ///
    /// Streaming pages go to the worker; local files and plain web URLs are
    /// resolved inline since they never start a process. Either way the input
    /// gets a fresh sequence number, so an older resolution still in flight
    /// can no longer win.
    pub fn open_input(&mut self, raw: &str) {
        let input = raw.trim();
        if input.is_empty() {
            self.app.set_status("Nothing to open");
            return;
        }

        let seq = self.app.begin_request(input);
        let site = match self.resolver.classify(input) {
            InputKind::StreamingPage(rule) => Some(rule.label.clone()),
            InputKind::WebVideo | InputKind::LocalFile => None,
        };

        match site {
            Some(label) => {
                let request = ResolveRequest {
                    seq,
                    input: input.to_string(),
                };
                if self.worker.submit(request).is_err() {
                    tracing::error!(seq, input, "resolver worker is not running");
                    self.app.set_error("Resolver is not running");
                    return;
                }
                tracing::info!(seq, input, site = %label, "resolving streaming page");
                self.app.mark_resolving(seq, input, &label);
            }
            None => {
                let result = self.resolver.resolve(input);
                self.apply(ResolveOutcome {
                    seq,
                    input: input.to_string(),
                    result,
                });
            }
        }
    }

    /// Apply every outcome the worker has finished so far.
    pub fn poll_resolver(&mut self) {
        while let Some(outcome) = self.worker.try_recv() {
            self.apply(outcome);
        }
    }

    fn apply(&mut self, outcome: ResolveOutcome) {
        let seq = outcome.seq;
        let input = outcome.input.clone();
        match self.app.apply_outcome(outcome) {
            Applied::Committed => self.load_current(),
            Applied::Rejected(msg) => tracing::warn!(seq, %input, "resolution failed: {msg}"),
            Applied::Stale => tracing::debug!(seq, %input, "dropping superseded outcome"),
        }
    }

    /// Hand the committed media to the surface and retitle the window.
    fn load_current(&mut self) {
        let Some(current) = self.app.now_playing.clone() else {
            return;
        };
        tracing::info!(title = %current.title, media = %current.reference, "loading media");

        let result = self
            .surface
            .load(&current.reference)
            .and_then(|()| self.surface.set_title(&current.title));
        self.app.playback = if self.report("load media", result) {
            PlaybackState::Playing
        } else {
            PlaybackState::Stopped
        };
        update_mpris(&self.mpris, &self.app);
    }

    /// Open whatever text is on the clipboard.
    pub fn paste(&mut self) {
        match self.clipboard.read_text() {
            Ok(text) => self.open_input(&text),
            Err(e) => {
                tracing::info!("paste ignored: {e}");
                self.app.set_status(format!("Paste ignored: {e}"));
            }
        }
    }

    pub fn toggle_fullscreen(&mut self) {
        let on = self.app.toggle_fullscreen();
        let result = self.surface.set_fullscreen(on);
        self.report("toggle fullscreen", result);
    }

    pub fn toggle_cursor(&mut self) {
        let visible = self.app.toggle_cursor();
        let result = self.surface.set_cursor_visible(visible);
        self.report("toggle pointer", result);
    }

    /// Show/hide the header bar and resize so the picture keeps its size.
    pub fn toggle_header(&mut self) {
        let visible = self.app.toggle_header();
        let geometry = self.app.geometry;
        let result = self
            .surface
            .set_decorations(visible)
            .and_then(|()| self.surface.set_geometry(geometry.width, geometry.height));
        self.report("toggle header bar", result);
    }

    pub fn toggle_theme(&mut self) {
        let scheme = self.theme.toggle();
        tracing::debug!(scheme = scheme.label(), "theme toggled");
    }

    /// Pause, resume, or restart a stopped item. No-op with nothing loaded.
    pub fn play_pause(&mut self) {
        let previous = self.app.playback;
        let Some(next) = self.app.toggle_pause() else {
            return;
        };

        if previous == PlaybackState::Stopped {
            self.load_current();
            return;
        }

        let result = self.surface.set_paused(next == PlaybackState::Paused);
        if !self.report("toggle pause", result) {
            self.app.playback = previous;
        }
        update_mpris(&self.mpris, &self.app);
    }

    pub fn play(&mut self) {
        if self.app.playback != PlaybackState::Playing {
            self.play_pause();
        }
    }

    pub fn pause(&mut self) {
        if self.app.playback == PlaybackState::Playing {
            self.play_pause();
        }
    }

    pub fn stop(&mut self) {
        if self.app.now_playing.is_none() || self.app.playback == PlaybackState::Stopped {
            return;
        }
        self.app.stop();
        let result = self.surface.stop();
        self.report("stop", result);
        update_mpris(&self.mpris, &self.app);
    }

    /// Handle a command from MPRIS or the file dialog. Returns `true` to quit.
    pub fn handle_control(&mut self, cmd: ControlCmd) -> bool {
        tracing::debug!(?cmd, "control command");
        match cmd {
            ControlCmd::Quit => return true,
            ControlCmd::Play => self.play(),
            ControlCmd::Pause => self.pause(),
            ControlCmd::PlayPause => self.play_pause(),
            ControlCmd::Stop => self.stop(),
            ControlCmd::Open(input) => self.open_input(&input),
        }
        false
    }

    pub fn surface_alive(&mut self) -> bool {
        self.surface.is_alive()
    }

    /// Close the video window and stop the worker.
    pub fn shutdown(&mut self) {
        if let Err(e) = self.surface.quit() {
            tracing::debug!("surface quit: {e}");
        }
        self.worker.shutdown();
        self.app.stop();
        update_mpris(&self.mpris, &self.app);
    }

    /// Log and surface a failed surface command; returns whether it succeeded.
    fn report(&mut self, action: &str, result: Result<(), PlayerError>) -> bool {
        match result {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("failed to {action}: {e}");
                self.app.set_error(format!("Could not {action}: {e}"));
                false
            }
        }
    }
}
