use super::event_loop::handle_key_event;
use super::session::Session;
use super::settings::load_settings;
use super::startup::open_startup_input;

use crate::app::{App, PlaybackState};
use crate::clipboard::{self, ClipboardError, ClipboardSource};
use crate::config::{ResolverSettings, Settings, WindowSettings};
use crate::media::MediaReference;
use crate::mpris::{ControlCmd, MprisHandle};
use crate::player::{MediaSurface, PlayerError};
use crate::resolver::{CommandOutput, CommandRunner, Resolver};
use crate::theme::{ColorScheme, ThemeController};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::cell::RefCell;
use std::io;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

#[derive(Clone, Default)]
struct FakeSurface {
    log: Rc<RefCell<Vec<String>>>,
    fail_load: bool,
}

impl FakeSurface {
    fn calls(&self) -> Vec<String> {
        self.log.borrow().clone()
    }

    fn push(&self, entry: String) -> Result<(), PlayerError> {
        self.log.borrow_mut().push(entry);
        Ok(())
    }
}

impl MediaSurface for FakeSurface {
    fn load(&mut self, media: &MediaReference) -> Result<(), PlayerError> {
        if self.fail_load {
            return Err(PlayerError::Exited);
        }
        self.push(format!("load:{}", media.locator()))
    }
    fn set_title(&mut self, title: &str) -> Result<(), PlayerError> {
        self.push(format!("title:{title}"))
    }
    fn set_fullscreen(&mut self, on: bool) -> Result<(), PlayerError> {
        self.push(format!("fullscreen:{on}"))
    }
    fn set_cursor_visible(&mut self, visible: bool) -> Result<(), PlayerError> {
        self.push(format!("cursor:{visible}"))
    }
    fn set_decorations(&mut self, visible: bool) -> Result<(), PlayerError> {
        self.push(format!("decorations:{visible}"))
    }
    fn set_geometry(&mut self, width: u32, height: u32) -> Result<(), PlayerError> {
        self.push(format!("geometry:{width}x{height}"))
    }
    fn set_paused(&mut self, paused: bool) -> Result<(), PlayerError> {
        self.push(format!("paused:{paused}"))
    }
    fn stop(&mut self) -> Result<(), PlayerError> {
        self.push("stop".to_string())
    }
    fn is_alive(&mut self) -> bool {
        true
    }
    fn quit(&mut self) -> Result<(), PlayerError> {
        self.push("quit".to_string())
    }
}

struct FakeClipboard(Option<String>);

impl ClipboardSource for FakeClipboard {
    fn read_text(&mut self) -> Result<String, ClipboardError> {
        match self.0.clone() {
            Some(text) => clipboard::non_empty(text),
            None => Err(ClipboardError::Unavailable("no display".to_string())),
        }
    }
}

/// Runner that answers with `stdout`, optionally waiting on a gate first.
#[derive(Clone)]
struct FakeRunner {
    calls: Arc<Mutex<Vec<Vec<String>>>>,
    stdout: String,
    success: bool,
    gate: Option<Arc<Mutex<Receiver<()>>>>,
    replied: Arc<AtomicBool>,
}

impl FakeRunner {
    fn replying(stdout: &str) -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            stdout: stdout.to_string(),
            success: true,
            gate: None,
            replied: Arc::new(AtomicBool::new(false)),
        }
    }

    fn failing() -> Self {
        Self {
            success: false,
            ..Self::replying("")
        }
    }

    fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl CommandRunner for FakeRunner {
    fn run(
        &self,
        _program: &str,
        args: &[String],
        _timeout: Option<Duration>,
    ) -> io::Result<CommandOutput> {
        self.calls.lock().unwrap().push(args.to_vec());
        if let Some(gate) = &self.gate {
            let _ = gate.lock().unwrap().recv();
        }
        self.replied.store(true, Ordering::SeqCst);
        Ok(CommandOutput {
            success: self.success,
            code: Some(if self.success { 0 } else { 1 }),
            stdout: self.stdout.clone(),
            stderr: if self.success {
                String::new()
            } else {
                "ERROR: Video unavailable".to_string()
            },
        })
    }
}

type TestSession = Session<FakeSurface, FakeClipboard, FakeRunner>;

fn session_with(surface: &FakeSurface, runner: &FakeRunner, clip: Option<&str>) -> TestSession {
    Session::new(
        App::new(&WindowSettings::default()),
        ThemeController::new(ColorScheme::Dark),
        surface.clone(),
        FakeClipboard(clip.map(str::to_string)),
        Resolver::with_runner(ResolverSettings::default(), runner.clone()),
        MprisHandle::detached(),
    )
}

fn session(surface: &FakeSurface) -> TestSession {
    session_with(surface, &FakeRunner::replying("https://cdn.example/v.m3u8\n"), None)
}

/// Poll the worker until nothing is resolving any more.
fn settle(session: &mut TestSession) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while session.app.is_resolving() && Instant::now() < deadline {
        session.poll_resolver();
        thread::sleep(Duration::from_millis(5));
    }
}

fn key(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
}

#[test]
fn local_file_loads_immediately_without_resolver() {
    let surface = FakeSurface::default();
    let runner = FakeRunner::replying("");
    let mut s = session_with(&surface, &runner, None);

    s.open_input("/home/u/Videos/holiday.mp4");

    assert_eq!(runner.call_count(), 0);
    assert!(!s.app.is_resolving());
    assert_eq!(s.app.title, "holiday");
    assert_eq!(s.app.playback, PlaybackState::Playing);
    assert_eq!(
        surface.calls(),
        vec!["load:/home/u/Videos/holiday.mp4", "title:holiday"]
    );
}

#[test]
fn web_video_is_passed_through_with_web_label() {
    let surface = FakeSurface::default();
    let mut s = session(&surface);

    s.open_input("https://example.org/clip.webm");

    assert_eq!(s.app.title, "Web Video");
    assert_eq!(
        surface.calls(),
        vec!["load:https://example.org/clip.webm", "title:Web Video"]
    );
}

#[test]
fn streaming_page_resolves_in_background() {
    let surface = FakeSurface::default();
    let runner = FakeRunner::replying("https://cdn.example/v.m3u8\n");
    let mut s = session_with(&surface, &runner, None);

    s.open_input("https://www.youtube.com/watch?v=abc");
    assert!(s.app.is_resolving());
    settle(&mut s);

    assert_eq!(runner.call_count(), 1);
    assert_eq!(s.app.title, "Youtube Video");
    assert_eq!(
        surface.calls(),
        vec!["load:https://cdn.example/v.m3u8", "title:Youtube Video"]
    );
}

#[test]
fn failed_resolution_keeps_current_media() {
    let surface = FakeSurface::default();
    let mut s = session_with(&surface, &FakeRunner::failing(), None);

    s.open_input("/v/movie.mkv");
    s.open_input("https://youtu.be/gone");
    settle(&mut s);

    assert_eq!(s.app.title, "movie");
    assert!(s.app.last_error.as_deref().unwrap_or("").contains("status 1"));
    assert_eq!(surface.calls(), vec!["load:/v/movie.mkv", "title:movie"]);
}

#[test]
fn newer_input_supersedes_slow_resolution() {
    let surface = FakeSurface::default();
    let (release, gate) = mpsc::channel::<()>();
    let runner = FakeRunner {
        gate: Some(Arc::new(Mutex::new(gate))),
        ..FakeRunner::replying("https://cdn.example/slow.m3u8\n")
    };
    let mut s = session_with(&surface, &runner, None);

    s.open_input("https://youtu.be/slow");
    s.open_input("/v/other.mp4");
    assert_eq!(s.app.title, "other");

    release.send(()).unwrap();
    let deadline = Instant::now() + Duration::from_secs(5);
    while !runner.replied.load(Ordering::SeqCst) && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(5));
    }
    for _ in 0..20 {
        s.poll_resolver();
        thread::sleep(Duration::from_millis(5));
    }

    assert_eq!(s.app.title, "other");
    assert!(!surface.calls().iter().any(|c| c.contains("slow.m3u8")));
}

#[test]
fn whitespace_input_is_ignored() {
    let surface = FakeSurface::default();
    let mut s = session(&surface);
    let before = s.app.latest_seq();

    s.open_input("   \n");

    assert_eq!(s.app.latest_seq(), before);
    assert!(s.app.status.is_some());
    assert!(surface.calls().is_empty());
}

#[test]
fn paste_opens_clipboard_text() {
    let surface = FakeSurface::default();
    let runner = FakeRunner::replying("");
    let mut s = session_with(&surface, &runner, Some("  /v/pasted.mp4\n"));

    s.paste();

    assert_eq!(s.app.title, "pasted");
    assert_eq!(surface.calls()[0], "load:/v/pasted.mp4");
}

#[test]
fn paste_with_empty_clipboard_changes_nothing() {
    let surface = FakeSurface::default();
    let runner = FakeRunner::replying("");
    let mut s = session_with(&surface, &runner, Some("   "));

    s.paste();

    assert_eq!(s.app.latest_seq(), 0);
    assert!(s.app.status.as_deref().unwrap_or("").contains("no text"));
    assert!(surface.calls().is_empty());
}

#[test]
fn header_toggle_resizes_window() {
    let surface = FakeSurface::default();
    let mut s = session(&surface);

    s.toggle_header();
    s.toggle_header();

    assert_eq!(
        surface.calls(),
        vec![
            "decorations:false",
            "geometry:640x360",
            "decorations:true",
            "geometry:640x406",
        ]
    );
}

#[test]
fn transport_controls_follow_playback_state() {
    let surface = FakeSurface::default();
    let mut s = session(&surface);

    s.play_pause();
    s.stop();
    assert!(surface.calls().is_empty());

    s.open_input("/v/a.mp4");
    s.play_pause();
    assert_eq!(s.app.playback, PlaybackState::Paused);
    s.play();
    assert_eq!(s.app.playback, PlaybackState::Playing);
    s.stop();
    assert_eq!(s.app.playback, PlaybackState::Stopped);
    s.play_pause();
    assert_eq!(s.app.playback, PlaybackState::Playing);

    assert_eq!(
        surface.calls(),
        vec![
            "load:/v/a.mp4",
            "title:a",
            "paused:true",
            "paused:false",
            "stop",
            "load:/v/a.mp4",
            "title:a",
        ]
    );
}

#[test]
fn failed_load_leaves_playback_stopped() {
    let surface = FakeSurface {
        fail_load: true,
        ..FakeSurface::default()
    };
    let mut s = session(&surface);

    s.open_input("/v/a.mp4");

    assert_eq!(s.app.playback, PlaybackState::Stopped);
    assert!(s.app.last_error.is_some());
}

#[test]
fn control_commands_drive_the_session() {
    let surface = FakeSurface::default();
    let mut s = session(&surface);

    assert!(!s.handle_control(ControlCmd::Open("/v/b.mp4".to_string())));
    assert_eq!(s.app.title, "b");
    assert!(!s.handle_control(ControlCmd::Pause));
    assert_eq!(s.app.playback, PlaybackState::Paused);
    assert!(!s.handle_control(ControlCmd::Pause));
    assert_eq!(s.app.playback, PlaybackState::Paused);
    assert!(s.handle_control(ControlCmd::Quit));
}

#[test]
fn keys_map_to_actions() {
    let surface = FakeSurface::default();
    let mut s = session(&surface);
    let settings = Settings::default();
    let (tx, _rx) = mpsc::channel::<ControlCmd>();

    assert!(!handle_key_event(key('f'), &settings, &mut s, &tx));
    assert!(!handle_key_event(key('m'), &settings, &mut s, &tx));
    assert!(!handle_key_event(key('t'), &settings, &mut s, &tx));
    assert!(s.app.fullscreen);
    assert!(!s.app.cursor_visible);
    assert_eq!(s.theme.scheme(), ColorScheme::Light);
    assert_eq!(surface.calls(), vec!["fullscreen:true", "cursor:false"]);

    assert!(handle_key_event(key('q'), &settings, &mut s, &tx));
    assert!(handle_key_event(
        KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        &settings,
        &mut s,
        &tx
    ));
    assert!(!handle_key_event(
        KeyEvent::new(KeyCode::Char('f'), KeyModifiers::CONTROL),
        &settings,
        &mut s,
        &tx
    ));
}

#[test]
fn startup_input_is_opened_once() {
    let surface = FakeSurface::default();
    let mut s = session(&surface);

    open_startup_input(&mut s, None);
    open_startup_input(&mut s, Some("  "));
    assert_eq!(s.app.latest_seq(), 0);

    open_startup_input(&mut s, Some("/v/start.mp4"));
    assert_eq!(s.app.title, "start");
}

#[test]
fn shutdown_quits_the_surface() {
    let surface = FakeSurface::default();
    let mut s = session(&surface);

    s.shutdown();

    assert_eq!(surface.calls(), vec!["quit"]);
}

#[test]
fn explicit_config_path_must_exist() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("pasteplay-typo.toml");

    let err = load_settings(Some(&missing)).unwrap_err();
    assert!(format!("{err:#}").contains("pasteplay-typo.toml"));
}

#[test]
fn explicit_config_with_invalid_values_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[resolver]\nprefix_window = 0\n").unwrap();

    let s = load_settings(Some(&path)).unwrap();
    assert_eq!(
        s.resolver.prefix_window,
        Settings::default().resolver.prefix_window
    );
}
