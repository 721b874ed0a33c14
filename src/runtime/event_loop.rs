use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::clipboard::ClipboardSource;
use crate::config;
use crate::dialog;
use crate::mpris::ControlCmd;
use crate::player::MediaSurface;
use crate::resolver::CommandRunner;
use crate::ui;

use super::session::Session;

/// Main terminal event loop: resolver outcomes, drawing, control commands and
/// keys. Returns `Ok(())` when quit is requested or the video window is gone.
pub fn run<S, C, R>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    session: &mut Session<S, C, R>,
    control_tx: &mpsc::Sender<ControlCmd>,
    control_rx: &mpsc::Receiver<ControlCmd>,
) -> anyhow::Result<()>
where
    S: MediaSurface,
    C: ClipboardSource,
    R: CommandRunner + Clone + Send + 'static,
{
    loop {
        session.poll_resolver();

        if !session.surface_alive() {
            tracing::info!("video window closed, exiting");
            break;
        }

        terminal.draw(|f| ui::draw(f, &session.app, &session.theme, &settings.ui))?;

        while let Ok(cmd) = control_rx.try_recv() {
            if session.handle_control(cmd) {
                return Ok(());
            }
        }

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, settings, session, control_tx) {
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Map one key press onto the session. Returns `true` to quit.
pub(super) fn handle_key_event<S, C, R>(
    key: KeyEvent,
    settings: &config::Settings,
    session: &mut Session<S, C, R>,
    control_tx: &mpsc::Sender<ControlCmd>,
) -> bool
where
    S: MediaSurface,
    C: ClipboardSource,
    R: CommandRunner + Clone + Send + 'static,
{
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        // Raw mode swallows SIGINT.
        return key.code == KeyCode::Char('c');
    }

    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('f') => session.toggle_fullscreen(),
        KeyCode::Char('m') => session.toggle_cursor(),
        KeyCode::Char('h') => session.toggle_header(),
        KeyCode::Char('o') => dialog::spawn_open_dialog(&settings.dialog, control_tx.clone()),
        KeyCode::Char('p') => session.paste(),
        KeyCode::Char(' ') => session.play_pause(),
        KeyCode::Char('s') => session.stop(),
        KeyCode::Char('t') => session.toggle_theme(),
        _ => {}
    }
    false
}
