use std::sync::mpsc;

use anyhow::Context;
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::cli::Cli;
use crate::clipboard::SystemClipboard;
use crate::mpris::{self, ControlCmd, MprisHandle};
use crate::player::MpvSurface;
use crate::resolver::Resolver;
use crate::theme::ThemeController;

use self::session::Session;

mod event_loop;
mod mpris_sync;
mod session;
mod settings;
mod startup;

pub fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = settings::load_settings(cli.config.as_deref())?;

    let surface = MpvSurface::spawn(&settings.player, &settings.window)
        .with_context(|| {
            format!("failed to start the video window ({})", settings.player.program)
        })?;

    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    let mpris = if settings.ui.mpris {
        mpris::spawn_mpris(control_tx.clone(), settings.dialog.mime_types.clone())
    } else {
        MprisHandle::detached()
    };

    let mut session = Session::new(
        App::new(&settings.window),
        ThemeController::new(settings.ui.theme.into()),
        surface,
        SystemClipboard::new(),
        Resolver::new(settings.resolver.clone()),
        mpris,
    );

    startup::open_startup_input(&mut session, cli.input.as_deref());

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result =
        event_loop::run(&mut terminal, &settings, &mut session, &control_tx, &control_rx);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    session.shutdown();
    tracing::info!("pasteplay exiting");

    run_result
}

#[cfg(test)]
mod tests;
