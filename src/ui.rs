//! UI rendering for the control panel.
//!
//! This module draws the terminal side of the player with `ratatui`: an
//! optional header bar with the open/paste actions, a status box, the
//! now-playing panel and the controls footer. Colors come from the
//! `ThemeController` passed in by the runtime.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock};

use crate::app::{App, PlaybackState};
use crate::config::UiSettings;
use crate::theme::{Palette, ThemeController};

static CONTROLS_MAP: LazyLock<BTreeMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut map = BTreeMap::new();
    map.insert("o", "open file");
    map.insert("p", "paste link");
    map.insert("space", "play/pause");
    map.insert("s", "stop");
    map.insert("f", "fullscreen");
    map.insert("m", "pointer");
    map.insert("h", "header bar");
    map.insert("t", "theme");
    map.insert("q", "quit");
    map
});

/// Render the controls help text in a fixed, human-friendly order.
fn controls_text() -> String {
    let order = ["o", "p", "space", "s", "f", "m", "h", "t", "q"];
    order
        .iter()
        .filter_map(|k| CONTROLS_MAP.get(k).map(|v| format!("[{k}] {v}")))
        .collect::<Vec<String>>()
        .join(" | ")
}

fn on_off(flag: bool) -> &'static str {
    if flag { "ON" } else { "OFF" }
}

fn playback_text(playback: PlaybackState) -> &'static str {
    match playback {
        PlaybackState::Stopped => "Stopped",
        PlaybackState::Playing => "Playing",
        PlaybackState::Paused => "Paused",
    }
}

/// One-line summary of the window flags for the status box.
fn status_text(app: &App, theme: &ThemeController) -> String {
    let mut parts: Vec<String> = Vec::new();

    match &app.pending {
        Some(p) => parts.push(format!("Resolving {}…", p.label)),
        None => parts.push(playback_text(app.playback).to_string()),
    }
    parts.push(format!("Fullscreen: {}", on_off(app.fullscreen)));
    parts.push(format!("Pointer: {}", on_off(app.cursor_visible)));
    parts.push(format!("Header: {}", on_off(app.header_visible)));
    parts.push(format!(
        "Window: {}x{}",
        app.geometry.width, app.geometry.height
    ));
    parts.push(format!("Theme: {}", theme.scheme().label()));

    parts.join(" • ")
}

/// Lines for the now-playing panel.
fn now_playing_lines(app: &App, palette: &Palette) -> Vec<Line<'static>> {
    let mut lines: Vec<Line<'static>> = Vec::new();

    match &app.now_playing {
        Some(r) => {
            lines.push(Line::from(vec![
                Span::styled("Title:  ", palette.muted),
                Span::styled(r.title.clone(), palette.accent),
            ]));
            lines.push(Line::from(vec![
                Span::styled("Source: ", palette.muted),
                Span::raw(r.reference.uri()),
            ]));
            if let Some(site) = &r.site {
                lines.push(Line::from(vec![
                    Span::styled("Site:   ", palette.muted),
                    Span::raw(site.clone()),
                ]));
            }
        }
        None => lines.push(Line::styled("Nothing loaded", palette.muted)),
    }

    if let Some(p) = &app.pending {
        lines.push(Line::raw(""));
        lines.push(Line::from(vec![
            Span::styled("Waiting: ", palette.muted),
            Span::raw(p.input.clone()),
        ]));
    }
    if let Some(status) = &app.status {
        lines.push(Line::raw(""));
        lines.push(Line::raw(status.clone()));
    }
    if let Some(err) = &app.last_error {
        lines.push(Line::raw(""));
        lines.push(Line::styled(format!("Error: {err}"), palette.error));
    }

    lines
}

/// Render the entire UI into `frame`.
pub fn draw(frame: &mut Frame, app: &App, theme: &ThemeController, ui_settings: &UiSettings) {
    let palette = theme.palette();
    frame.render_widget(Block::default().style(palette.base), frame.area());

    let header_rows = if app.header_visible { 3 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(header_rows),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(4),
        ])
        .split(frame.area());

    // Header bar
    if app.header_visible {
        let header = Paragraph::new(Line::from(vec![
            Span::styled("[o] Open", palette.accent),
            Span::raw("  "),
            Span::styled("[p] Paste", palette.accent),
            Span::raw("  "),
            Span::raw(ui_settings.header_text.clone()),
        ]))
        .alignment(Alignment::Center)
        .style(palette.base)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(palette.border)
                .title(format!(" {} ", app.title))
                .title_alignment(Alignment::Center),
        );
        frame.render_widget(header, chunks[0]);
    }

    // Status box
    let status = Paragraph::new(status_text(app, theme))
        .style(palette.base)
        .block(
            Block::bordered()
                .border_style(palette.border)
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                })
                .title(" status "),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(status, chunks[1]);

    // Now playing
    let body = Paragraph::new(now_playing_lines(app, &palette))
        .style(palette.base)
        .block(
            Block::bordered()
                .border_style(palette.border)
                .padding(Padding::horizontal(1))
                .title(" now playing "),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(body, chunks[2]);

    // Footer
    let footer = Paragraph::new(controls_text())
        .style(palette.muted)
        .block(
            Block::bordered()
                .border_style(palette.border)
                .title(" controls "),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[3]);
}
