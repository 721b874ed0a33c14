//! Light/dark color scheme for the control panel.
//!
//! `ThemeController` is owned by the runtime and passed to the renderer by
//! reference; nothing reads the scheme from global state.

use ratatui::style::{Color, Modifier, Style};

use crate::config::ThemeSetting;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ColorScheme {
    Light,
    Dark,
}

impl ColorScheme {
    pub fn toggled(self) -> Self {
        match self {
            ColorScheme::Light => ColorScheme::Dark,
            ColorScheme::Dark => ColorScheme::Light,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ColorScheme::Light => "light",
            ColorScheme::Dark => "dark",
        }
    }
}

impl From<ThemeSetting> for ColorScheme {
    fn from(setting: ThemeSetting) -> Self {
        match setting {
            ThemeSetting::Light => ColorScheme::Light,
            ThemeSetting::Dark => ColorScheme::Dark,
        }
    }
}

/// Styles the renderer pulls from the active scheme.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Palette {
    pub base: Style,
    pub border: Style,
    pub accent: Style,
    pub error: Style,
    pub muted: Style,
}

#[derive(Debug, Clone)]
pub struct ThemeController {
    scheme: ColorScheme,
}

impl ThemeController {
    pub fn new(scheme: ColorScheme) -> Self {
        Self { scheme }
    }

    pub fn scheme(&self) -> ColorScheme {
        self.scheme
    }

    /// Flip between light and dark; returns the new scheme.
    pub fn toggle(&mut self) -> ColorScheme {
        self.scheme = self.scheme.toggled();
        self.scheme
    }

    pub fn palette(&self) -> Palette {
        match self.scheme {
            // Matches the black window the player has always had.
            ColorScheme::Dark => Palette {
                base: Style::default().fg(Color::Gray).bg(Color::Black),
                border: Style::default().fg(Color::DarkGray).bg(Color::Black),
                accent: Style::default()
                    .fg(Color::Rgb(0x3c, 0x91, 0xc5))
                    .add_modifier(Modifier::BOLD),
                error: Style::default().fg(Color::LightRed),
                muted: Style::default().fg(Color::DarkGray),
            },
            ColorScheme::Light => Palette {
                base: Style::default().fg(Color::Black).bg(Color::White),
                border: Style::default().fg(Color::Gray).bg(Color::White),
                accent: Style::default()
                    .fg(Color::Rgb(0x1c, 0x5f, 0x8a))
                    .add_modifier(Modifier::BOLD),
                error: Style::default().fg(Color::Red),
                muted: Style::default().fg(Color::Gray),
            },
        }
    }
}
