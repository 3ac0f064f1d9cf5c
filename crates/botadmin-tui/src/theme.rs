use std::env;

use ratatui::style::{Color, Modifier, Style};

/// Colors for one appearance. Styling only; no layout or validation reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub text: Color,
    pub muted: Color,
    pub accent: Color,
    pub surface: Color,
    pub error: Color,
    pub success: Color,
}

impl Palette {
    pub fn for_mode(dark: bool) -> Self {
        if dark {
            Self {
                text: Color::White,
                muted: Color::DarkGray,
                accent: Color::Cyan,
                surface: Color::Black,
                error: Color::LightRed,
                success: Color::LightGreen,
            }
        } else {
            Self {
                text: Color::Black,
                muted: Color::Gray,
                accent: Color::Blue,
                surface: Color::White,
                error: Color::Red,
                success: Color::Green,
            }
        }
    }

    pub fn border(&self, focused: bool) -> Style {
        Style::default().fg(if focused { self.accent } else { self.muted })
    }

    pub fn highlight(&self) -> Style {
        Style::default()
            .bg(self.accent)
            .fg(self.surface)
            .add_modifier(Modifier::BOLD)
    }
}

/// Guess the terminal background from `COLORFGBG` ("fg;bg"); bg 0-6 or 8 is dark.
pub fn detect_dark_background() -> bool {
    env::var("COLORFGBG")
        .ok()
        .and_then(|v| v.rsplit(';').next().and_then(|bg| bg.parse::<u8>().ok()))
        .map(|bg| bg < 7 || bg == 8)
        .unwrap_or(true)
}
