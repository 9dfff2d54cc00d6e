//! Light/dark palettes and course colors.

use ratatui::style::Color;
use serde::{Deserialize, Serialize};

/// Colors offered for new courses.
pub const COURSE_COLORS: &[&str] = &[
    "#3B82F6", "#EF4444", "#10B981", "#F59E0B", "#8B5CF6", "#EC4899", "#06B6D4", "#84CC16",
    "#F97316", "#6366F1",
];

/// Persisted theme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }
}

/// Theme with ratatui colors.
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub foreground: Color,
    /// Secondary text and unfocused borders
    pub muted: Color,
    /// Focused borders and headings
    pub accent: Color,
    /// Selected row background
    pub highlight: Color,
    pub success: Color,
    pub error: Color,
}

impl Theme {
    pub fn for_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Light => Self {
                background: Color::White,
                foreground: Color::Black,
                muted: Color::DarkGray,
                accent: Color::Blue,
                highlight: Color::Gray,
                success: Color::Green,
                error: Color::Red,
            },
            ThemeMode::Dark => Self {
                background: Color::Black,
                foreground: Color::White,
                muted: Color::Gray,
                accent: Color::Cyan,
                highlight: Color::DarkGray,
                success: Color::LightGreen,
                error: Color::LightRed,
            },
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::for_mode(ThemeMode::default())
    }
}

/// Parse a hex color string like "#RRGGBB" to a ratatui Color.
pub fn parse_hex(hex: &str) -> Color {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return Color::White;
    }

    let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(255);
    let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(255);
    let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(255);

    Color::Rgb(r, g, b)
}
