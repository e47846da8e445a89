//! Light/dark color themes.
//!
//! Dark is the default; the user's choice is persisted through
//! [`crate::prefs::PrefsStore`].

use ratatui::style::Color;
use std::fmt;

/// Available color themes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    /// Near-black panels with an orange accent (default)
    #[default]
    Dark,
    /// Paper-white panels with the same accent
    Light,
}

impl Theme {
    /// Parse theme name from string
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.trim().to_lowercase().as_str() {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            _ => Err(format!("Unknown theme '{}'. Available: dark, light", s)),
        }
    }

    /// Value stored under the `theme` preference key
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    pub fn is_light(&self) -> bool {
        *self == Theme::Light
    }

    /// Toggle button glyph: sun in light mode, moon in dark mode
    pub fn glyph(&self) -> &'static str {
        match self {
            Theme::Dark => "🌙",
            Theme::Light => "☀",
        }
    }

    /// Get the color scheme for this theme
    pub fn colors(&self) -> ColorScheme {
        match self {
            Theme::Dark => ColorScheme::dark(),
            Theme::Light => ColorScheme::light(),
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Color scheme for a theme
#[derive(Debug, Clone, Copy)]
pub struct ColorScheme {
    /// Background color for normal content
    pub background: Color,
    /// Primary text color
    pub text: Color,
    /// Dimmed text color (summaries, hints, disabled controls)
    pub text_dim: Color,
    /// Accent for the active nav tab, focused borders and titles
    pub accent: Color,
    /// Border color for unfocused elements
    pub border: Color,
    /// Background for the selected card
    pub selection_bg: Color,
    /// Foreground for the selected card
    pub selection_fg: Color,
    /// Skeleton placeholder blocks
    pub skeleton: Color,
    /// Error panel text and border
    pub error: Color,
    /// Toast message color
    pub toast: Color,
}

const ACCENT: Color = Color::Rgb(255, 107, 53); // #ff6b35

impl ColorScheme {
    pub fn dark() -> Self {
        Self {
            background: Color::Rgb(20, 20, 20),
            text: Color::Rgb(235, 235, 235),
            text_dim: Color::Gray,
            accent: ACCENT,
            border: Color::DarkGray,
            selection_bg: ACCENT,
            selection_fg: Color::Black,
            skeleton: Color::Rgb(45, 45, 45),
            error: Color::LightRed,
            toast: Color::LightGreen,
        }
    }

    pub fn light() -> Self {
        Self {
            background: Color::Rgb(248, 246, 242),
            text: Color::Rgb(25, 25, 25),
            text_dim: Color::Rgb(90, 90, 90),
            accent: Color::Rgb(200, 70, 20),
            border: Color::Rgb(170, 170, 170),
            selection_bg: Color::Rgb(200, 70, 20),
            selection_fg: Color::White,
            skeleton: Color::Rgb(220, 218, 214),
            error: Color::Red,
            toast: Color::Green,
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::dark()
    }
}
