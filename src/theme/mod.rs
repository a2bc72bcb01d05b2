//! Color themes for the reader

mod tokyo_night;

pub use tokyo_night::TOKYO_NIGHT;

use ratatui::style::Color;
use serde::{Deserialize, Serialize};

/// A color theme for the application
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,

    // Background colors
    pub bg_primary: Color,
    pub bg_secondary: Color,
    pub bg_tertiary: Color,

    // Foreground colors
    pub fg_primary: Color,
    pub fg_secondary: Color,
    pub fg_muted: Color,

    // Accent colors
    pub accent_primary: Color,
    pub accent_secondary: Color,

    // Semantic colors
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,

    // Reader highlights
    pub arabic: Color,
    pub playing: Color,
    pub pulse: Color,

    // UI elements
    pub border: Color,
    pub border_focused: Color,
    pub selection: Color,
    pub cursor: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Theme::tokyo_night()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_theme_is_tokyo_night() {
        let theme = Theme::default();
        assert_eq!(theme.name, "Tokyo Night");
    }

    #[test]
    fn playing_and_pulse_highlights_differ() {
        let theme = Theme::default();
        assert_ne!(theme.playing, theme.pulse);
        assert_ne!(theme.playing, theme.bg_primary);
    }

    #[test]
    fn theme_survives_json() {
        let json = serde_json::to_string(&Theme::default()).unwrap();
        let theme: Theme = serde_json::from_str(&json).unwrap();
        assert_eq!(theme.arabic, Theme::default().arabic);
    }
}
