//! TUI theming support.
//!
//! The `Theme` struct defines the color palette for the TUI, with light
//! and dark variants and automatic detection from the terminal
//! environment.

use ratatui::style::Color;

use crate::cli::ThemeArg;

/// A collection of colors used for TUI components.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub primary: Color,
    pub accent: Color,
    pub danger: Color,
    pub success: Color,
    pub dim: Color,
    pub normal: Color,
    pub inverted_fg: Color,
}

impl Theme {
    /// High-contrast dark theme (default).
    pub fn dark() -> Self {
        Self {
            primary: Color::Cyan,
            accent: Color::Yellow,
            danger: Color::Red,
            success: Color::Green,
            dim: Color::DarkGray,
            normal: Color::White,
            inverted_fg: Color::Black,
        }
    }

    /// High-contrast light theme.
    pub fn light() -> Self {
        Self {
            primary: Color::Blue,
            accent: Color::Magenta,
            danger: Color::Red,
            success: Color::Green,
            dim: Color::Gray,
            normal: Color::Black,
            inverted_fg: Color::White,
        }
    }

    /// Detect terminal theme or return dark theme as default.
    pub fn auto() -> Self {
        if is_light_terminal() {
            Self::light()
        } else {
            Self::dark()
        }
    }

    /// Resolve a CLI/config theme selection.
    #[must_use]
    pub fn from_arg(arg: ThemeArg) -> Self {
        match arg {
            ThemeArg::Auto => Self::auto(),
            ThemeArg::Dark => Self::dark(),
            ThemeArg::Light => Self::light(),
        }
    }
}

/// Simple heuristic to detect if the terminal is light-themed.
///
/// COLORFGBG is set by some terminals (rxvt, konsole); format "fg;bg"
/// where higher bg indices are usually light.
fn is_light_terminal() -> bool {
    if let Ok(colorfgbg) = std::env::var("COLORFGBG") {
        let parts: Vec<&str> = colorfgbg.split(';').collect();
        if let Some(bg) = parts.last() {
            if let Ok(bg_num) = bg.parse::<u32>() {
                return bg_num >= 7 && bg_num != 8;
            }
        }
    }

    false
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_arg_dark() {
        let theme = Theme::from_arg(ThemeArg::Dark);
        assert_eq!(theme.normal, Color::White);
    }

    #[test]
    fn test_from_arg_light() {
        let theme = Theme::from_arg(ThemeArg::Light);
        assert_eq!(theme.normal, Color::Black);
    }
}
