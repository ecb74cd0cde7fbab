//! Theme management and ANSI escape sequence generation.
//!
//! This module defines the colour palette behind the template formatters
//! (`cyan`, `green`, `status`, ...). Themes are either built in or loaded from
//! a TOML file named by `theme_file` in the configuration.
//!
//! # Built-in Themes
//!
//! - `basic`: The classic 16-colour terminal palette (default)
//! - `catppuccin-mocha`: Dark theme with warm tones
//! - `catppuccin-latte`: Light theme with soft pastels
//!
//! # TOML Format
//!
//! ```toml
//! name = "my-theme"
//!
//! [colors]
//! cyan = "#89dceb"
//! blue = "#89b4fa"
//! green = "#a6e3a1"
//! red = "#f38ba8"
//! yellow = "#f9e2af"
//! magenta = "#cba6f7"
//! text_dim = "#6c7086"
//! ```
//!
//! # Example
//!
//! ```rust
//! use build_beaver::ui::theme::Theme;
//!
//! let theme = Theme::from_name("catppuccin-mocha").unwrap();
//! println!("{}passed{}", Theme::fg(&theme.colors.green), Theme::reset());
//! println!("{}Bold Text{}", Theme::bold(), Theme::reset());
//! ```

use crate::domain::error::{BeaverError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Name of the theme used when none is configured.
pub const DEFAULT_THEME: &str = "basic";

/// Colour scheme used by the template formatters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Theme {
    /// Human-readable theme name.
    pub name: String,
    /// Colour palette.
    pub colors: ThemeColors,
}

/// Colour definitions, as hex strings (e.g. `"#89b4fa"`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ThemeColors {
    pub cyan: String,
    pub blue: String,
    pub green: String,
    pub red: String,
    pub yellow: String,
    pub magenta: String,
    /// Secondary text, e.g. the `dim` formatter.
    pub text_dim: String,
}

/// Outcome class of a build state, used by the `status` formatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Passed,
    Failed,
    InProgress,
    Other,
}

impl StatusKind {
    /// Classifies a Buildkite build state.
    #[must_use]
    pub fn of(status: &str) -> Self {
        match status {
            "passed" => Self::Passed,
            "failed" | "failing" | "canceled" | "canceling" => Self::Failed,
            "running" | "scheduled" | "creating" | "blocked" => Self::InProgress,
            _ => Self::Other,
        }
    }
}

impl Theme {
    /// Loads a built-in theme by name.
    ///
    /// # Returns
    ///
    /// - `Some(Theme)` if the theme name is recognized
    /// - `None` if the theme name is unknown
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let toml_str = match name {
            DEFAULT_THEME => return Some(Self::basic()),
            "catppuccin-mocha" => include_str!("../../themes/catppuccin-mocha.toml"),
            "catppuccin-latte" => include_str!("../../themes/catppuccin-latte.toml"),
            _ => return None,
        };

        toml::from_str(toml_str).ok()
    }

    /// Loads a theme from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read (file not found, permission denied, etc.)
    /// - The TOML content cannot be parsed (invalid syntax, missing fields)
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            BeaverError::Configuration(format!("Failed to read theme file {}: {e}", path.display()))
        })?;

        toml::from_str(&contents)
            .map_err(|e| BeaverError::Configuration(format!("Failed to parse theme TOML: {e}")))
    }

    /// The 16-colour palette most terminals ship with.
    #[must_use]
    pub fn basic() -> Self {
        Self {
            name: DEFAULT_THEME.to_string(),
            colors: ThemeColors {
                cyan: "#00cdcd".to_string(),
                blue: "#3b78ff".to_string(),
                green: "#00cd00".to_string(),
                red: "#cd0000".to_string(),
                yellow: "#cdcd00".to_string(),
                magenta: "#cd00cd".to_string(),
                text_dim: "#7f7f7f".to_string(),
            },
        }
    }

    /// Hex colour for a build state, or `None` to leave it unstyled.
    #[must_use]
    pub fn status_color(&self, status: &str) -> Option<&str> {
        match StatusKind::of(status) {
            StatusKind::Passed => Some(&self.colors.green),
            StatusKind::Failed => Some(&self.colors.red),
            StatusKind::InProgress => Some(&self.colors.yellow),
            StatusKind::Other => None,
        }
    }

    /// Converts a hex color to RGB tuple.
    ///
    /// Returns `(255, 255, 255)` (white) on parse errors.
    fn hex_to_rgb(hex: &str) -> (u8, u8, u8) {
        let hex = hex.trim_start_matches('#').trim();

        if hex.len() != 6 || !hex.is_ascii() {
            return (255, 255, 255);
        }

        let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(255);
        let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(255);
        let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(255);

        (r, g, b)
    }

    /// Generates an ANSI 24-bit foreground color escape sequence.
    ///
    /// # Example
    ///
    /// ```rust
    /// use build_beaver::ui::theme::Theme;
    ///
    /// assert_eq!(Theme::fg("#0a0b0c"), "\u{1b}[38;2;10;11;12m");
    /// ```
    #[must_use]
    pub fn fg(hex: &str) -> String {
        let (r, g, b) = Self::hex_to_rgb(hex);
        format!("\u{001b}[38;2;{r};{g};{b}m")
    }

    /// Generates an ANSI 24-bit background color escape sequence.
    #[must_use]
    pub fn bg(hex: &str) -> String {
        let (r, g, b) = Self::hex_to_rgb(hex);
        format!("\u{001b}[48;2;{r};{g};{b}m")
    }

    /// Returns the ANSI bold escape sequence (`\x1b[1m`).
    #[must_use]
    pub const fn bold() -> &'static str {
        "\u{001b}[1m"
    }

    /// Returns the ANSI dim escape sequence (`\x1b[2m`).
    #[must_use]
    pub const fn dim() -> &'static str {
        "\u{001b}[2m"
    }

    /// Returns the ANSI reset escape sequence (`\x1b[0m`).
    #[must_use]
    pub const fn reset() -> &'static str {
        "\u{001b}[0m"
    }

    /// Wraps `text` in a foreground colour and a reset.
    #[must_use]
    pub fn paint(hex: &str, text: &str) -> String {
        format!("{}{text}{}", Self::fg(hex), Self::reset())
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::basic()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_in_themes_parse() {
        for name in ["basic", "catppuccin-mocha", "catppuccin-latte"] {
            let theme = Theme::from_name(name).unwrap();
            assert_eq!(theme.name, name);
        }
        assert!(Theme::from_name("solarized").is_none());
    }

    #[test]
    fn hex_parsing_falls_back_to_white() {
        assert_eq!(Theme::hex_to_rgb("#89b4fa"), (0x89, 0xb4, 0xfa));
        assert_eq!(Theme::hex_to_rgb("89b4fa"), (0x89, 0xb4, 0xfa));
        assert_eq!(Theme::hex_to_rgb("#fff"), (255, 255, 255));
        assert_eq!(Theme::hex_to_rgb("#zz0000"), (255, 0, 0));
    }

    #[test]
    fn status_colours_follow_outcome() {
        let theme = Theme::default();
        assert_eq!(theme.status_color("passed"), Some(theme.colors.green.as_str()));
        assert_eq!(theme.status_color("failed"), Some(theme.colors.red.as_str()));
        assert_eq!(theme.status_color("canceled"), Some(theme.colors.red.as_str()));
        assert_eq!(theme.status_color("running"), Some(theme.colors.yellow.as_str()));
        assert_eq!(theme.status_color("skipped"), None);
    }

    #[test]
    fn theme_file_round_trips_through_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        let mut theme = Theme::basic();
        theme.name = "custom".into();
        fs::write(&path, toml::to_string(&theme).unwrap()).unwrap();

        assert_eq!(Theme::from_file(&path).unwrap(), theme);
    }

    #[test]
    fn broken_theme_file_is_a_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        fs::write(&path, "name = \"x\"\n[colors]\ncyan = 3\n").unwrap();

        assert!(matches!(Theme::from_file(&path), Err(BeaverError::Configuration(_))));
        assert!(matches!(
            Theme::from_file(dir.path().join("missing.toml")),
            Err(BeaverError::Configuration(_))
        ));
    }
}
