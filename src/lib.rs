//! Build Beaver: a terminal browser for recent Buildkite builds.
//!
//! `bkb` fetches the latest builds of an organization and shows them as a
//! small, searchable list drawn in place below the shell prompt:
//! - Windowed navigation with arrow keys or emacs-style control keys
//! - Incremental substring search over every build field
//! - A detail panel for the selected build, rendered from a template
//! - `Enter` opens the build page in the browser
//!
//! # Architecture
//!
//! The crate follows a layered architecture pattern:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  CLI (main.rs)                                      │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← State machine
//! │  - List navigator                                   │
//! │  - Event handling and actions                       │
//! │  - Session loop                                     │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ UI Layer      │   │ Source Layer  │   │ Infrastructure│
//! │ (ui/)         │   │ (source/)     │   │ (infra../)    │
//! │ - Templates   │   │ - Buildkite   │   │ - Paths       │
//! │ - Theming     │   │   REST API    │   │ - Browser     │
//! │ - In-place    │   │ - Saved JSON  │   │               │
//! │   terminal    │   │               │   │               │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain Layer (domain/)                             │
//! │  - Build record, field access, errors               │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Navigator, event/action model and the session loop
//! - [`domain`]: Core domain types (Build, errors)
//! - [`infrastructure`]: Platform paths and browser launching
//! - [`source`]: Where builds come from (Buildkite API, JSON file)
//! - [`ui`]: Templates, themes and the differential terminal writer
//! - [`observability`]: File-based tracing setup
//!
//! # Configuration
//!
//! Settings are read from `~/.config/bkb/config.toml` (see [`Config`]); the
//! credentials may instead come from `BKBREAVER_ORG` and `BKBREAVER_TOKEN`.
//!
//! ```toml
//! org = "acme"
//! token = "bkua_..."
//! list_size = 5
//! theme = "catppuccin-mocha"
//!
//! [templates]
//! inactive = "  {{.Status | status}} {{.Branch}} {{.Pipeline | dim}}"
//! ```
//!
//! # Example
//!
//! ```rust
//! use build_beaver::{handle_event, initialize, Config, Event};
//! use build_beaver::domain::Build;
//!
//! let builds = vec![Build::default(), Build::default()];
//! let (mut state, _templates) = initialize(&Config::default(), builds)?;
//!
//! for event in [Event::Next, Event::Prev] {
//!     let actions = handle_event(&mut state, &event);
//!     assert!(actions.is_empty());
//! }
//! # Ok::<(), build_beaver::BeaverError>(())
//! ```

#![allow(clippy::multiple_crate_versions)]

pub mod app;
pub mod domain;
pub mod infrastructure;
pub mod observability;
pub mod source;
pub mod ui;

pub use app::{handle_event, Action, AppState, Event, InputMode, Navigator, Session};
pub use domain::{BeaverError, Build, Result};
pub use ui::Theme;

use crate::infrastructure::expand_tilde;
use crate::ui::template::{FormatterRegistry, Templates, DEFAULT_ACTIVE, DEFAULT_DETAILS, DEFAULT_INACTIVE};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Environment variable overriding the configured API token.
pub const TOKEN_ENV: &str = "BKBREAVER_TOKEN";

/// Environment variable overriding the configured organization.
pub const ORG_ENV: &str = "BKBREAVER_ORG";

/// Where to create an API access token.
pub const TOKEN_URL: &str = "https://buildkite.com/user/api-access-tokens";

/// Number of token characters `bkb show` reveals.
const TOKEN_PREVIEW_LEN: usize = 7;

/// User configuration, stored as TOML.
///
/// Every key is optional; missing keys take the [`Default`] values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Buildkite organization slug.
    pub org: Option<String>,

    /// Buildkite API access token with `read_builds` scope.
    pub token: Option<String>,

    /// Rows visible at once. Default: 5
    pub list_size: usize,

    /// Builds requested per API page. Default: 100
    pub per_page: u32,

    /// API pages fetched at most. Default: 1
    pub page_limit: u32,

    /// Built-in theme name. Ignored if `theme_file` is set.
    ///
    /// Options: `basic`, `catppuccin-mocha`, `catppuccin-latte`.
    pub theme: Option<String>,

    /// Path to a custom TOML theme file. See [`ui::theme`] for the format.
    pub theme_file: Option<String>,

    /// Log level for the log file.
    ///
    /// Options: `trace`, `debug`, `info`, `warn`, `error`. `RUST_LOG` wins
    /// over this value. Default: `"info"`
    pub trace_level: Option<String>,

    /// Row and detail templates.
    pub templates: TemplateConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            org: None,
            token: None,
            list_size: 5,
            per_page: 100,
            page_limit: 1,
            theme: None,
            theme_file: None,
            trace_level: None,
            templates: TemplateConfig::default(),
        }
    }
}

/// Template sources for the list rows and the detail panel.
///
/// See [`ui::template`] for the syntax.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Row under the cursor.
    pub active: String,
    /// Every other visible row.
    pub inactive: String,
    /// Detail panel of the row under the cursor.
    pub details: String,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            active: DEFAULT_ACTIVE.to_string(),
            inactive: DEFAULT_INACTIVE.to_string(),
            details: DEFAULT_DETAILS.to_string(),
        }
    }
}

impl Config {
    /// Loads the configuration file at `path`.
    ///
    /// A missing file is not an error: the defaults are returned.
    ///
    /// # Errors
    ///
    /// - [`BeaverError::Io`] if the file exists but cannot be read
    /// - [`BeaverError::Configuration`] if it is not valid TOML for [`Config`]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::warn!(path = %path.display(), "config not found, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;

        tracing::info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Writes the configuration to `path`, creating parent directories.
    ///
    /// On Unix the file is made readable by its owner only, since it holds
    /// the API token.
    ///
    /// # Errors
    ///
    /// Returns [`BeaverError::Io`] on filesystem errors.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string(self)
            .map_err(|e| BeaverError::Configuration(format!("failed to serialize config: {e}")))?;
        fs::write(path, content)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
        }

        tracing::info!(path = %path.display(), "saved config");
        Ok(())
    }

    /// Applies `BKBREAVER_ORG` and `BKBREAVER_TOKEN` from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Applies credential overrides from `lookup`. Empty values are ignored.
    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|value: &String| !value.trim().is_empty());

        if let Some(org) = lookup(ORG_ENV) {
            tracing::debug!("organization taken from {ORG_ENV}");
            self.org = Some(org);
        }
        if let Some(token) = lookup(TOKEN_ENV) {
            tracing::debug!("token taken from {TOKEN_ENV}");
            self.token = Some(token);
        }
    }

    /// Returns the organization and token.
    ///
    /// # Errors
    ///
    /// Returns [`BeaverError::Credentials`] naming what is missing and how to
    /// provide it.
    pub fn credentials(&self) -> Result<(&str, &str)> {
        let org = present(self.org.as_deref()).ok_or_else(|| {
            BeaverError::Credentials(format!(
                "no organization configured: set {ORG_ENV} or run `bkb init`"
            ))
        })?;
        let token = present(self.token.as_deref()).ok_or_else(|| {
            BeaverError::Credentials(format!(
                "no API token configured: create one at {TOKEN_URL}, then set {TOKEN_ENV} or run `bkb init`"
            ))
        })?;

        Ok((org, token))
    }

    /// Resolves the theme: `theme_file`, then `theme`, then the default.
    ///
    /// A theme that fails to load is logged and replaced by the default.
    #[must_use]
    pub fn theme(&self) -> Theme {
        if let Some(theme_file) = &self.theme_file {
            return Theme::from_file(expand_tilde(theme_file)).unwrap_or_else(|e| {
                tracing::warn!(theme_file = %theme_file, error = %e, "failed to load theme from file, using default");
                Theme::default()
            });
        }

        self.theme.as_ref().map_or_else(Theme::default, |theme_name| {
            Theme::from_name(theme_name).unwrap_or_else(|| {
                tracing::warn!(theme_name = %theme_name, "unknown theme, using default");
                Theme::default()
            })
        })
    }
}

/// Trims a setting, treating blank values as absent.
fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Shortens a token to its first characters for display.
///
/// # Example
///
/// ```rust
/// assert_eq!(build_beaver::mask_token("bkua_0123456789"), "bkua_01...");
/// assert_eq!(build_beaver::mask_token("abc"), "abc...");
/// ```
#[must_use]
pub fn mask_token(token: &str) -> String {
    let preview: String = token.chars().take(TOKEN_PREVIEW_LEN).collect();
    format!("{preview}...")
}

/// Prepares a browsing session over `builds`.
///
/// Loads the theme, builds the formatters and parses the templates.
///
/// # Errors
///
/// - [`BeaverError::EmptyInput`] if `builds` is empty
/// - [`BeaverError::Configuration`] if `list_size` is 0
/// - [`BeaverError::Template`] if a configured template is invalid
pub fn initialize(config: &Config, builds: Vec<Build>) -> Result<(AppState<Build>, Templates)> {
    tracing::debug!(builds = builds.len(), list_size = config.list_size, "initializing session");

    let formatters = FormatterRegistry::from_theme(&config.theme());
    let templates = Templates::new(&config.templates, formatters)?;
    let state = AppState::new(builds, config.list_size)?;

    Ok((state, templates))
}
