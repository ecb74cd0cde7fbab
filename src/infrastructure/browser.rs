//! Opening URLs in the user's browser.

use crate::domain::error::{BeaverError, Result};
use std::process::{Command, Stdio};

/// Something that can show a URL to the user.
pub trait UrlOpener {
    /// Opens `url`.
    ///
    /// # Errors
    ///
    /// Returns [`BeaverError::Browser`] if the URL could not be handed off.
    fn open(&mut self, url: &str) -> Result<()>;
}

/// Opens URLs with the platform's launcher: `open` on macOS, `cmd /c start`
/// on Windows and `xdg-open` elsewhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemBrowser;

impl SystemBrowser {
    /// Launcher program and its leading arguments for the current platform.
    fn launcher() -> (&'static str, &'static [&'static str]) {
        if cfg!(target_os = "macos") {
            ("open", &[])
        } else if cfg!(target_os = "windows") {
            ("cmd", &["/c", "start"])
        } else {
            ("xdg-open", &[])
        }
    }
}

impl UrlOpener for SystemBrowser {
    fn open(&mut self, url: &str) -> Result<()> {
        let (program, args) = Self::launcher();
        tracing::debug!(program, url, "launching browser");

        // Detached: the launcher's output would corrupt the in-place frame.
        Command::new(program)
            .args(args)
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map(drop)
            .map_err(|e| BeaverError::Browser(format!("{program}: {e}")))
    }
}
