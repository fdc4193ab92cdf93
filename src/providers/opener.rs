//! Platform URL opener.
//!
//! Hands the decoded payload to the operating system's default handler
//! (`xdg-open` on Linux, `open` on macOS, `explorer` on Windows). The
//! payload is passed as a direct process argument with no shell involved,
//! and no validation is performed on this side: a string that is not an
//! openable URI fails inside the platform opener, not here.

use std::process::Command;

use super::{LinkOpener, OpenError};

/// A [`LinkOpener`] that spawns the platform's default URL handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemOpener;

impl SystemOpener {
    /// Create the opener.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// The opener program used on this platform.
    #[must_use]
    pub fn program() -> &'static str {
        #[cfg(target_os = "macos")]
        {
            "open"
        }
        #[cfg(target_os = "windows")]
        {
            // explorer.exe receives the URL as a direct process argument,
            // avoiding cmd.exe metacharacter interpretation.
            "explorer"
        }
        #[cfg(not(any(target_os = "macos", target_os = "windows")))]
        {
            "xdg-open"
        }
    }
}

impl LinkOpener for SystemOpener {
    fn open(&self, target: &str) -> Result<(), OpenError> {
        log::info!("Opening link via {}: {}", Self::program(), target);
        Command::new(Self::program()).arg(target).spawn()?;
        Ok(())
    }
}
