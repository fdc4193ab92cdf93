//! Share targets.
//!
//! # Overview
//!
//! The share provider is a list of named destinations the payload can be
//! handed to. Two kinds exist:
//!
//! - [`ClipboardTarget`]: the system clipboard, via the platform's
//!   clipboard command (`pbcopy`, `xclip`/`xsel`, `clip`)
//! - [`CommandTarget`]: a user-configured command that receives the
//!   payload on stdin (e.g. a mail composer wrapper or a paste service
//!   uploader)
//!
//! Each target reports success or a [`ShareError`]; the dismissed outcome
//! is produced by the TUI's share picker, not by a target.

use std::io::Write;
use std::process::{Command, Stdio};

use serde::{Deserialize, Serialize};

use super::{ShareError, ShareTarget};

/// The system clipboard as a share target.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClipboardTarget;

impl ClipboardTarget {
    /// Create the clipboard target.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Candidate clipboard commands for this platform, tried in order.
    fn candidates() -> &'static [(&'static str, &'static [&'static str])] {
        #[cfg(target_os = "macos")]
        {
            &[("pbcopy", &[])]
        }
        #[cfg(target_os = "windows")]
        {
            &[("clip", &[])]
        }
        #[cfg(not(any(target_os = "macos", target_os = "windows")))]
        {
            &[
                ("xclip", &["-selection", "clipboard"]),
                ("xsel", &["--clipboard", "--input"]),
                ("wl-copy", &[]),
            ]
        }
    }
}

impl ShareTarget for ClipboardTarget {
    fn label(&self) -> Option<&str> {
        Some("clipboard")
    }

    fn share(&self, payload: &str) -> Result<(), ShareError> {
        let mut last_spawn_err = None;

        for (program, args) in Self::candidates() {
            match Command::new(program)
                .args(*args)
                .stdin(Stdio::piped())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .spawn()
            {
                Ok(child) => return feed_and_wait(child, "clipboard", payload),
                Err(e) => last_spawn_err = Some(e),
            }
        }

        Err(ShareError::Spawn {
            target: "clipboard".to_string(),
            source: last_spawn_err
                .unwrap_or_else(|| std::io::Error::new(std::io::ErrorKind::NotFound, "no clipboard command")),
        })
    }
}

/// Configuration for a user-defined share target.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShareTargetConfig {
    /// Display label; omitted for targets that share anonymously.
    #[serde(default)]
    pub label: Option<String>,
    /// Program to run.
    pub command: String,
    /// Arguments passed to the program.
    #[serde(default)]
    pub args: Vec<String>,
}

/// A configured command as a share target. The payload arrives on stdin.
#[derive(Debug, Clone)]
pub struct CommandTarget {
    config: ShareTargetConfig,
}

impl CommandTarget {
    /// Create a target from its configuration entry.
    #[must_use]
    pub fn new(config: ShareTargetConfig) -> Self {
        Self { config }
    }

    fn target_name(&self) -> String {
        self.config
            .label
            .clone()
            .unwrap_or_else(|| self.config.command.clone())
    }
}

impl ShareTarget for CommandTarget {
    fn label(&self) -> Option<&str> {
        self.config.label.as_deref()
    }

    fn share(&self, payload: &str) -> Result<(), ShareError> {
        let child = Command::new(&self.config.command)
            .args(&self.config.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| ShareError::Spawn {
                target: self.target_name(),
                source,
            })?;

        feed_and_wait(child, &self.target_name(), payload)
    }
}

/// Write the payload to the child's stdin and wait for it to finish.
fn feed_and_wait(
    mut child: std::process::Child,
    target: &str,
    payload: &str,
) -> Result<(), ShareError> {
    if let Some(stdin) = child.stdin.as_mut() {
        stdin
            .write_all(payload.as_bytes())
            .map_err(|source| ShareError::Write {
                target: target.to_string(),
                source,
            })?;
    }
    // Drop stdin so the child sees EOF before we wait.
    drop(child.stdin.take());

    let status = child.wait().map_err(|source| ShareError::Write {
        target: target.to_string(),
        source,
    })?;

    if status.success() {
        Ok(())
    } else {
        Err(ShareError::Failed {
            target: target.to_string(),
            status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clipboard_label() {
        assert_eq!(ClipboardTarget::new().label(), Some("clipboard"));
    }

    #[test]
    fn test_command_target_label_fallback() {
        let target = CommandTarget::new(ShareTargetConfig {
            label: None,
            command: "cat".to_string(),
            args: vec![],
        });
        assert_eq!(target.label(), None);
        assert_eq!(target.target_name(), "cat");
    }

    #[cfg(unix)]
    #[test]
    fn test_command_target_success() {
        let target = CommandTarget::new(ShareTargetConfig {
            label: Some("sink".to_string()),
            command: "cat".to_string(),
            args: vec![],
        });
        assert!(target.share("https://example.com").is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_command_target_failure_status() {
        let target = CommandTarget::new(ShareTargetConfig {
            label: Some("broken".to_string()),
            command: "false".to_string(),
            args: vec![],
        });
        let err = target.share("payload").unwrap_err();
        assert!(matches!(err, ShareError::Failed { .. }));
        assert!(err.to_string().contains("broken"));
    }

    #[test]
    fn test_command_target_missing_program() {
        let target = CommandTarget::new(ShareTargetConfig {
            label: None,
            command: "definitely-not-a-real-share-target".to_string(),
            args: vec![],
        });
        let err = target.share("payload").unwrap_err();
        assert!(matches!(err, ShareError::Spawn { .. }));
    }

    #[test]
    fn test_share_target_config_roundtrip() {
        let config = ShareTargetConfig {
            label: Some("paste service".to_string()),
            command: "pastebin-cli".to_string(),
            args: vec!["--expire".to_string(), "1d".to_string()],
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: ShareTargetConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
