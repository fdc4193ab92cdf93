//! TUI application state management.
//!
//! # Overview
//!
//! The [`App`] struct is the central state container for the TUI. It wraps
//! the [`ScanWorkflow`] (which owns the actual scan session) and adds the
//! state only the terminal UI cares about: the status line, the share
//! picker overlay, the theme, and the quit flag.
//!
//! # Architecture
//!
//! The TUI follows a unidirectional data flow:
//! 1. Key events are captured from the terminal (crossterm)
//! 2. Key events are translated to [`Action`]s
//! 3. Actions and provider [`SourceEvent`]s modify the `App` state
//! 4. The UI renders from the current `App` state
//!
//! All of this happens on the main thread; provider threads only feed the
//! event channel.

use std::path::PathBuf;

use crate::providers::{BarcodeSource, LinkOpener, ShareOutcome, SourceEvent};
use crate::session::{Permission, ViewMode};
use crate::workflow::{EventOutcome, ScanWorkflow};

use super::theme::Theme;

/// User action triggered by keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Start a scan (from idle) or scan another (from result)
    Scan,
    /// Open the decoded link with the platform opener
    Open,
    /// Open the share picker
    Share,
    /// Move up in the share picker
    NavigateUp,
    /// Move down in the share picker
    NavigateDown,
    /// Confirm the current selection
    Confirm,
    /// Cancel the current overlay or an active scan
    Cancel,
    /// Quit the application
    Quit,
}

/// TUI application state.
///
/// Not thread-safe; accessed only from the main thread.
pub struct App<S, O> {
    workflow: ScanWorkflow<S, O>,
    theme: Theme,
    status: Option<String>,
    picker: Option<usize>,
    log_path: Option<PathBuf>,
    quitting: bool,
}

impl<S: BarcodeSource, O: LinkOpener> App<S, O> {
    /// Create an app over a workflow.
    #[must_use]
    pub fn new(workflow: ScanWorkflow<S, O>, theme: Theme, log_path: Option<PathBuf>) -> Self {
        Self {
            workflow,
            theme,
            status: None,
            picker: None,
            log_path,
            quitting: false,
        }
    }

    // ==================== Accessors ====================

    /// The workflow, for rendering session state.
    #[must_use]
    pub fn workflow(&self) -> &ScanWorkflow<S, O> {
        &self.workflow
    }

    /// The active theme.
    #[must_use]
    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// The status line, if one is set.
    #[must_use]
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Selected share picker index while the picker is open.
    #[must_use]
    pub fn picker(&self) -> Option<usize> {
        self.picker
    }

    /// Where log lines go during this TUI run, for the footer.
    #[must_use]
    pub fn log_path(&self) -> Option<&PathBuf> {
        self.log_path.as_ref()
    }

    /// Check if the application should quit.
    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.quitting
    }

    /// Set the status line.
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }

    // ==================== Provider events ====================

    /// Apply one provider event from the channel.
    pub fn handle_source_event(&mut self, event: SourceEvent) {
        match self.workflow.handle_event(event) {
            EventOutcome::PermissionSet(Permission::Denied) => {
                self.set_status("Camera unavailable - scanning disabled");
            }
            EventOutcome::PermissionSet(_) => {
                self.status = None;
            }
            EventOutcome::Detected => {
                self.status = None;
            }
            EventOutcome::SourceLost(reason) => {
                self.set_status(format!("Scanner stopped: {}", reason));
            }
            EventOutcome::Ignored => {}
        }
    }

    // ==================== Action handling ====================

    /// Handle a user action and update state accordingly.
    ///
    /// Returns true if the action had an effect.
    pub fn handle_action(&mut self, action: Action) -> bool {
        log::trace!("Handling action: {:?}", action);

        match action {
            Action::Scan => self.start_scan(),
            Action::Open => self.open_link(),
            Action::Share => self.open_picker(),
            Action::NavigateUp => self.move_picker(-1),
            Action::NavigateDown => self.move_picker(1),
            Action::Confirm => self.confirm_picker(),
            Action::Cancel => self.cancel(),
            Action::Quit => {
                self.workflow.shutdown();
                self.quitting = true;
                true
            }
        }
    }

    fn start_scan(&mut self) -> bool {
        if self.picker.is_some() {
            return false;
        }

        match self.workflow.begin_scan() {
            Ok(true) => {
                self.status = None;
                true
            }
            // Permission not granted: silent no-op, the affordance is
            // absent anyway.
            Ok(false) => false,
            Err(e) => {
                self.set_status(format!("Cannot scan: {}", e));
                true
            }
        }
    }

    fn open_link(&mut self) -> bool {
        if self.picker.is_some() || self.workflow.session().mode() != ViewMode::Result {
            return false;
        }

        if self.workflow.open_decoded_link() {
            self.set_status("Opened with system handler");
            true
        } else {
            false
        }
    }

    fn open_picker(&mut self) -> bool {
        if self.picker.is_some()
            || self.workflow.session().mode() != ViewMode::Result
            || self.workflow.share_target_count() == 0
        {
            return false;
        }
        self.picker = Some(0);
        true
    }

    fn move_picker(&mut self, delta: isize) -> bool {
        let Some(selected) = self.picker else {
            return false;
        };
        let count = self.workflow.share_target_count();
        if count == 0 {
            return false;
        }

        let next = if delta < 0 {
            selected.saturating_sub(1)
        } else {
            (selected + 1).min(count - 1)
        };
        self.picker = Some(next);
        true
    }

    fn confirm_picker(&mut self) -> bool {
        let Some(selected) = self.picker.take() else {
            return false;
        };

        match self.workflow.share_decoded_link(selected) {
            Some(ShareOutcome::SharedWith(target)) => {
                self.set_status(format!("Shared via {}", target));
            }
            Some(ShareOutcome::Shared) => {
                self.set_status("Shared");
            }
            Some(ShareOutcome::Dismissed) => {}
            None => {
                self.set_status("Share failed (see log)");
            }
        }
        true
    }

    fn cancel(&mut self) -> bool {
        if self.picker.take().is_some() {
            self.workflow.share_dismissed();
            self.set_status("Share dismissed");
            return true;
        }

        if self.workflow.cancel_scan() {
            self.set_status("Scan cancelled");
            return true;
        }

        false
    }
}
