//! Scan session state.
//!
//! # Overview
//!
//! This module defines [`ScanSession`], the lifecycle of one scan attempt:
//! - Camera permission (unknown / granted / denied), set once at startup
//! - The current view mode (idle / scanning / result)
//! - The most recently decoded payload, if any
//!
//! # Invariants
//!
//! - `Scanning` implies no payload is held
//! - `Result` implies a payload is held
//! - A payload, once set, persists unchanged until a new successful scan
//!   or an explicit "scan another" action clears it
//!
//! The session is mutated only through the transition methods below, which
//! refuse any transition that would break these invariants. It is owned by
//! the workflow controller, never shared, and never persisted.
//!
//! # Example
//!
//! ```
//! use qrlink::session::{Permission, ScanSession, ViewMode};
//!
//! let mut session = ScanSession::new();
//! session.set_permission(Permission::Granted);
//!
//! assert!(session.begin_scan());
//! assert_eq!(session.mode(), ViewMode::Scanning);
//!
//! assert!(session.record_detection("https://example.com"));
//! assert_eq!(session.payload(), Some("https://example.com"));
//! ```

/// Camera permission state.
///
/// Set once, asynchronously, shortly after startup. `Denied` is terminal
/// for the session's ability to scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Permission {
    /// The permission probe has not reported yet.
    #[default]
    Unknown,
    /// Camera access is available.
    Granted,
    /// Camera access is unavailable; scanning stays disabled.
    Denied,
}

impl Permission {
    /// Check whether scanning is allowed.
    #[must_use]
    pub fn is_granted(self) -> bool {
        matches!(self, Self::Granted)
    }
}

/// Which UI affordance is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    /// Start screen with the "start scanning" affordance.
    #[default]
    Idle,
    /// Camera active, listening for detection events.
    Scanning,
    /// Decoded payload displayed with open / share / scan-again affordances.
    Result,
}

impl ViewMode {
    /// Check whether the barcode source should be active in this mode.
    #[must_use]
    pub fn is_scanning(self) -> bool {
        matches!(self, Self::Scanning)
    }
}

/// The lifecycle of one scan attempt.
///
/// Created at application start with `Idle` mode, no payload, and unknown
/// permission. Discarded when the application is torn down.
#[derive(Debug, Clone, Default)]
pub struct ScanSession {
    permission: Permission,
    mode: ViewMode,
    payload: Option<String>,
}

impl ScanSession {
    /// Create a fresh session: idle, no payload, permission unknown.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ==================== Accessors ====================

    /// Get the current camera permission.
    #[must_use]
    pub fn permission(&self) -> Permission {
        self.permission
    }

    /// Get the current view mode.
    #[must_use]
    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    /// Get the decoded payload, if one is held.
    #[must_use]
    pub fn payload(&self) -> Option<&str> {
        self.payload.as_deref()
    }

    /// Check whether a payload is held.
    #[must_use]
    pub fn has_payload(&self) -> bool {
        self.payload.is_some()
    }

    // ==================== Transitions ====================

    /// Record the permission probe's answer.
    ///
    /// Permission is decided once; later reports are ignored so a stray
    /// probe cannot re-enable scanning after a denial.
    pub fn set_permission(&mut self, permission: Permission) {
        if self.permission != Permission::Unknown {
            log::debug!(
                "Ignoring permission report {:?}: already {:?}",
                permission,
                self.permission
            );
            return;
        }
        log::info!("Camera permission: {:?}", permission);
        self.permission = permission;
    }

    /// Enter `Scanning` from `Idle` or `Result`, clearing any prior payload.
    ///
    /// Returns `false` (state unchanged) when permission is not granted or
    /// a scan is already in progress.
    pub fn begin_scan(&mut self) -> bool {
        if !self.permission.is_granted() {
            log::debug!("begin_scan ignored: permission is {:?}", self.permission);
            return false;
        }
        if self.mode == ViewMode::Scanning {
            return false;
        }

        log::debug!("Mode transition: {:?} -> Scanning", self.mode);
        self.payload = None;
        self.mode = ViewMode::Scanning;
        true
    }

    /// Record a successful detection, entering `Result`.
    ///
    /// Only the first detection in a scan counts: any detection arriving
    /// outside `Scanning` is ignored, so duplicate events for the same
    /// physical code cannot overwrite the payload.
    pub fn record_detection(&mut self, payload: &str) -> bool {
        if self.mode != ViewMode::Scanning {
            log::debug!("Detection ignored in mode {:?}", self.mode);
            return false;
        }

        log::debug!("Mode transition: Scanning -> Result");
        self.payload = Some(payload.to_string());
        self.mode = ViewMode::Result;
        true
    }

    /// Cancel an active scan, returning to `Idle` with no payload.
    ///
    /// A no-op outside `Scanning`.
    pub fn cancel_scan(&mut self) -> bool {
        if self.mode != ViewMode::Scanning {
            return false;
        }

        log::debug!("Mode transition: Scanning -> Idle (cancelled)");
        self.mode = ViewMode::Idle;
        true
    }
}
