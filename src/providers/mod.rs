//! External collaborator seams.
//!
//! # Overview
//!
//! The workflow controller never talks to the platform directly. Each
//! capability it needs is a trait defined here, with one production
//! implementation per submodule:
//!
//! - [`BarcodeSource`]: the camera/barcode provider ([`scanner`])
//! - the permission probe ([`permission`])
//! - [`LinkOpener`]: the URL-open provider ([`opener`])
//! - [`ShareTarget`]: the share provider ([`share`])
//!
//! # Event flow
//!
//! Providers that work in the background (the permission probe, the
//! scanner's stdout reader) deliver results as [`SourceEvent`]s through an
//! `std::sync::mpsc` channel. The UI event loop drains that channel on the
//! main thread, so the workflow controller itself stays single-threaded.

pub mod opener;
pub mod permission;
pub mod scanner;
pub mod share;

use std::io;
use std::sync::mpsc::Sender;

use thiserror::Error;

pub use opener::SystemOpener;
pub use permission::DeviceProbe;
pub use scanner::HelperScanner;
pub use share::{ClipboardTarget, CommandTarget};

/// A barcode detection event emitted by an active [`BarcodeSource`].
///
/// The controller consumes only `data`; the symbology tag is carried for
/// logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    /// Barcode symbology as reported by the provider (e.g. "QR-Code").
    pub symbology: String,
    /// The raw decoded text.
    pub data: String,
}

/// Answer from the permission probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    /// Camera access is available.
    Granted,
    /// Camera access is unavailable.
    Denied,
}

/// How a share invocation ended.
///
/// Consumed by a single logging sink in the workflow controller; no
/// outcome mutates session state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareOutcome {
    /// Completed, and the provider reported which target received it.
    SharedWith(String),
    /// Completed without target information.
    Shared,
    /// The user backed out of the share picker.
    Dismissed,
}

/// Events delivered from provider threads to the UI event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceEvent {
    /// The permission probe finished.
    Permission(PermissionStatus),
    /// The active barcode source decoded a payload.
    Detected(Detection),
    /// The barcode source stopped on its own (helper exit or read error).
    SourceLost(String),
}

/// Errors from activating or driving a barcode source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The scanner helper could not be spawned.
    #[error("scanner helper `{helper}` could not be started: {source}")]
    SpawnFailed {
        /// The helper program that was attempted.
        helper: String,
        /// The underlying spawn error.
        #[source]
        source: io::Error,
    },

    /// The helper was spawned without a readable stdout.
    #[error("scanner helper `{0}` has no readable output")]
    NoOutput(String),
}

/// Errors from delegating to the platform URL opener.
#[derive(Debug, Error)]
pub enum OpenError {
    /// The opener process could not be spawned.
    #[error("failed to launch URL opener: {0}")]
    Spawn(#[from] io::Error),
}

/// Errors from invoking a share target.
#[derive(Debug, Error)]
pub enum ShareError {
    /// The target's process could not be spawned.
    #[error("share target `{target}` could not be started: {source}")]
    Spawn {
        /// The target that was attempted.
        target: String,
        /// The underlying spawn error.
        #[source]
        source: io::Error,
    },

    /// The payload could not be written to the target.
    #[error("failed to hand payload to `{target}`: {source}")]
    Write {
        /// The target that was attempted.
        target: String,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The target exited with a failure status.
    #[error("share target `{target}` exited with {status}")]
    Failed {
        /// The target that was attempted.
        target: String,
        /// The exit status reported by the process.
        status: std::process::ExitStatus,
    },
}

/// The camera/barcode provider.
///
/// The workflow controller tells the source when to be active; while
/// active, the source emits [`SourceEvent::Detected`] on its event channel.
/// Deactivation must stop the camera promptly, though already-queued
/// events may still be drained by the receiver (the controller ignores
/// detections outside `Scanning` for exactly this reason).
pub trait BarcodeSource {
    /// Start the camera feed and detection events.
    fn activate(&mut self) -> Result<(), SourceError>;

    /// Stop the camera feed. Idempotent.
    fn deactivate(&mut self);

    /// Check whether the source is currently active.
    fn is_active(&self) -> bool;
}

/// The asynchronous permission probe.
///
/// `request` must return promptly; the answer arrives later as a
/// [`SourceEvent::Permission`] on `events`.
pub trait PermissionProbe {
    /// Start the probe, reporting through `events` when done.
    fn request(&self, events: Sender<SourceEvent>);
}

/// The URL-open provider.
///
/// Takes an arbitrary string and attempts to open it as a URI. No
/// validation happens on this side of the seam; a malformed URI fails
/// however the platform opener chooses to fail.
pub trait LinkOpener {
    /// Hand the raw string to the platform opener.
    fn open(&self, target: &str) -> Result<(), OpenError>;
}

/// One named destination a payload can be shared to.
pub trait ShareTarget {
    /// Display label, also used in the `SharedWith` outcome. `None` for
    /// targets that complete without target information.
    fn label(&self) -> Option<&str>;

    /// Deliver the payload to this target.
    fn share(&self, payload: &str) -> Result<(), ShareError>;
}
