//! Asynchronous camera permission probe.
//!
//! On desktop platforms there is no grant dialog to wait on; access to the
//! camera is decided by whether the device node can be opened. The probe
//! runs on a background thread so startup never blocks on a slow or
//! misbehaving device, and reports through the shared event channel.

use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::mpsc::Sender;
use std::thread;

use super::{PermissionProbe, PermissionStatus, SourceEvent};

/// Default camera device node probed when none is configured.
#[cfg(target_os = "linux")]
pub const DEFAULT_DEVICE: &str = "/dev/video0";

/// On non-Linux platforms the helper owns device discovery; there is no
/// node to probe, so the default probe target is empty and access is
/// assumed granted.
#[cfg(not(target_os = "linux"))]
pub const DEFAULT_DEVICE: &str = "";

/// A [`PermissionProbe`] that checks read access on a camera device node.
#[derive(Debug, Clone)]
pub struct DeviceProbe {
    device: PathBuf,
}

impl DeviceProbe {
    /// Probe the given device node, or the platform default when `None`.
    #[must_use]
    pub fn new(device: Option<&str>) -> Self {
        Self {
            device: PathBuf::from(device.unwrap_or(DEFAULT_DEVICE)),
        }
    }

    /// The device node this probe will check.
    #[must_use]
    pub fn device(&self) -> &std::path::Path {
        &self.device
    }

    /// Perform the check synchronously. Used by the `check` subcommand and
    /// by the background thread that `request` spawns.
    #[must_use]
    pub fn probe(&self) -> PermissionStatus {
        if self.device.as_os_str().is_empty() {
            // Nothing to probe on this platform; the helper will surface
            // any access failure itself.
            return PermissionStatus::Granted;
        }

        match File::open(&self.device) {
            Ok(_) => PermissionStatus::Granted,
            Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
                log::warn!("Camera device {} is not readable: {}", self.device.display(), e);
                PermissionStatus::Denied
            }
            Err(e) => {
                log::warn!("Camera device {} unavailable: {}", self.device.display(), e);
                PermissionStatus::Denied
            }
        }
    }
}

impl PermissionProbe for DeviceProbe {
    fn request(&self, events: Sender<SourceEvent>) {
        let probe = self.clone();
        thread::spawn(move || {
            let status = probe.probe();
            // Receiver gone means the app already exited; nothing to do.
            let _ = events.send(SourceEvent::Permission(status));
        });
    }
}
