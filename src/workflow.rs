//! Scan workflow controller.
//!
//! # Overview
//!
//! [`ScanWorkflow`] mediates between the barcode/permission providers and
//! user intents, maintaining the [`ScanSession`] and triggering at most one
//! outbound action at a time. It is the only code that mutates the session.
//!
//! # State machine
//!
//! ```text
//!   Idle --begin_scan--> Scanning --detection--> Result
//!     ^                     |                      |
//!     +----cancel-----------+     scan again       |
//!     +<------------------------------------------ +  (back to Scanning)
//! ```
//!
//! The barcode source is activated exactly while the session is in
//! `Scanning`. Detections arriving in any other mode are ignored, so
//! duplicate events for one physical code cannot fire twice.
//!
//! # Side effects
//!
//! Opening and sharing are fire-and-forget: outcomes flow into a single
//! logging sink ([`ScanWorkflow::share_log`]) and never mutate the
//! session. A failed share is logged, not surfaced as an error dialog.

use std::sync::mpsc::Sender;

use crate::providers::{
    BarcodeSource, LinkOpener, PermissionProbe, PermissionStatus, ShareOutcome, ShareTarget,
    SourceError, SourceEvent,
};
use crate::session::{Permission, ScanSession};

/// What a provider event did to the workflow, for the UI's benefit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    /// The permission probe reported; the session's permission is now set.
    PermissionSet(Permission),
    /// A detection was accepted and the session moved to `Result`.
    Detected,
    /// The barcode source stopped on its own; any active scan was
    /// cancelled back to `Idle`.
    SourceLost(String),
    /// The event had no effect (duplicate detection, stray report).
    Ignored,
}

/// The scan workflow controller.
///
/// Owns the [`ScanSession`] and the provider handles. All methods run on
/// the UI thread; provider threads reach the controller only through the
/// [`SourceEvent`] channel drained by the event loop.
pub struct ScanWorkflow<S, O> {
    session: ScanSession,
    source: S,
    opener: O,
    targets: Vec<Box<dyn ShareTarget>>,
    share_log: Vec<ShareOutcome>,
}

impl<S: BarcodeSource, O: LinkOpener> ScanWorkflow<S, O> {
    /// Create a workflow over the given providers.
    #[must_use]
    pub fn new(source: S, opener: O, targets: Vec<Box<dyn ShareTarget>>) -> Self {
        Self {
            session: ScanSession::new(),
            source,
            opener,
            targets,
            share_log: Vec::new(),
        }
    }

    /// Read access to the session for rendering.
    #[must_use]
    pub fn session(&self) -> &ScanSession {
        &self.session
    }

    /// Labels of the configured share targets, in picker order.
    #[must_use]
    pub fn share_target_labels(&self) -> Vec<Option<&str>> {
        self.targets.iter().map(|t| t.label()).collect()
    }

    /// Number of configured share targets.
    #[must_use]
    pub fn share_target_count(&self) -> usize {
        self.targets.len()
    }

    /// The share outcome sink, oldest first.
    #[must_use]
    pub fn share_log(&self) -> &[ShareOutcome] {
        &self.share_log
    }

    // ==================== Startup ====================

    /// Kick off the asynchronous permission request.
    ///
    /// Returns immediately; the answer arrives as a
    /// [`SourceEvent::Permission`] and is applied by [`Self::handle_event`].
    pub fn request_camera_permission(&self, probe: &dyn PermissionProbe, events: Sender<SourceEvent>) {
        log::debug!("Requesting camera permission");
        probe.request(events);
    }

    // ==================== Provider events ====================

    /// Apply one provider event. Called from the UI event loop only.
    pub fn handle_event(&mut self, event: SourceEvent) -> EventOutcome {
        match event {
            SourceEvent::Permission(status) => {
                let permission = match status {
                    PermissionStatus::Granted => Permission::Granted,
                    PermissionStatus::Denied => Permission::Denied,
                };
                self.session.set_permission(permission);
                EventOutcome::PermissionSet(self.session.permission())
            }
            SourceEvent::Detected(detection) => {
                if self.session.record_detection(&detection.data) {
                    // First detection wins; stop the camera so the helper
                    // does not keep decoding into a closed scan.
                    self.source.deactivate();
                    log::info!("Scanned {} payload: {}", detection.symbology, detection.data);
                    EventOutcome::Detected
                } else {
                    EventOutcome::Ignored
                }
            }
            SourceEvent::SourceLost(reason) => {
                log::warn!("Barcode source lost: {}", reason);
                self.source.deactivate();
                if self.session.cancel_scan() {
                    EventOutcome::SourceLost(reason)
                } else {
                    EventOutcome::Ignored
                }
            }
        }
    }

    // ==================== User intents ====================

    /// Start scanning from `Idle` or `Result`.
    ///
    /// Silently does nothing unless permission is granted (`Ok(false)`).
    /// When the source cannot be activated, the session returns to `Idle`
    /// and the error is passed up for the status line.
    pub fn begin_scan(&mut self) -> Result<bool, SourceError> {
        if !self.session.begin_scan() {
            return Ok(false);
        }

        if let Err(e) = self.source.activate() {
            log::error!("Failed to activate barcode source: {}", e);
            self.session.cancel_scan();
            return Err(e);
        }
        Ok(true)
    }

    /// Cancel an active scan, returning to `Idle`.
    pub fn cancel_scan(&mut self) -> bool {
        if self.session.cancel_scan() {
            self.source.deactivate();
            true
        } else {
            false
        }
    }

    /// Open the decoded payload with the platform URL opener.
    ///
    /// Pass-through of the raw string; failures are logged and otherwise
    /// left to the platform. Returns whether a delegation happened.
    pub fn open_decoded_link(&self) -> bool {
        let Some(payload) = self.session.payload() else {
            return false;
        };

        if let Err(e) = self.opener.open(payload) {
            // Not surfaced further: the opener owns its failure UI.
            log::error!("Failed to launch URL opener: {}", e);
        }
        true
    }

    /// Share the decoded payload to the target at `index`.
    ///
    /// Returns the outcome for the status line, or `None` when there is no
    /// payload or no such target. Failures are logged, never raised.
    pub fn share_decoded_link(&mut self, index: usize) -> Option<ShareOutcome> {
        let payload = self.session.payload()?.to_string();
        let target = self.targets.get(index)?;

        match target.share(&payload) {
            Ok(()) => {
                let outcome = match target.label() {
                    Some(label) => ShareOutcome::SharedWith(label.to_string()),
                    None => ShareOutcome::Shared,
                };
                self.record_outcome(outcome.clone());
                Some(outcome)
            }
            Err(e) => {
                log::error!("Share invocation failed: {}", e);
                None
            }
        }
    }

    /// Record that the user backed out of the share picker.
    pub fn share_dismissed(&mut self) {
        self.record_outcome(ShareOutcome::Dismissed);
    }

    // ==================== Outcome sink ====================

    /// The single sink all share outcomes flow through.
    fn record_outcome(&mut self, outcome: ShareOutcome) {
        match &outcome {
            ShareOutcome::SharedWith(target) => log::info!("Link shared via {}", target),
            ShareOutcome::Shared => log::info!("Link shared"),
            ShareOutcome::Dismissed => log::info!("Share dismissed"),
        }
        self.share_log.push(outcome);
    }

    /// Stop the source on teardown.
    pub fn shutdown(&mut self) {
        self.source.deactivate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{Detection, OpenError, ShareError};
    use crate::session::ViewMode;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    /// Barcode source that records activation state.
    #[derive(Default)]
    struct FakeSource {
        active: bool,
        activations: usize,
        fail_activate: bool,
    }

    impl BarcodeSource for FakeSource {
        fn activate(&mut self) -> Result<(), SourceError> {
            if self.fail_activate {
                return Err(SourceError::NoOutput("fake".to_string()));
            }
            self.active = true;
            self.activations += 1;
            Ok(())
        }

        fn deactivate(&mut self) {
            self.active = false;
        }

        fn is_active(&self) -> bool {
            self.active
        }
    }

    /// Opener that counts calls and remembers the last target.
    #[derive(Clone, Default)]
    struct FakeOpener {
        calls: Rc<Cell<usize>>,
        last: Rc<RefCell<Option<String>>>,
    }

    impl LinkOpener for FakeOpener {
        fn open(&self, target: &str) -> Result<(), OpenError> {
            self.calls.set(self.calls.get() + 1);
            *self.last.borrow_mut() = Some(target.to_string());
            Ok(())
        }
    }

    struct FakeTarget {
        label: Option<&'static str>,
        fail: bool,
    }

    impl ShareTarget for FakeTarget {
        fn label(&self) -> Option<&str> {
            self.label
        }

        fn share(&self, _payload: &str) -> Result<(), ShareError> {
            if self.fail {
                Err(ShareError::Spawn {
                    target: "fake".to_string(),
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
                })
            } else {
                Ok(())
            }
        }
    }

    fn workflow_with(
        source: FakeSource,
        opener: FakeOpener,
        targets: Vec<Box<dyn ShareTarget>>,
    ) -> ScanWorkflow<FakeSource, FakeOpener> {
        ScanWorkflow::new(source, opener, targets)
    }

    fn granted_workflow() -> ScanWorkflow<FakeSource, FakeOpener> {
        let mut wf = workflow_with(
            FakeSource::default(),
            FakeOpener::default(),
            vec![Box::new(FakeTarget {
                label: Some("clipboard"),
                fail: false,
            })],
        );
        wf.handle_event(SourceEvent::Permission(PermissionStatus::Granted));
        wf
    }

    fn detection(data: &str) -> SourceEvent {
        SourceEvent::Detected(Detection {
            symbology: "QR-Code".to_string(),
            data: data.to_string(),
        })
    }

    #[test]
    fn test_begin_scan_denied_is_silent_noop() {
        let mut wf = workflow_with(FakeSource::default(), FakeOpener::default(), vec![]);
        wf.handle_event(SourceEvent::Permission(PermissionStatus::Denied));

        assert_eq!(wf.begin_scan().unwrap(), false);
        assert_eq!(wf.session().mode(), ViewMode::Idle);
        // No camera activation side effect
        assert!(!wf.source.is_active());
        assert_eq!(wf.source.activations, 0);
    }

    #[test]
    fn test_begin_scan_activates_source() {
        let mut wf = granted_workflow();
        assert!(wf.begin_scan().unwrap());
        assert_eq!(wf.session().mode(), ViewMode::Scanning);
        assert!(wf.source.is_active());
    }

    #[test]
    fn test_activation_failure_reverts_to_idle() {
        let mut wf = workflow_with(
            FakeSource {
                fail_activate: true,
                ..FakeSource::default()
            },
            FakeOpener::default(),
            vec![],
        );
        wf.handle_event(SourceEvent::Permission(PermissionStatus::Granted));

        assert!(wf.begin_scan().is_err());
        assert_eq!(wf.session().mode(), ViewMode::Idle);
        assert!(wf.session().payload().is_none());
    }

    #[test]
    fn test_detection_transitions_and_deactivates() {
        let mut wf = granted_workflow();
        wf.begin_scan().unwrap();

        let outcome = wf.handle_event(detection("https://example.com"));
        assert_eq!(outcome, EventOutcome::Detected);
        assert_eq!(wf.session().mode(), ViewMode::Result);
        assert_eq!(wf.session().payload(), Some("https://example.com"));
        assert!(!wf.source.is_active());
    }

    #[test]
    fn test_duplicate_detections_ignored() {
        let mut wf = granted_workflow();
        wf.begin_scan().unwrap();

        assert_eq!(wf.handle_event(detection("first")), EventOutcome::Detected);
        assert_eq!(wf.handle_event(detection("second")), EventOutcome::Ignored);
        assert_eq!(wf.handle_event(detection("third")), EventOutcome::Ignored);
        assert_eq!(wf.session().payload(), Some("first"));
    }

    #[test]
    fn test_scan_again_roundtrip() {
        let mut wf = granted_workflow();
        wf.begin_scan().unwrap();
        wf.handle_event(detection("X"));
        assert_eq!(wf.session().payload(), Some("X"));

        // "Scan another" clears the payload and rearms the source
        assert!(wf.begin_scan().unwrap());
        assert_eq!(wf.session().mode(), ViewMode::Scanning);
        assert!(wf.session().payload().is_none());
        assert!(wf.source.is_active());
        assert_eq!(wf.source.activations, 2);
    }

    #[test]
    fn test_open_delegates_exactly_once_per_call() {
        let opener = FakeOpener::default();
        let calls = opener.calls.clone();
        let last = opener.last.clone();

        let mut wf = workflow_with(FakeSource::default(), opener, vec![]);
        wf.handle_event(SourceEvent::Permission(PermissionStatus::Granted));
        wf.begin_scan().unwrap();
        wf.handle_event(detection("https://example.com"));

        assert!(wf.open_decoded_link());
        assert_eq!(calls.get(), 1);
        assert_eq!(last.borrow().as_deref(), Some("https://example.com"));

        // Repeating the action never mutates the session
        assert!(wf.open_decoded_link());
        assert_eq!(calls.get(), 2);
        assert_eq!(wf.session().mode(), ViewMode::Result);
        assert_eq!(wf.session().payload(), Some("https://example.com"));
    }

    #[test]
    fn test_open_without_payload_is_noop() {
        let opener = FakeOpener::default();
        let calls = opener.calls.clone();

        let wf = workflow_with(FakeSource::default(), opener, vec![]);
        assert!(!wf.open_decoded_link());
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_share_with_labeled_target() {
        let mut wf = granted_workflow();
        wf.begin_scan().unwrap();
        wf.handle_event(detection("payload"));

        let outcome = wf.share_decoded_link(0);
        assert_eq!(outcome, Some(ShareOutcome::SharedWith("clipboard".to_string())));
        assert_eq!(wf.share_log().len(), 1);

        // Idempotent with respect to the session
        assert_eq!(wf.session().mode(), ViewMode::Result);
        assert_eq!(wf.session().payload(), Some("payload"));
    }

    #[test]
    fn test_share_with_unlabeled_target() {
        let mut wf = workflow_with(
            FakeSource::default(),
            FakeOpener::default(),
            vec![Box::new(FakeTarget {
                label: None,
                fail: false,
            })],
        );
        wf.handle_event(SourceEvent::Permission(PermissionStatus::Granted));
        wf.begin_scan().unwrap();
        wf.handle_event(detection("payload"));

        assert_eq!(wf.share_decoded_link(0), Some(ShareOutcome::Shared));
    }

    #[test]
    fn test_share_failure_logged_not_raised() {
        let mut wf = workflow_with(
            FakeSource::default(),
            FakeOpener::default(),
            vec![Box::new(FakeTarget {
                label: Some("broken"),
                fail: true,
            })],
        );
        wf.handle_event(SourceEvent::Permission(PermissionStatus::Granted));
        wf.begin_scan().unwrap();
        wf.handle_event(detection("payload"));

        assert_eq!(wf.share_decoded_link(0), None);
        // Session untouched by the failure
        assert_eq!(wf.session().mode(), ViewMode::Result);
        assert_eq!(wf.session().payload(), Some("payload"));
        // Failures are not outcomes; the sink records completions only
        assert!(wf.share_log().is_empty());
    }

    #[test]
    fn test_share_dismissed_records_one_entry() {
        let mut wf = granted_workflow();
        wf.begin_scan().unwrap();
        wf.handle_event(detection("payload"));

        wf.share_dismissed();
        assert_eq!(wf.share_log(), &[ShareOutcome::Dismissed]);
        assert_eq!(wf.session().mode(), ViewMode::Result);
        assert_eq!(wf.session().payload(), Some("payload"));
    }

    #[test]
    fn test_share_without_payload_is_noop() {
        let mut wf = granted_workflow();
        assert_eq!(wf.share_decoded_link(0), None);
        assert!(wf.share_log().is_empty());
    }

    #[test]
    fn test_source_lost_cancels_scan() {
        let mut wf = granted_workflow();
        wf.begin_scan().unwrap();

        let outcome = wf.handle_event(SourceEvent::SourceLost("helper exited".to_string()));
        assert_eq!(outcome, EventOutcome::SourceLost("helper exited".to_string()));
        assert_eq!(wf.session().mode(), ViewMode::Idle);
        assert!(!wf.source.is_active());
    }

    #[test]
    fn test_source_lost_outside_scanning_ignored() {
        let mut wf = granted_workflow();
        let outcome = wf.handle_event(SourceEvent::SourceLost("late".to_string()));
        assert_eq!(outcome, EventOutcome::Ignored);
        assert_eq!(wf.session().mode(), ViewMode::Idle);
    }

    #[test]
    fn test_cancel_scan_deactivates() {
        let mut wf = granted_workflow();
        wf.begin_scan().unwrap();
        assert!(wf.cancel_scan());
        assert_eq!(wf.session().mode(), ViewMode::Idle);
        assert!(!wf.source.is_active());
    }
}
