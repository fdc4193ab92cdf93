//! End-to-end workflow tests over mock providers.
//!
//! These drive the same path the TUI drives: user actions into the app,
//! provider events through the mpsc channel, state read back through the
//! session. No terminal and no real helper process are involved.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};

use qrlink::providers::{
    BarcodeSource, Detection, LinkOpener, OpenError, PermissionStatus, ShareError, ShareOutcome,
    ShareTarget, SourceError, SourceEvent,
};
use qrlink::session::{Permission, ViewMode};
use qrlink::tui::{Action, App, Theme};
use qrlink::workflow::ScanWorkflow;

/// A scripted barcode source: queues the given payloads into the event
/// channel on every activation, like a helper that decodes instantly.
struct ScriptedSource {
    per_activation: Vec<String>,
    events: Sender<SourceEvent>,
    active: Arc<AtomicBool>,
    activations: Arc<AtomicUsize>,
}

impl BarcodeSource for ScriptedSource {
    fn activate(&mut self) -> Result<(), SourceError> {
        self.active.store(true, Ordering::SeqCst);
        self.activations.fetch_add(1, Ordering::SeqCst);
        for payload in &self.per_activation {
            let _ = self.events.send(SourceEvent::Detected(Detection {
                symbology: "QR-Code".to_string(),
                data: payload.clone(),
            }));
        }
        Ok(())
    }

    fn deactivate(&mut self) {
        self.active.store(false, Ordering::SeqCst);
    }

    fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}

#[derive(Clone, Default)]
struct RecordingOpener {
    opened: Arc<Mutex<Vec<String>>>,
}

impl LinkOpener for RecordingOpener {
    fn open(&self, target: &str) -> Result<(), OpenError> {
        self.opened.lock().unwrap().push(target.to_string());
        Ok(())
    }
}

struct DismissiveTarget;

impl ShareTarget for DismissiveTarget {
    fn label(&self) -> Option<&str> {
        Some("clipboard")
    }

    fn share(&self, _payload: &str) -> Result<(), ShareError> {
        Ok(())
    }
}

struct Harness {
    app: App<ScriptedSource, RecordingOpener>,
    events: mpsc::Receiver<SourceEvent>,
    opened: Arc<Mutex<Vec<String>>>,
    active: Arc<AtomicBool>,
    activations: Arc<AtomicUsize>,
}

impl Harness {
    fn new(per_activation: &[&str]) -> Self {
        let (tx, rx) = mpsc::channel();
        let active = Arc::new(AtomicBool::new(false));
        let activations = Arc::new(AtomicUsize::new(0));

        let source = ScriptedSource {
            per_activation: per_activation.iter().map(|s| s.to_string()).collect(),
            events: tx,
            active: Arc::clone(&active),
            activations: Arc::clone(&activations),
        };
        let opener = RecordingOpener::default();
        let opened = opener.opened.clone();

        let workflow = ScanWorkflow::new(
            source,
            opener,
            vec![Box::new(DismissiveTarget) as Box<dyn ShareTarget>],
        );
        let app = App::new(workflow, Theme::dark(), None);

        Self {
            app,
            events: rx,
            opened,
            active,
            activations,
        }
    }

    fn grant_permission(&mut self) {
        self.app
            .handle_source_event(SourceEvent::Permission(PermissionStatus::Granted));
    }

    fn deny_permission(&mut self) {
        self.app
            .handle_source_event(SourceEvent::Permission(PermissionStatus::Denied));
    }

    /// Drain the event channel into the app, like one TUI frame does.
    fn pump(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            self.app.handle_source_event(event);
        }
    }

    fn mode(&self) -> ViewMode {
        self.app.workflow().session().mode()
    }

    fn payload(&self) -> Option<String> {
        self.app
            .workflow()
            .session()
            .payload()
            .map(str::to_string)
    }
}

#[test]
fn full_roundtrip_scan_to_result_to_scan() {
    let mut h = Harness::new(&["X"]);
    h.grant_permission();

    assert_eq!(h.mode(), ViewMode::Idle);
    h.app.handle_action(Action::Scan);
    assert_eq!(h.mode(), ViewMode::Scanning);

    h.pump();
    assert_eq!(h.mode(), ViewMode::Result);
    assert_eq!(h.payload().as_deref(), Some("X"));
    assert!(!h.active.load(Ordering::SeqCst));

    // Scan another: payload cleared, source rearmed
    h.app.handle_action(Action::Scan);
    assert_eq!(h.mode(), ViewMode::Scanning);
    assert_eq!(h.payload(), None);
    assert_eq!(h.activations.load(Ordering::SeqCst), 2);
}

#[test]
fn only_first_of_burst_detections_lands() {
    // The helper decodes the same physical code repeatedly before the
    // controller gets to deactivate it.
    let mut h = Harness::new(&["first", "first", "second"]);
    h.grant_permission();
    h.app.handle_action(Action::Scan);

    h.pump();
    assert_eq!(h.mode(), ViewMode::Result);
    assert_eq!(h.payload().as_deref(), Some("first"));
}

#[test]
fn permission_denied_disables_scanning() {
    let mut h = Harness::new(&["X"]);
    h.deny_permission();

    assert_eq!(
        h.app.workflow().session().permission(),
        Permission::Denied
    );

    h.app.handle_action(Action::Scan);
    assert_eq!(h.mode(), ViewMode::Idle);
    // No camera activation side effect happened
    assert_eq!(h.activations.load(Ordering::SeqCst), 0);
    h.pump();
    assert_eq!(h.mode(), ViewMode::Idle);
}

#[test]
fn open_passes_literal_payload_once() {
    let mut h = Harness::new(&["https://example.com"]);
    h.grant_permission();
    h.app.handle_action(Action::Scan);
    h.pump();

    h.app.handle_action(Action::Open);
    assert_eq!(
        h.opened.lock().unwrap().as_slice(),
        ["https://example.com".to_string()]
    );

    // Session untouched by the delegation
    assert_eq!(h.mode(), ViewMode::Result);
    assert_eq!(h.payload().as_deref(), Some("https://example.com"));
}

#[test]
fn share_dismissal_leaves_session_unchanged() {
    let mut h = Harness::new(&["https://example.com"]);
    h.grant_permission();
    h.app.handle_action(Action::Scan);
    h.pump();

    h.app.handle_action(Action::Share);
    h.app.handle_action(Action::Cancel);

    assert_eq!(h.mode(), ViewMode::Result);
    assert_eq!(h.payload().as_deref(), Some("https://example.com"));
    assert_eq!(
        h.app.workflow().share_log(),
        &[ShareOutcome::Dismissed]
    );
}

#[test]
fn share_confirm_records_target_outcome() {
    let mut h = Harness::new(&["payload"]);
    h.grant_permission();
    h.app.handle_action(Action::Scan);
    h.pump();

    h.app.handle_action(Action::Share);
    h.app.handle_action(Action::Confirm);

    assert_eq!(
        h.app.workflow().share_log(),
        &[ShareOutcome::SharedWith("clipboard".to_string())]
    );
    assert_eq!(h.mode(), ViewMode::Result);
}

#[test]
fn cancel_returns_to_idle_without_payload() {
    // No scripted detections: the scan stays open until cancelled.
    let mut h = Harness::new(&[]);
    h.grant_permission();
    h.app.handle_action(Action::Scan);
    assert_eq!(h.mode(), ViewMode::Scanning);

    h.app.handle_action(Action::Cancel);
    assert_eq!(h.mode(), ViewMode::Idle);
    assert_eq!(h.payload(), None);
    assert!(!h.active.load(Ordering::SeqCst));
}

#[test]
fn stray_detection_after_cancel_is_ignored() {
    let mut h = Harness::new(&[]);
    h.grant_permission();
    h.app.handle_action(Action::Scan);
    h.app.handle_action(Action::Cancel);

    // A queued event from the reader thread lands after cancellation
    h.app.handle_source_event(SourceEvent::Detected(Detection {
        symbology: "QR-Code".to_string(),
        data: "late".to_string(),
    }));

    assert_eq!(h.mode(), ViewMode::Idle);
    assert_eq!(h.payload(), None);
}
