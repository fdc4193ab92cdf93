//! Barcode source backed by an external scanner helper.
//!
//! # Overview
//!
//! The camera feed and the decoding algorithm live in a separate,
//! platform-provided program (by default `zbarcam`). This module spawns
//! that helper when the workflow enters `Scanning`, reads decoded payloads
//! line-by-line from its stdout on a reader thread, and kills it again on
//! deactivation.
//!
//! # Helper output contract
//!
//! One decoded payload per line, in either of zbarcam's two styles:
//! - `--raw` mode: the bare payload
//! - default mode: `SYMBOLOGY:payload` (e.g. `QR-Code:https://...`)
//!
//! Both are accepted; the symbology tag defaults to "QR-Code" when absent.

use std::io::{BufRead, BufReader};
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};

use super::{BarcodeSource, Detection, SourceError, SourceEvent};

/// Default scanner helper invocation.
pub const DEFAULT_HELPER: &str = "zbarcam";

/// Symbology assumed for raw (untagged) helper output.
const DEFAULT_SYMBOLOGY: &str = "QR-Code";

/// A [`BarcodeSource`] that drives an external scanner helper process.
pub struct HelperScanner {
    helper: String,
    device: Option<String>,
    events: Sender<SourceEvent>,
    child: Option<Child>,
    reader: Option<JoinHandle<()>>,
}

impl HelperScanner {
    /// Create a scanner around `helper`, reporting through `events`.
    ///
    /// `device` is passed to the helper as its final argument when set
    /// (zbarcam takes the video device node positionally).
    #[must_use]
    pub fn new(helper: &str, device: Option<&str>, events: Sender<SourceEvent>) -> Self {
        Self {
            helper: helper.to_string(),
            device: device.map(str::to_string),
            events,
            child: None,
            reader: None,
        }
    }

    /// The helper invocation this source will spawn.
    #[must_use]
    pub fn helper(&self) -> &str {
        &self.helper
    }

    fn spawn_helper(&self) -> Result<Child, SourceError> {
        let mut parts = self.helper.split_whitespace();
        let program = parts.next().unwrap_or(DEFAULT_HELPER);

        let mut command = Command::new(program);
        command.args(parts);
        if let Some(device) = &self.device {
            command.arg(device);
        }

        command
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .stdin(Stdio::null())
            .spawn()
            .map_err(|source| SourceError::SpawnFailed {
                helper: self.helper.clone(),
                source,
            })
    }
}

impl BarcodeSource for HelperScanner {
    fn activate(&mut self) -> Result<(), SourceError> {
        if self.child.is_some() {
            return Ok(());
        }

        let mut child = self.spawn_helper()?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| SourceError::NoOutput(self.helper.clone()))?;

        log::info!("Scanner helper started: {}", self.helper);

        let events = self.events.clone();
        let reader = thread::spawn(move || {
            let reader = BufReader::new(stdout);
            for line in reader.lines() {
                match line {
                    Ok(line) => {
                        let line = line.trim();
                        if line.is_empty() {
                            continue;
                        }
                        let detection = parse_detection(line);
                        log::debug!("Detection event: {} ({})", detection.data, detection.symbology);
                        if events.send(SourceEvent::Detected(detection)).is_err() {
                            // Receiver gone; the app is shutting down.
                            break;
                        }
                    }
                    Err(e) => {
                        let _ = events.send(SourceEvent::SourceLost(e.to_string()));
                        break;
                    }
                }
            }
            log::debug!("Scanner reader thread finished");
        });

        self.child = Some(child);
        self.reader = Some(reader);
        Ok(())
    }

    fn deactivate(&mut self) {
        if let Some(mut child) = self.child.take() {
            log::info!("Stopping scanner helper");
            if let Err(e) = child.kill() {
                log::warn!("Failed to kill scanner helper: {}", e);
            }
            let _ = child.wait();
        }
        // Killing the helper closes its stdout, so the reader thread ends
        // on its own; join to avoid leaking it.
        if let Some(reader) = self.reader.take() {
            let _ = reader.join();
        }
    }

    fn is_active(&self) -> bool {
        self.child.is_some()
    }
}

impl Drop for HelperScanner {
    fn drop(&mut self) {
        self.deactivate();
    }
}

/// Parse one helper output line into a detection event.
///
/// Splits `SYMBOLOGY:payload` on the first colon only when the prefix is a
/// known symbology name; raw payloads containing colons (`https://...`,
/// `mailto:...`) pass through whole.
fn parse_detection(line: &str) -> Detection {
    if let Some((prefix, rest)) = line.split_once(':') {
        if is_symbology_tag(prefix) {
            return Detection {
                symbology: prefix.to_string(),
                data: rest.to_string(),
            };
        }
    }

    Detection {
        symbology: DEFAULT_SYMBOLOGY.to_string(),
        data: line.to_string(),
    }
}

/// Symbology names zbar emits in its tagged output style.
fn is_symbology_tag(prefix: &str) -> bool {
    matches!(
        prefix,
        "QR-Code"
            | "EAN-13"
            | "EAN-8"
            | "UPC-A"
            | "UPC-E"
            | "ISBN-10"
            | "ISBN-13"
            | "I2/5"
            | "DataBar"
            | "DataBar-Exp"
            | "Codabar"
            | "Code-39"
            | "Code-93"
            | "Code-128"
            | "PDF417"
            | "SQ-Code"
    )
}
