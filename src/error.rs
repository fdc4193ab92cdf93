//! Structured error handling and exit codes.

use serde::Serialize;

/// Exit codes for the qrlink application.
///
/// - 0: Success (scan completed or TUI exited normally)
/// - 1: General error (unexpected failure)
/// - 2: Camera permission denied
/// - 3: Scanner helper unavailable
/// - 130: Interrupted by user (Ctrl+C)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Completed normally.
    Success = 0,
    /// An unexpected error occurred.
    GeneralError = 1,
    /// The camera is not accessible; scanning cannot happen.
    PermissionDenied = 2,
    /// The scanner helper could not be started.
    ScannerUnavailable = 3,
    /// Interrupted by the user (Ctrl+C).
    Interrupted = 130,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "QL000",
            Self::GeneralError => "QL001",
            Self::PermissionDenied => "QL002",
            Self::ScannerUnavailable => "QL003",
            Self::Interrupted => "QL130",
        }
    }
}

/// Structured error information for JSON output.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "QL001")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message
    pub message: String,
    /// Whether the run was interrupted
    pub interrupted: bool,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: err.to_string(),
            interrupted: exit_code == ExitCode::Interrupted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_values() {
        assert_eq!(ExitCode::Success.as_i32(), 0);
        assert_eq!(ExitCode::PermissionDenied.as_i32(), 2);
        assert_eq!(ExitCode::ScannerUnavailable.as_i32(), 3);
        assert_eq!(ExitCode::Interrupted.as_i32(), 130);
    }

    #[test]
    fn test_code_prefixes() {
        assert_eq!(ExitCode::Success.code_prefix(), "QL000");
        assert_eq!(ExitCode::Interrupted.code_prefix(), "QL130");
    }

    #[test]
    fn test_structured_error_serializes() {
        let err = anyhow::anyhow!("camera not accessible");
        let structured = StructuredError::new(&err, ExitCode::PermissionDenied);

        let json = serde_json::to_string(&structured).unwrap();
        assert!(json.contains("QL002"));
        assert!(json.contains("camera not accessible"));
        assert!(json.contains("\"interrupted\":false"));
    }
}
