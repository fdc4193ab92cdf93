//! Environment diagnostics for the `check` subcommand.
//!
//! Probes the two external collaborators a scan needs before the TUI is
//! ever started: read access on the camera device node, and presence of
//! the scanner helper on `PATH`. Exit codes make the result scriptable.

use std::env;
use std::path::{Path, PathBuf};

use yansi::Paint;

use crate::cli::CheckArgs;
use crate::config::Config;
use crate::error::ExitCode;
use crate::providers::permission::{DeviceProbe, DEFAULT_DEVICE};
use crate::providers::scanner::DEFAULT_HELPER;
use crate::providers::PermissionStatus;

/// Run the environment check, printing one line per probe.
#[must_use]
pub fn run_check(args: &CheckArgs, config: &Config) -> ExitCode {
    let device = args
        .device
        .as_deref()
        .or(config.device.as_deref())
        .unwrap_or(DEFAULT_DEVICE);
    let helper = args
        .scanner
        .as_deref()
        .or(config.scanner.as_deref())
        .unwrap_or(DEFAULT_HELPER);

    let probe = DeviceProbe::new(Some(device));
    let permission = probe.probe();
    match permission {
        PermissionStatus::Granted => {
            println!("camera device {:<20} {}", display_device(device), "ok".green().bold());
        }
        PermissionStatus::Denied => {
            println!("camera device {:<20} {}", display_device(device), "not accessible".red().bold());
        }
    }

    let helper_program = helper.split_whitespace().next().unwrap_or(helper);
    let helper_path = find_in_path(helper_program);
    match &helper_path {
        Some(path) => {
            println!(
                "scanner helper {:<19} {} ({})",
                helper_program,
                "found".green().bold(),
                path.display()
            );
        }
        None => {
            println!(
                "scanner helper {:<19} {}",
                helper_program,
                "not found".red().bold()
            );
        }
    }

    if permission == PermissionStatus::Denied {
        ExitCode::PermissionDenied
    } else if helper_path.is_none() {
        ExitCode::ScannerUnavailable
    } else {
        ExitCode::Success
    }
}

fn display_device(device: &str) -> &str {
    if device.is_empty() {
        "(helper-managed)"
    } else {
        device
    }
}

/// Locate a program on `PATH`.
fn find_in_path(program: &str) -> Option<PathBuf> {
    // Absolute or relative invocations bypass the PATH search.
    if program.contains(std::path::MAIN_SEPARATOR) {
        let path = Path::new(program);
        return is_executable(path).then(|| path.to_path_buf());
    }

    let paths = env::var_os("PATH")?;
    env::split_paths(&paths)
        .map(|dir| dir.join(program))
        .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
