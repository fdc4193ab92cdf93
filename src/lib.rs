//! qrlink - Terminal QR link scanner
//!
//! A cross-platform CLI application that scans QR codes through an
//! external scanner helper (zbarcam by default), then opens the decoded
//! link with the platform handler or shares it to a configured target,
//! driven by an interactive TUI.

use std::sync::mpsc;
use std::time::Duration;

use anyhow::Result;

pub mod check;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod providers;
pub mod session;
pub mod signal;
pub mod tui;
pub mod workflow;

use cli::{Cli, Commands, ScanArgs};
use config::Config;
use error::ExitCode;
use logging::LogDestination;
use providers::permission::DeviceProbe;
use providers::scanner::DEFAULT_HELPER;
use providers::share::{ClipboardTarget, CommandTarget};
use providers::{HelperScanner, PermissionStatus, ShareTarget, SourceEvent, SystemOpener};
use tui::{App, Theme};
use workflow::{EventOutcome, ScanWorkflow};

/// How long the `--once` wait loop sleeps between shutdown checks.
const ONCE_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Run the application logic for the parsed CLI.
///
/// # Errors
///
/// Returns an error for unexpected failures; expected conditions
/// (permission denied, helper missing, interrupt) map to exit codes.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    if cli.no_color {
        yansi::disable();
    }

    match cli.command {
        Commands::Scan(ref args) => {
            let destination = if args.once {
                LogDestination::Stderr
            } else {
                LogDestination::File
            };
            let log_path = logging::init_logging(cli.verbose, cli.quiet, destination);

            let config = Config::load();
            if args.once {
                run_once(args, &config)
            } else {
                run_scan(args, &config, log_path)
            }
        }
        Commands::Check(ref args) => {
            logging::init_logging(cli.verbose, cli.quiet, LogDestination::Stderr);
            let config = Config::load();
            Ok(check::run_check(args, &config))
        }
    }
}

/// Resolve the scanner invocation from CLI, config, and the default.
fn resolve_scanner<'a>(args: &'a ScanArgs, config: &'a Config) -> &'a str {
    args.scanner
        .as_deref()
        .or(config.scanner.as_deref())
        .unwrap_or(DEFAULT_HELPER)
}

/// Resolve the camera device from CLI and config; `None` means the
/// platform default.
fn resolve_device<'a>(args: &'a ScanArgs, config: &'a Config) -> Option<&'a str> {
    args.device.as_deref().or(config.device.as_deref())
}

/// Assemble the share picker targets: the system clipboard first, then
/// the configured commands in order.
fn build_share_targets(config: &Config) -> Vec<Box<dyn ShareTarget>> {
    let mut targets: Vec<Box<dyn ShareTarget>> = vec![Box::new(ClipboardTarget::new())];
    for entry in &config.share_targets {
        targets.push(Box::new(CommandTarget::new(entry.clone())));
    }
    targets
}

/// Run the interactive TUI scan.
fn run_scan(
    args: &ScanArgs,
    config: &Config,
    log_path: Option<std::path::PathBuf>,
) -> Result<ExitCode> {
    let device = resolve_device(args, config);
    let (events_tx, events_rx) = mpsc::channel();

    let scanner = HelperScanner::new(resolve_scanner(args, config), device, events_tx.clone());
    let workflow = ScanWorkflow::new(scanner, SystemOpener::new(), build_share_targets(config));

    // Fire the asynchronous permission request before the first frame;
    // the answer lands in the event channel.
    let probe = DeviceProbe::new(device);
    workflow.request_camera_permission(&probe, events_tx);

    let handler = signal::install_handler()?;

    let theme = Theme::from_arg(args.theme.unwrap_or(config.theme));
    let mut app = App::new(workflow, theme, log_path);

    tui::run_tui(&mut app, &events_rx, Some(handler.get_flag()))?;

    if handler.is_shutdown_requested() {
        Ok(ExitCode::Interrupted)
    } else {
        Ok(ExitCode::Success)
    }
}

/// Run the scriptable one-shot mode: wait for the first decoded payload,
/// print it to stdout, exit.
fn run_once(args: &ScanArgs, config: &Config) -> Result<ExitCode> {
    let device = resolve_device(args, config);

    // No TUI, so the permission answer can be taken synchronously.
    let probe = DeviceProbe::new(device);
    if probe.probe() == PermissionStatus::Denied {
        log::error!("Camera is not accessible; cannot scan");
        return Ok(ExitCode::PermissionDenied);
    }

    let (events_tx, events_rx) = mpsc::channel();
    let scanner = HelperScanner::new(resolve_scanner(args, config), device, events_tx);
    let mut workflow = ScanWorkflow::new(scanner, SystemOpener::new(), Vec::new());
    workflow.handle_event(SourceEvent::Permission(PermissionStatus::Granted));

    if let Err(e) = workflow.begin_scan() {
        log::error!("{}", e);
        return Ok(ExitCode::ScannerUnavailable);
    }

    let handler = signal::install_handler()?;

    loop {
        if handler.is_shutdown_requested() {
            workflow.shutdown();
            return Ok(ExitCode::Interrupted);
        }

        match events_rx.recv_timeout(ONCE_POLL_INTERVAL) {
            Ok(event) => match workflow.handle_event(event) {
                EventOutcome::Detected => {
                    // The payload is the program's entire stdout contract.
                    println!("{}", workflow.session().payload().unwrap_or_default());
                    workflow.shutdown();
                    return Ok(ExitCode::Success);
                }
                EventOutcome::SourceLost(reason) => {
                    log::error!("Scanner stopped before a detection: {}", reason);
                    return Ok(ExitCode::GeneralError);
                }
                _ => {}
            },
            Err(mpsc::RecvTimeoutError::Timeout) => {}
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                log::error!("Scanner event channel closed unexpectedly");
                return Ok(ExitCode::GeneralError);
            }
        }
    }
}
