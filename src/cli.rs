//! Command-line interface definitions.
//!
//! All CLI arguments, subcommands, and options via the clap derive API:
//! global options (verbosity, color, JSON errors) plus subcommands for
//! scanning and environment checking.
//!
//! # Example
//!
//! ```bash
//! # Interactive TUI scan (default camera)
//! qrlink scan
//!
//! # Scan a specific device with a custom helper
//! qrlink scan --device /dev/video2 --scanner "zbarcam --raw"
//!
//! # Scriptable: print the first decoded payload and exit
//! qrlink scan --once
//!
//! # Probe camera permission and helper availability
//! qrlink check
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

/// Terminal QR code scanner with open/share actions.
///
/// qrlink drives an external scanner helper (zbarcam by default) to decode
/// QR codes from the camera, then lets you open the decoded link in the
/// default handler or share it to a configured target.
#[derive(Debug, Parser)]
#[command(name = "qrlink")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Report fatal errors as JSON on stderr
    #[arg(long, global = true)]
    pub json_errors: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Scan a QR code, then open or share the decoded link
    Scan(ScanArgs),
    /// Check camera permission and scanner helper availability
    Check(CheckArgs),
}

/// Arguments for the scan subcommand.
#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Camera device node (default: /dev/video0 on Linux)
    #[arg(long, value_name = "PATH")]
    pub device: Option<String>,

    /// Scanner helper invocation (default: zbarcam)
    ///
    /// The helper must print one decoded payload per stdout line, either
    /// raw or as SYMBOLOGY:payload.
    #[arg(long, value_name = "CMD")]
    pub scanner: Option<String>,

    /// Print the first decoded payload to stdout and exit (no TUI)
    #[arg(long)]
    pub once: bool,

    /// TUI color theme
    #[arg(long, value_enum)]
    pub theme: Option<ThemeArg>,
}

/// Arguments for the check subcommand.
#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Camera device node to probe
    #[arg(long, value_name = "PATH")]
    pub device: Option<String>,

    /// Scanner helper invocation to look up
    #[arg(long, value_name = "CMD")]
    pub scanner: Option<String>,
}

/// TUI theme selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeArg {
    /// Detect from the terminal environment
    #[default]
    Auto,
    /// High-contrast dark palette
    Dark,
    /// High-contrast light palette
    Light,
}

impl std::fmt::Display for ThemeArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ThemeArg::Auto => write!(f, "auto"),
            ThemeArg::Dark => write!(f, "dark"),
            ThemeArg::Light => write!(f, "light"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parses() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_scan_defaults() {
        let cli = Cli::parse_from(["qrlink", "scan"]);
        match cli.command {
            Commands::Scan(args) => {
                assert!(args.device.is_none());
                assert!(args.scanner.is_none());
                assert!(!args.once);
                assert!(args.theme.is_none());
            }
            Commands::Check(_) => panic!("expected scan"),
        }
    }

    #[test]
    fn test_scan_with_options() {
        let cli = Cli::parse_from([
            "qrlink", "-v", "scan", "--device", "/dev/video2", "--scanner", "zbarcam --raw",
            "--once", "--theme", "dark",
        ]);
        assert_eq!(cli.verbose, 1);
        match cli.command {
            Commands::Scan(args) => {
                assert_eq!(args.device.as_deref(), Some("/dev/video2"));
                assert_eq!(args.scanner.as_deref(), Some("zbarcam --raw"));
                assert!(args.once);
                assert_eq!(args.theme, Some(ThemeArg::Dark));
            }
            Commands::Check(_) => panic!("expected scan"),
        }
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from(["qrlink", "-v", "-q", "scan"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_theme_arg_display() {
        assert_eq!(ThemeArg::Auto.to_string(), "auto");
        assert_eq!(ThemeArg::Dark.to_string(), "dark");
        assert_eq!(ThemeArg::Light.to_string(), "light");
    }
}
