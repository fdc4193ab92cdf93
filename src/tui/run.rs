//! TUI main loop.
//!
//! Entry point for the interactive interface: terminal setup (raw mode,
//! alternate screen, hidden cursor), the frame-limited event loop, and
//! cleanup on exit, including on panic.
//!
//! Each loop iteration:
//! 1. Check the external shutdown flag and the app's quit flag
//! 2. Drain pending provider events from the channel
//! 3. Render the current state
//! 4. Poll the keyboard with a timeout and apply at most one action

use std::io::{self, Stdout};
use std::panic;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Receiver;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::{
    cursor, execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use thiserror::Error;

use crate::providers::{BarcodeSource, LinkOpener, SourceEvent};

use super::app::App;
use super::events::EventHandler;
use super::ui::render;

/// Frame rate limit: ~60 FPS.
const FRAME_DURATION: Duration = Duration::from_millis(16);

/// Event poll timeout, matched to the frame duration.
const POLL_TIMEOUT: Duration = Duration::from_millis(16);

/// Error type for TUI operations.
#[derive(Debug, Error)]
pub enum TuiError {
    /// I/O error from terminal operations.
    #[error("terminal I/O error: {0}")]
    Io(#[from] io::Error),

    /// Event handling error.
    #[error("event error: {0}")]
    Event(#[from] super::events::EventError),
}

/// Result type for TUI operations.
pub type TuiResult<T> = Result<T, TuiError>;

/// Type alias for the terminal backend.
type Terminal = ratatui::Terminal<CrosstermBackend<Stdout>>;

/// Run the interactive TUI until the user quits or shutdown is signalled.
///
/// `events` is the provider channel (permission probe, scanner reader).
/// The terminal is always restored, including on panic.
pub fn run_tui<S: BarcodeSource, O: LinkOpener>(
    app: &mut App<S, O>,
    events: &Receiver<SourceEvent>,
    shutdown_flag: Option<Arc<AtomicBool>>,
) -> TuiResult<()> {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        original_hook(panic_info);
    }));

    let result = run_tui_inner(app, events, shutdown_flag);

    let _ = panic::take_hook();
    result
}

fn run_tui_inner<S: BarcodeSource, O: LinkOpener>(
    app: &mut App<S, O>,
    events: &Receiver<SourceEvent>,
    shutdown_flag: Option<Arc<AtomicBool>>,
) -> TuiResult<()> {
    let mut terminal = setup_terminal()?;
    let event_handler = EventHandler::new();
    let mut last_render = Instant::now();

    loop {
        if let Some(ref flag) = shutdown_flag {
            if flag.load(Ordering::SeqCst) {
                log::info!("Shutdown signal received, exiting TUI");
                break;
            }
        }

        if app.should_quit() {
            log::debug!("App requested quit");
            break;
        }

        // Apply everything the provider threads queued since last frame.
        while let Ok(event) = events.try_recv() {
            app.handle_source_event(event);
        }

        terminal.draw(|frame| render(frame, app))?;

        if let Some(action) = event_handler.poll(POLL_TIMEOUT)? {
            app.handle_action(action);
        }

        // Frame rate limiting
        let elapsed = last_render.elapsed();
        if elapsed < FRAME_DURATION {
            std::thread::sleep(FRAME_DURATION - elapsed);
        }
        last_render = Instant::now();
    }

    restore_terminal()?;
    log::info!("TUI exited normally");
    Ok(())
}

/// Set up the terminal for TUI mode.
fn setup_terminal() -> TuiResult<Terminal> {
    log::debug!("Setting up terminal for TUI");

    terminal::enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, cursor::Hide)?;

    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to its original state.
fn restore_terminal() -> TuiResult<()> {
    let _ = terminal::disable_raw_mode();

    let mut stdout = io::stdout();
    let _ = execute!(stdout, LeaveAlternateScreen, cursor::Show);

    log::debug!("Terminal restored");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tui_error_display() {
        let io_err = io::Error::other("broken pipe");
        let tui_err = TuiError::Io(io_err);
        assert!(tui_err.to_string().contains("terminal I/O error"));
    }

    #[test]
    fn test_frame_timing_constants() {
        // Poll timeout should match the frame duration so a held key
        // cannot starve rendering.
        assert_eq!(FRAME_DURATION, POLL_TIMEOUT);
        assert_eq!(FRAME_DURATION.as_millis(), 16);
    }
}
