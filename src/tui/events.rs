//! TUI event handling with crossterm.
//!
//! Translates keyboard input into [`Action`]s:
//! - `s` / `a`: start a scan / scan another
//! - `o`: open the decoded link
//! - `h`: share the decoded link
//! - arrows or `j`/`k`: move in the share picker
//! - Enter: confirm, Esc: cancel
//! - `q` / Ctrl+C: quit
//!
//! Keys map to the same action regardless of mode; the [`App`] decides
//! what an action means in its current state.
//!
//! [`App`]: super::app::App

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use thiserror::Error;

use super::app::Action;

/// Error type for event handling.
#[derive(Debug, Error)]
pub enum EventError {
    /// I/O error while polling or reading terminal events.
    #[error("event I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Polls the terminal for key events and maps them to actions.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventHandler;

impl EventHandler {
    /// Create a new event handler.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Poll for an action, waiting at most `timeout`.
    ///
    /// Returns `Ok(None)` when no key arrived or the key is unbound.
    pub fn poll(&self, timeout: Duration) -> Result<Option<Action>, EventError> {
        if !event::poll(timeout)? {
            return Ok(None);
        }

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => Ok(map_key(key)),
            _ => Ok(None),
        }
    }
}

/// Map one key press to an action.
fn map_key(key: KeyEvent) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    match key.code {
        KeyCode::Char('s') | KeyCode::Char('a') => Some(Action::Scan),
        KeyCode::Char('o') => Some(Action::Open),
        KeyCode::Char('h') => Some(Action::Share),
        KeyCode::Up | KeyCode::Char('k') => Some(Action::NavigateUp),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::NavigateDown),
        KeyCode::Enter => Some(Action::Confirm),
        KeyCode::Esc => Some(Action::Cancel),
        KeyCode::Char('q') => Some(Action::Quit),
        _ => None,
    }
}
