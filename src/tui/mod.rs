//! Terminal User Interface module.
//!
//! The interactive scan interface, built on ratatui with the crossterm
//! backend:
//! - [`app`]: application state (workflow wrapper, share picker, status)
//! - [`events`]: keyboard event handling
//! - [`ui`]: rendering
//! - [`run`]: terminal lifecycle and the main loop
//! - [`theme`]: color palettes
//!
//! # Architecture
//!
//! Unidirectional data flow: terminal events become [`Action`]s, actions
//! and provider events mutate the [`App`], the UI renders from the `App`.

pub mod app;
pub mod events;
pub mod run;
pub mod theme;
pub mod ui;

// Re-export commonly used types
pub use app::{Action, App};
pub use events::{EventError, EventHandler};
pub use run::{run_tui, TuiError, TuiResult};
pub use theme::Theme;
