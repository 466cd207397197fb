//! UI widgets for the TUI.
//!
//! This module provides:
//! - [`PaneFrame`] - Bordered pane frame with focus styling
//! - [`StatusBar`] - Bottom bar with word count progress and key hints

mod pane_frame;
mod status_bar;

pub use pane_frame::PaneFrame;
pub use status_bar::{StatusBar, StatusBarState};
#[cfg(test)]
pub(crate) use status_bar::NOTICE_TICKS;
