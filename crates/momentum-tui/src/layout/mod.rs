//! Layout components for the TUI.
//!
//! This module provides:
//! - [`compute_layout`] - Pure terminal size to pane geometry calculation
//! - [`FocusedPane`] - Which pane has keyboard focus

mod focus;
mod geometry;

pub use focus::FocusedPane;
pub use geometry::{compute_layout, LayoutGeometry, PaneSize, STATUS_BAR_HEIGHT};
