//! Focusable panes.
//!
//! The shell routes key events to exactly one pane through the [`Pane`]
//! trait, so adding a pane means adding a [`FocusedPane`] variant and an
//! implementation here.
//!
//! [`FocusedPane`]: crate::layout::FocusedPane

mod conversation;
mod writing;

pub use conversation::ConversationPane;
pub use writing::WritingPane;

use crossterm::event::KeyEvent;
use ratatui::{buffer::Buffer, layout::Rect};

use crate::event::Command;
use crate::theme::Theme;

/// A region that can hold keyboard focus.
pub trait Pane {
    /// Title drawn in the pane frame.
    fn title(&self) -> &'static str;

    /// Handle a key forwarded by the shell.
    fn handle_key(&mut self, key: KeyEvent) -> Option<Command>;

    /// Set the interior size available for content.
    fn set_size(&mut self, width: u16, height: u16);

    /// Gain focus. May request a follow-up such as a cursor blink.
    fn focus(&mut self) -> Option<Command>;

    /// Lose focus, dropping visual focus cues.
    fn blur(&mut self);

    /// Render content into the interior area.
    fn render(&self, area: Rect, buf: &mut Buffer, theme: &Theme);
}
