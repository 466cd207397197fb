//! Split layout geometry.
//!
//! ```text
//! ┏━ Writing ━━━━━━━━━━━━━━━━━┓╭─ Conversation ─╮
//! ┃ [INSERT]                  ┃│                │
//! ┃   1 Morning pages...      ┃│                │
//! ┗━━━━━━━━━━━━━━━━━━━━━━━━━━━┛╰────────────────╯
//! Writing │ Words: 2/750           [Tab] switch …
//! ```
//!
//! The writing pane takes 65% of the width, the conversation pane the
//! rest, and both are floored at [`MIN_PANE_WIDTH`] columns.

/// Minimum outer width of either pane.
pub const MIN_PANE_WIDTH: u16 = 10;

/// Share of the terminal width given to the writing pane.
pub const WRITING_SHARE: f64 = 0.65;

/// Height of the status bar row.
pub const STATUS_BAR_HEIGHT: u16 = 1;

/// Columns taken by a pane frame: one border and one padding column per side.
pub const FRAME_HORIZONTAL: u16 = 4;

/// Rows taken by a pane frame: top and bottom border.
pub const FRAME_VERTICAL: u16 = 2;

/// Width and height of a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PaneSize {
    pub width: u16,
    pub height: u16,
}

impl PaneSize {
    /// Size left for content once the pane frame is drawn.
    pub fn interior(self) -> Self {
        Self {
            width: self.width.saturating_sub(FRAME_HORIZONTAL),
            height: self.height.saturating_sub(FRAME_VERTICAL),
        }
    }
}

/// Geometry for one terminal size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LayoutGeometry {
    /// Outer size of the writing pane, frame included.
    pub writing: PaneSize,
    /// Outer size of the conversation pane, frame included.
    pub conversation: PaneSize,
    /// Height of the status bar.
    pub status_bar_height: u16,
}

impl LayoutGeometry {
    /// Height shared by both panes.
    pub fn main_height(&self) -> u16 {
        self.writing.height
    }
}

/// Compute pane geometry for a terminal of `width` x `height`.
///
/// When the terminal is narrower than two minimum panes, both panes keep
/// the floor and the overflow is clipped at render time.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn compute_layout(width: u16, height: u16, status_bar_height: u16) -> LayoutGeometry {
    let main_height = height.saturating_sub(status_bar_height);

    let mut writing_width = (f64::from(width) * WRITING_SHARE).round() as u16;
    if writing_width < MIN_PANE_WIDTH {
        writing_width = MIN_PANE_WIDTH;
    }

    let mut conversation_width = width.saturating_sub(writing_width);
    if conversation_width < MIN_PANE_WIDTH {
        conversation_width = MIN_PANE_WIDTH;
        // Writing yields space to satisfy the conversation floor
        writing_width = width.saturating_sub(conversation_width).max(MIN_PANE_WIDTH);
    }

    LayoutGeometry {
        writing: PaneSize {
            width: writing_width,
            height: main_height,
        },
        conversation: PaneSize {
            width: conversation_width,
            height: main_height,
        },
        status_bar_height,
    }
}
