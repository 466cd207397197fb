//! Pane focus for the split layout.
//!
//! - Writing: the modal editor (left)
//! - Conversation: the agent pane (right)

/// Which pane has keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusedPane {
    /// Writing pane has focus.
    #[default]
    Writing,
    /// Conversation pane has focus.
    Conversation,
}

impl FocusedPane {
    /// Toggle focus to the other pane.
    #[must_use]
    pub fn toggle(self) -> Self {
        match self {
            Self::Writing => Self::Conversation,
            Self::Conversation => Self::Writing,
        }
    }

    /// Short label for the status bar.
    pub fn label(self) -> &'static str {
        match self {
            Self::Writing => "Writing",
            Self::Conversation => "Conversation",
        }
    }
}
