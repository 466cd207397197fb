//! Modal text editing primitives.
//!
//! - [`TextBuffer`] - Lines, cursor and scroll state
//! - [`EditorMode`] - Normal/Insert mode flag

mod buffer;

pub use buffer::TextBuffer;

/// Editing mode of the writing pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorMode {
    /// Keys navigate; editing verbs are reserved.
    Normal,
    /// Keys insert text.
    #[default]
    Insert,
}

impl EditorMode {
    /// Mode indicator shown above the buffer.
    pub fn indicator(self) -> &'static str {
        match self {
            Self::Normal => "[NORMAL]",
            Self::Insert => "[INSERT]",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_mode_is_insert() {
        assert_eq!(EditorMode::default(), EditorMode::Insert);
    }

    #[test]
    fn test_indicators() {
        assert_eq!(EditorMode::Normal.indicator(), "[NORMAL]");
        assert_eq!(EditorMode::Insert.indicator(), "[INSERT]");
    }
}
