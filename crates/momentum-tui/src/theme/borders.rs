//! Border sets for Unicode and ASCII fallback.
//!
//! Honors the `NO_COLOR` environment variable by switching to ASCII-safe
//! borders.

use ratatui::symbols::border;

/// Which border glyphs the terminal gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BorderMode {
    /// Rounded and thick box drawing characters.
    #[default]
    Unicode,
    /// Plain and double lines only.
    Ascii,
}

impl BorderMode {
    /// Pick the mode from the environment, respecting `NO_COLOR`.
    pub fn from_env() -> Self {
        if std::env::var_os("NO_COLOR").is_some() {
            Self::Ascii
        } else {
            Self::Unicode
        }
    }
}

/// Border set for focused and unfocused panes.
#[derive(Debug, Clone, Default)]
pub struct BorderSet {
    mode: BorderMode,
}

impl BorderSet {
    /// Create a new border set with the specified mode.
    pub fn new(mode: BorderMode) -> Self {
        Self { mode }
    }

    /// Normal (unfocused) borders - rounded for Unicode, plain for ASCII.
    pub fn normal(&self) -> border::Set {
        match self.mode {
            BorderMode::Unicode => border::ROUNDED,
            BorderMode::Ascii => border::PLAIN,
        }
    }

    /// Focused borders - thick for Unicode, double for ASCII.
    pub fn focused(&self) -> border::Set {
        match self.mode {
            BorderMode::Unicode => border::THICK,
            BorderMode::Ascii => border::DOUBLE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_unicode_mode() {
        assert_eq!(BorderSet::default().normal().top_left, "╭");
    }

    #[test]
    fn test_unicode_borders() {
        let borders = BorderSet::new(BorderMode::Unicode);
        assert_eq!(borders.normal().top_left, "╭");
        assert_eq!(borders.focused().top_left, "┏");
    }

    #[test]
    fn test_ascii_borders() {
        let borders = BorderSet::new(BorderMode::Ascii);
        assert_eq!(borders.normal().top_left, "┌");
        assert_eq!(borders.focused().top_left, "╔");
    }
}
