//! Pane frame widget: border, title and padding around pane content.
//!
//! Supports focused/unfocused states with different border styles.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Padding, Widget},
};

use crate::theme::{BorderSet, Theme};

/// Frame drawn around a pane. Content is rendered separately into
/// [`PaneFrame::inner`].
pub struct PaneFrame<'a> {
    title: Option<&'a str>,
    focused: bool,
    theme: &'a Theme,
    borders: &'a BorderSet,
}

impl<'a> PaneFrame<'a> {
    /// Create a new pane frame.
    pub fn new(theme: &'a Theme, borders: &'a BorderSet) -> Self {
        Self {
            title: None,
            focused: false,
            theme,
            borders,
        }
    }

    /// Set the pane title.
    #[must_use]
    pub fn title(mut self, title: &'a str) -> Self {
        self.title = Some(title);
        self
    }

    /// Set whether the pane is focused.
    #[must_use]
    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    /// Area left for content inside the frame.
    pub fn inner(&self, area: Rect) -> Rect {
        self.block().inner(area)
    }

    fn block(&self) -> Block<'a> {
        let (border_set, border_style, title_style) = if self.focused {
            (
                self.borders.focused(),
                Style::default().fg(self.theme.border_focused),
                Style::default().fg(self.theme.primary),
            )
        } else {
            (
                self.borders.normal(),
                Style::default().fg(self.theme.border),
                Style::default().fg(self.theme.subtext),
            )
        };

        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_set(border_set)
            .border_style(border_style)
            .padding(Padding::horizontal(1));

        if let Some(title) = self.title {
            block = block.title(title).title_style(title_style);
        }
        block
    }
}

impl Widget for PaneFrame<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block().render(area, buf);
    }
}
