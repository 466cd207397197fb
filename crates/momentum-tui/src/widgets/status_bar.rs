//! Status bar widget for the bottom of the TUI.
//!
//! Format: `Writing │ Words: 312/750 (41%)          [Tab] switch pane │ [q] quit`
//!
//! A transient notice replaces the hints until it expires.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::layout::FocusedPane;
use crate::theme::Theme;

/// Ticks a notice stays visible (about 3 seconds at 4 Hz).
pub const NOTICE_TICKS: u16 = 12;

/// A single keybinding hint.
#[derive(Debug, Clone)]
pub struct KeyHint {
    /// The key or key combination (e.g., "Tab").
    pub key: &'static str,
    /// The action description (e.g., "switch pane").
    pub action: &'static str,
}

impl KeyHint {
    /// Create a new key hint.
    pub const fn new(key: &'static str, action: &'static str) -> Self {
        Self { key, action }
    }
}

/// Navigation hints shown on the right of the bar.
const HINTS: [KeyHint; 2] = [KeyHint::new("Tab", "switch pane"), KeyHint::new("q", "quit")];

/// Values pushed to the status bar by the shell.
#[derive(Debug, Clone)]
pub struct StatusBarState {
    width: u16,
    word_count: usize,
    goal: usize,
    notice: Option<(String, u16)>,
}

impl StatusBarState {
    /// Create status bar state for the given word count goal.
    pub fn new(goal: usize) -> Self {
        Self {
            width: 0,
            word_count: 0,
            goal,
            notice: None,
        }
    }

    pub fn set_size(&mut self, width: u16) {
        self.width = width;
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn set_word_count(&mut self, word_count: usize) {
        self.word_count = word_count;
    }

    pub fn word_count(&self) -> usize {
        self.word_count
    }

    pub fn goal(&self) -> usize {
        self.goal
    }

    /// Progress text, e.g. `312/750`.
    pub fn progress(&self) -> String {
        format!("{}/{}", self.word_count, self.goal)
    }

    /// Whole percent of the goal reached.
    pub fn percent(&self) -> usize {
        self.word_count * 100 / self.goal.max(1)
    }

    /// Show a transient notice.
    pub fn notify(&mut self, message: impl Into<String>) {
        self.notice = Some((message.into(), NOTICE_TICKS));
    }

    /// Current notice, if one is showing.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_ref().map(|(message, _)| message.as_str())
    }

    /// Advance notice expiry by one tick.
    pub fn tick(&mut self) {
        if let Some((_, remaining)) = &mut self.notice {
            *remaining = remaining.saturating_sub(1);
            if *remaining == 0 {
                self.notice = None;
            }
        }
    }
}

/// Status bar widget.
pub struct StatusBar<'a> {
    state: &'a StatusBarState,
    theme: &'a Theme,
    focused_pane: FocusedPane,
}

impl<'a> StatusBar<'a> {
    /// Create a new status bar widget.
    pub fn new(state: &'a StatusBarState, focused_pane: FocusedPane, theme: &'a Theme) -> Self {
        Self {
            state,
            theme,
            focused_pane,
        }
    }

    fn right_spans(&self) -> Vec<Span<'a>> {
        if let Some(notice) = self.state.notice() {
            return vec![Span::styled(
                notice.to_string(),
                Style::default().fg(self.theme.warning),
            )];
        }

        let mut spans = Vec::new();
        for (i, hint) in HINTS.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" │ ", Style::default().fg(self.theme.muted)));
            }
            spans.push(Span::styled("[", Style::default().fg(self.theme.muted)));
            spans.push(Span::styled(hint.key, Style::default().fg(self.theme.primary)));
            spans.push(Span::styled("] ", Style::default().fg(self.theme.muted)));
            spans.push(Span::styled(hint.action, Style::default().fg(self.theme.subtext)));
        }
        spans
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let progress_color = if self.state.word_count() >= self.state.goal() {
            self.theme.success
        } else {
            self.theme.text
        };

        let left = Line::from(vec![
            Span::styled(
                self.focused_pane.label(),
                Style::default().fg(self.theme.primary),
            ),
            Span::styled(" │ ", Style::default().fg(self.theme.muted)),
            Span::styled("Words: ", Style::default().fg(self.theme.subtext)),
            Span::styled(self.state.progress(), Style::default().fg(progress_color)),
            Span::styled(
                format!(" ({}%)", self.state.percent()),
                Style::default().fg(self.theme.muted),
            ),
        ]);
        let left_width = u16::try_from(left.width()).unwrap_or(u16::MAX);

        let right = Line::from(self.right_spans());
        let right_width = u16::try_from(right.width()).unwrap_or(u16::MAX);

        let style = Style::default().bg(self.theme.surface);
        Paragraph::new(left).style(style).render(area, buf);

        // Right side only when it fits beside the progress
        if left_width.saturating_add(right_width).saturating_add(1) <= area.width {
            let right_area = Rect {
                x: area.x + area.width - right_width,
                width: right_width,
                ..area
            };
            Paragraph::new(right).style(style).render(right_area, buf);
        }
    }
}
