//! Conversation pane: a scrollable transcript of agent reflections.
//!
//! `Enter` asks for a reflection on the current entry. Replies stream in
//! token by token and the view follows the newest line until the user
//! scrolls back with `k` or `Up`. `End` resumes following.

use crossterm::event::{KeyCode, KeyEvent};
use momentum_engine::AgentEvent;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use super::Pane;
use crate::event::Command;
use crate::theme::Theme;

const PLACEHOLDER: &str = "Press Enter for a reflection on today's pages.";
const THINKING: &str = "Thinking...";

/// A single agent reply.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Reflection {
    text: String,
    failed: bool,
}

#[derive(Debug, Clone, Copy)]
enum LineKind {
    Heading,
    Body,
    Error,
    Pending,
}

/// Conversation pane state.
#[derive(Debug, Clone, Default)]
pub struct ConversationPane {
    reflections: Vec<Reflection>,
    awaiting: bool,
    width: u16,
    height: u16,
    focused: bool,
    /// First visible wrapped line when not following.
    scroll: usize,
    follow: bool,
}

impl ConversationPane {
    pub fn new() -> Self {
        Self {
            follow: true,
            ..Self::default()
        }
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// True while a reflection is streaming in.
    pub fn is_awaiting(&self) -> bool {
        self.awaiting
    }

    /// Number of reflections in the transcript.
    pub fn reflection_count(&self) -> usize {
        self.reflections.len()
    }

    /// Text of the newest reflection.
    pub fn last_reflection(&self) -> Option<&str> {
        self.reflections.last().map(|r| r.text.as_str())
    }

    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    /// Open a new reflection that incoming tokens append to.
    pub fn begin_reflection(&mut self) {
        self.reflections.push(Reflection {
            text: String::new(),
            failed: false,
        });
        self.awaiting = true;
        self.follow = true;
    }

    /// Apply one streamed agent event to the transcript.
    pub fn push_agent_event(&mut self, event: AgentEvent) {
        match event {
            AgentEvent::Token(token) => {
                if !self.awaiting {
                    self.begin_reflection();
                }
                if let Some(reflection) = self.reflections.last_mut() {
                    reflection.text.push_str(&token);
                }
            }
            AgentEvent::Done => self.awaiting = false,
            AgentEvent::Failed(message) => {
                match self.reflections.last_mut() {
                    Some(reflection) if self.awaiting && reflection.text.is_empty() => {
                        reflection.text = message;
                        reflection.failed = true;
                    }
                    _ => self.reflections.push(Reflection {
                        text: message,
                        failed: true,
                    }),
                }
                self.awaiting = false;
            }
        }
    }

    fn wrapped_lines(&self, width: usize) -> Vec<(String, LineKind)> {
        let width = width.max(1);
        let mut lines = Vec::new();

        for (i, reflection) in self.reflections.iter().enumerate() {
            if i > 0 {
                lines.push((String::new(), LineKind::Body));
            }
            let (heading, kind) = if reflection.failed {
                ("Reflection failed", LineKind::Error)
            } else {
                ("Reflection", LineKind::Body)
            };
            lines.push((heading.to_string(), LineKind::Heading));

            if reflection.text.is_empty() {
                lines.push((THINKING.to_string(), LineKind::Pending));
                continue;
            }
            for paragraph in reflection.text.split('\n') {
                if paragraph.is_empty() {
                    lines.push((String::new(), kind));
                    continue;
                }
                for wrapped in textwrap::wrap(paragraph, width) {
                    lines.push((wrapped.into_owned(), kind));
                }
            }
        }
        lines
    }

    fn max_scroll(&self) -> usize {
        self.wrapped_lines(usize::from(self.width))
            .len()
            .saturating_sub(usize::from(self.height))
    }

    fn effective_scroll(&self, max_scroll: usize) -> usize {
        if self.follow {
            max_scroll
        } else {
            self.scroll.min(max_scroll)
        }
    }

    fn scroll_up(&mut self, rows: usize) {
        let current = self.effective_scroll(self.max_scroll());
        self.scroll = current.saturating_sub(rows);
        self.follow = false;
    }

    fn scroll_down(&mut self, rows: usize) {
        let max = self.max_scroll();
        self.scroll = (self.effective_scroll(max) + rows).min(max);
        self.follow = self.scroll == max;
    }
}

impl Pane for ConversationPane {
    fn title(&self) -> &'static str {
        " Conversation "
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<Command> {
        let page = usize::from(self.height.max(1));
        match key.code {
            KeyCode::Enter if !self.awaiting => return Some(Command::RequestReflection),
            KeyCode::Char('k') | KeyCode::Up => self.scroll_up(1),
            KeyCode::Char('j') | KeyCode::Down => self.scroll_down(1),
            KeyCode::PageUp => self.scroll_up(page),
            KeyCode::PageDown => self.scroll_down(page),
            KeyCode::Home => {
                self.scroll = 0;
                self.follow = false;
            }
            KeyCode::End => self.follow = true,
            _ => {}
        }
        None
    }

    fn set_size(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
    }

    fn focus(&mut self) -> Option<Command> {
        self.focused = true;
        None
    }

    fn blur(&mut self) {
        self.focused = false;
    }

    fn render(&self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        if self.reflections.is_empty() {
            let placeholder = textwrap::wrap(PLACEHOLDER, usize::from(area.width))
                .into_iter()
                .map(|line| Line::styled(line.into_owned(), Style::default().fg(theme.muted)))
                .collect::<Vec<_>>();
            Paragraph::new(placeholder).render(area, buf);
            return;
        }

        let lines = self.wrapped_lines(usize::from(area.width));
        let max_scroll = lines.len().saturating_sub(usize::from(area.height));
        let offset = self.effective_scroll(max_scroll);

        let visible: Vec<Line<'_>> = lines
            .into_iter()
            .skip(offset)
            .take(usize::from(area.height))
            .map(|(text, kind)| {
                let style = match kind {
                    LineKind::Heading => Style::default()
                        .fg(theme.primary)
                        .add_modifier(Modifier::BOLD),
                    LineKind::Body => Style::default().fg(theme.text),
                    LineKind::Error => Style::default().fg(theme.error),
                    LineKind::Pending => Style::default()
                        .fg(theme.muted)
                        .add_modifier(Modifier::ITALIC),
                };
                Line::from(Span::styled(text, style))
            })
            .collect();

        Paragraph::new(visible).render(area, buf);
    }
}
