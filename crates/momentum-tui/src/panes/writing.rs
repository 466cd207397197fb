//! Writing pane: a modal (vim-inspired) editor over a [`TextBuffer`].
//!
//! ```text
//! [INSERT]
//!   1 Morning pages start here|
//!   2
//! ```
//!
//! Insert mode types into the buffer. Escape switches to Normal mode,
//! where `h j k l` and the arrow keys move the cursor and `i`, `a`, `o`
//! return to Insert mode. The verbs `w b g G x d y p` are reserved: they
//! are consumed without touching the buffer.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use momentum_engine::count_words;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
};
use unicode_width::UnicodeWidthChar;

use super::Pane;
use crate::editor::{EditorMode, TextBuffer};
use crate::event::Command;
use crate::theme::Theme;

/// Rows taken by the mode indicator above the buffer.
const INDICATOR_HEIGHT: u16 = 1;

/// Minimum digits reserved for line numbers.
const MIN_NUMBER_WIDTH: usize = 3;

/// Shown while the buffer is empty.
const PLACEHOLDER: &str = "Start your morning pages...";

/// Writing pane state.
#[derive(Debug, Clone)]
pub struct WritingPane {
    buffer: TextBuffer,
    mode: EditorMode,
    width: u16,
    height: u16,
    focused: bool,
    /// Pending blinks carrying an older generation are dropped.
    blink_generation: u64,
    cursor_visible: bool,
}

impl Default for WritingPane {
    fn default() -> Self {
        Self::new()
    }
}

impl WritingPane {
    /// Create an empty, unfocused pane in Insert mode.
    pub fn new() -> Self {
        Self::with_text("")
    }

    /// Create a pane holding existing entry text.
    pub fn with_text(text: &str) -> Self {
        Self {
            buffer: if text.is_empty() {
                TextBuffer::new()
            } else {
                TextBuffer::from_text(text)
            },
            mode: EditorMode::Insert,
            width: 0,
            height: 0,
            focused: false,
            blink_generation: 0,
            cursor_visible: false,
        }
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    /// Current buffer content.
    pub fn text(&self) -> String {
        self.buffer.text()
    }

    /// Words in the buffer, using the journal's counting rule.
    pub fn word_count(&self) -> usize {
        count_words(&self.buffer.text())
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// True while focused and in Insert mode.
    pub fn is_inserting(&self) -> bool {
        self.focused && self.mode == EditorMode::Insert
    }

    pub fn cursor_visible(&self) -> bool {
        self.cursor_visible
    }

    /// Interior size last set by the shell.
    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    /// Rows available to the buffer below the mode indicator.
    pub fn viewport_height(&self) -> u16 {
        self.height.saturating_sub(INDICATOR_HEIGHT)
    }

    /// Handle a blink for `generation`, requesting the next one while
    /// the blink is still current.
    pub fn on_blink(&mut self, generation: u64) -> Option<Command> {
        if generation != self.blink_generation || !self.is_inserting() {
            return None;
        }
        self.cursor_visible = !self.cursor_visible;
        Some(Command::ScheduleBlink(generation))
    }

    fn start_blink(&mut self) -> Option<Command> {
        if !self.is_inserting() {
            return None;
        }
        self.blink_generation += 1;
        self.cursor_visible = true;
        Some(Command::ScheduleBlink(self.blink_generation))
    }

    fn stop_blink(&mut self) {
        self.blink_generation += 1;
    }

    fn handle_insert_key(&mut self, key: KeyEvent) {
        let plain = !key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);

        match key.code {
            KeyCode::Char(ch) if plain => self.buffer.insert_char(ch),
            KeyCode::Enter => self.buffer.insert_newline(),
            KeyCode::Backspace => self.buffer.backspace(),
            KeyCode::Delete => self.buffer.delete(),
            _ => self.apply_navigation(key),
        }
        self.cursor_visible = true;
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> Option<Command> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            self.apply_navigation(key);
            return None;
        }

        match key.code {
            KeyCode::Char('i' | 'a' | 'o') => {
                self.mode = EditorMode::Insert;
                return self.start_blink();
            }
            KeyCode::Char('h') => self.buffer.move_left(),
            KeyCode::Char('j') => self.buffer.move_down(),
            KeyCode::Char('k') => self.buffer.move_up(),
            KeyCode::Char('l') => self.buffer.move_right(),
            // Reserved verbs: word motion, goto, delete, yank, paste
            KeyCode::Char('w' | 'b' | 'g' | 'G' | 'x' | 'd' | 'y' | 'p') => {}
            _ => self.apply_navigation(key),
        }
        None
    }

    /// Default cursor movement shared by both modes. Other keys are ignored.
    fn apply_navigation(&mut self, key: KeyEvent) {
        let page = usize::from(self.viewport_height().max(1));
        match key.code {
            KeyCode::Left => self.buffer.move_left(),
            KeyCode::Right => self.buffer.move_right(),
            KeyCode::Up => self.buffer.move_up(),
            KeyCode::Down => self.buffer.move_down(),
            KeyCode::Home => self.buffer.move_home(),
            KeyCode::End => self.buffer.move_end(),
            KeyCode::PageUp => self.buffer.move_rows_up(page),
            KeyCode::PageDown => self.buffer.move_rows_down(page),
            _ => {}
        }
    }

    fn number_width(&self) -> usize {
        self.buffer.line_count().to_string().len().max(MIN_NUMBER_WIDTH)
    }

    fn indicator_style(&self, theme: &Theme) -> Style {
        let color = match self.mode {
            EditorMode::Insert => theme.insert_mode,
            EditorMode::Normal => theme.normal_mode,
        };
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    }
}

impl Pane for WritingPane {
    fn title(&self) -> &'static str {
        " Writing "
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<Command> {
        let command = match self.mode {
            EditorMode::Insert if key.code == KeyCode::Esc => {
                self.mode = EditorMode::Normal;
                self.stop_blink();
                // Static cursor in Normal mode
                self.cursor_visible = self.focused;
                None
            }
            EditorMode::Insert => {
                self.handle_insert_key(key);
                None
            }
            EditorMode::Normal => self.handle_normal_key(key),
        };
        self.buffer
            .scroll_to_cursor(usize::from(self.viewport_height()));
        command
    }

    fn set_size(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.buffer
            .scroll_to_cursor(usize::from(self.viewport_height()));
    }

    fn focus(&mut self) -> Option<Command> {
        self.focused = true;
        match self.mode {
            EditorMode::Insert => self.start_blink(),
            EditorMode::Normal => {
                self.cursor_visible = true;
                None
            }
        }
    }

    fn blur(&mut self) {
        self.focused = false;
        self.stop_blink();
        self.cursor_visible = false;
    }

    fn render(&self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        buf.set_stringn(
            area.x,
            area.y,
            self.mode.indicator(),
            usize::from(area.width),
            self.indicator_style(theme),
        );

        let viewport = Rect {
            y: area.y + INDICATOR_HEIGHT,
            height: area.height.saturating_sub(INDICATOR_HEIGHT),
            ..area
        };
        if viewport.height == 0 {
            return;
        }

        let number_width = self.number_width();
        let gutter = u16::try_from(number_width + 1).unwrap_or(u16::MAX);
        let text_x = viewport.x.saturating_add(gutter);
        let text_width = usize::from(viewport.width.saturating_sub(gutter));

        // Horizontal scroll keeps the cursor column on screen
        let cursor_col = self.buffer.cursor_display_col();
        let h_offset = if text_width > 0 && cursor_col >= text_width {
            cursor_col + 1 - text_width
        } else {
            0
        };

        let (cursor_row, _) = self.buffer.cursor();
        let text_style = Style::default().fg(theme.text);

        for screen_row in 0..viewport.height {
            let line_index = self.buffer.scroll() + usize::from(screen_row);
            let Some(line) = self.buffer.line(line_index) else {
                break;
            };
            let y = viewport.y + screen_row;

            let number_style = if line_index == cursor_row {
                Style::default().fg(theme.secondary)
            } else {
                Style::default().fg(theme.muted)
            };
            buf.set_stringn(
                viewport.x,
                y,
                format!("{:>number_width$} ", line_index + 1),
                usize::from(viewport.width),
                number_style,
            );

            if text_width == 0 {
                continue;
            }

            if self.buffer.is_empty() {
                buf.set_stringn(
                    text_x,
                    y,
                    PLACEHOLDER,
                    text_width,
                    Style::default().fg(theme.muted),
                );
            } else {
                let visible = visible_columns(line, h_offset, text_width);
                buf.set_stringn(text_x, y, visible, text_width, text_style);
            }
        }

        if self.focused && self.cursor_visible && text_width > 0 {
            let row = cursor_row.checked_sub(self.buffer.scroll());
            if let Some(row) = row.filter(|r| *r < usize::from(viewport.height)) {
                let x = text_x + u16::try_from(cursor_col - h_offset).unwrap_or(0);
                let y = viewport.y + u16::try_from(row).unwrap_or(0);
                if let Some(cell) = buf.cell_mut((x, y)) {
                    cell.set_style(Style::default().add_modifier(Modifier::REVERSED));
                }
            }
        }
    }
}

/// Text of `line` between display columns `offset` and `offset + width`.
fn visible_columns(line: &[char], offset: usize, width: usize) -> String {
    let mut out = String::new();
    let mut col = 0;
    for &ch in line {
        let w = ch.width().unwrap_or(0);
        if col >= offset {
            if col + w > offset + width {
                break;
            }
            out.push(ch);
        }
        col += w;
    }
    out
}
