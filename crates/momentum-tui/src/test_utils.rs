//! Test utilities for momentum-tui view and state tests.
//!
//! Helpers for building key events, driving panes and rendering the shell
//! into a [`TestBackend`] so assertions can be made on plain strings.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};

use crate::event::Event;
use crate::panes::Pane;
use crate::shell::Shell;

/// Key event without modifiers.
pub fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

/// Key event for a printable character.
pub fn press(ch: char) -> KeyEvent {
    let modifiers = if ch.is_ascii_uppercase() {
        KeyModifiers::SHIFT
    } else {
        KeyModifiers::NONE
    };
    KeyEvent::new(KeyCode::Char(ch), modifiers)
}

/// Key event for `ctrl+<ch>`.
pub fn ctrl(ch: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL)
}

/// Type `text` into a pane one key at a time.
pub fn type_text(pane: &mut impl Pane, text: &str) {
    for ch in text.chars() {
        pane.handle_key(press(ch));
    }
}

/// Feed `text` to the shell as key events.
pub fn type_into_shell(shell: &mut Shell, text: &str) {
    for ch in text.chars() {
        shell.update(Event::Key(press(ch)));
    }
}

/// Convert a buffer to a string, trimming trailing spaces on each row.
pub fn buffer_to_string(buffer: &Buffer) -> String {
    let area = buffer.area;
    let mut result = String::new();

    for y in area.y..area.y + area.height {
        for x in area.x..area.x + area.width {
            let cell = buffer.cell((x, y)).unwrap();
            result.push_str(cell.symbol());
        }
        while result.ends_with(' ') {
            result.pop();
        }
        result.push('\n');
    }

    if result.ends_with('\n') {
        result.pop();
    }

    result
}

/// Render the shell into a test terminal of the given size.
pub fn render_shell_to_string(shell: &Shell, width: u16, height: u16) -> String {
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend).expect("Failed to create test terminal");
    terminal
        .draw(|frame| shell.render(frame))
        .expect("Failed to draw shell");
    buffer_to_string(terminal.backend().buffer())
}
