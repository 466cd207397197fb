//! momentum-tui: Terminal UI for the Momentum Journal writing session
//!
//! This crate provides the TUI layer for momentum, including:
//! - Writing pane with a modal (Normal/Insert) editor
//! - Conversation pane for agent reflections
//! - Responsive two-pane layout with a status bar
//! - The event loop that ties input, autosave and the agent together

mod editor;
mod event;
mod layout;
mod panes;
mod session;
mod shell;
#[cfg(test)]
pub mod test_utils;
mod theme;
mod widgets;

pub use editor::{EditorMode, TextBuffer};
pub use event::{Command, Event, EventHandler};
pub use layout::{compute_layout, FocusedPane, LayoutGeometry, PaneSize};
pub use momentum_engine;
pub use panes::{ConversationPane, Pane, WritingPane};
pub use session::{AppContext, Session, BLINK_INTERVAL};
pub use shell::{Shell, TICK_RATE_MS};
pub use theme::Theme;

use crossterm::{
    cursor::Show as ShowCursor,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use momentum_engine::Entry;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::io::stdout;
use tracing::info;

/// RAII guard for terminal state restoration.
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(stdout(), LeaveAlternateScreen, ShowCursor);
    }
}

/// Run a writing session for `entry`.
///
/// Sets up the terminal, runs the event loop until the user quits and
/// restores the terminal on exit. Returns the entry as last saved, or the
/// error of the last save if it failed.
pub async fn run_tui(ctx: &AppContext, entry: Entry) -> Result<Entry, Box<dyn std::error::Error>> {
    enable_raw_mode()?;
    let _guard = TerminalGuard;

    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut events = EventHandler::new(TICK_RATE_MS);
    let mut shell = Shell::new(&ctx.config, &entry.content);
    let mut session = Session::new(ctx, entry, events.sender());

    let result = run_loop(&mut terminal, &mut shell, &mut session, &mut events).await;

    terminal.show_cursor()?;
    result?;

    // A failed final save must not be reported as saved
    let entry = session.finish()?;
    info!(file = %entry.file_name, words = entry.word_count, "session finished");
    Ok(entry)
}

/// Drive the shell until it quits.
///
/// Each iteration draws, waits for one event, updates the shell and runs
/// the resulting commands.
async fn run_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    shell: &mut Shell,
    session: &mut Session<'_>,
    events: &mut EventHandler,
) -> Result<(), Box<dyn std::error::Error>> {
    let size = terminal.size()?;
    let mut commands = shell.update(Event::Resize(size.width, size.height));
    commands.extend(shell.init());

    loop {
        let quit = session.execute_all(commands, &shell.writing_text());
        terminal.draw(|frame| shell.render(frame))?;
        if quit {
            return Ok(());
        }

        let Some(event) = events.next().await else {
            // Input closed without a quit; keep what was written
            session.execute(Command::Save(shell.writing_text()), "");
            return Ok(());
        };
        commands = shell.update(event);
    }
}

/// Returns the TUI version.
pub fn tui_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
