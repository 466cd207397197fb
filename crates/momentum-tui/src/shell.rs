//! Application shell: owns both panes and the status bar and routes every
//! event to them.
//!
//! The shell is a plain state machine. [`Shell::update`] consumes one
//! [`Event`] and returns the [`Command`]s the event loop should run; no
//! I/O happens here.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use momentum_engine::{AgentEvent, Config};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    widgets::{Paragraph, Widget},
    Frame,
};
use tracing::{debug, info, warn};

use crate::editor::EditorMode;
use crate::event::{Command, Event};
use crate::layout::{compute_layout, FocusedPane, LayoutGeometry, STATUS_BAR_HEIGHT};
use crate::panes::{ConversationPane, Pane, WritingPane};
use crate::theme::{BorderMode, BorderSet, Theme};
use crate::widgets::{PaneFrame, StatusBar, StatusBarState};

/// Interval between `Event::Tick`s.
pub const TICK_RATE_MS: u64 = 250;

const QUITTING_MESSAGE: &str = "Saving and quitting Momentum Journal...";
const INITIALIZING_MESSAGE: &str = "Initializing...";

/// Top-level TUI state.
#[derive(Debug)]
pub struct Shell {
    writing: WritingPane,
    conversation: ConversationPane,
    status: StatusBarState,
    focused_pane: FocusedPane,
    geometry: LayoutGeometry,
    terminal_size: (u16, u16),
    quitting: bool,
    theme: Theme,
    borders: BorderSet,
    /// Ticks between autosave checks.
    autosave_ticks: u64,
    ticks_since_save: u64,
    /// Buffer revision last handed to `Command::Save`. `None` forces the
    /// next check to save.
    saved_revision: Option<u64>,
}

impl Shell {
    /// Create a shell for a session whose entry currently holds `text`.
    pub fn new(config: &Config, text: &str) -> Self {
        let writing = WritingPane::with_text(text);
        let saved_revision = Some(writing.buffer().revision());
        let autosave_ticks =
            (config.journal.autosave_interval.saturating_mul(1000) / TICK_RATE_MS).max(1);

        let mut status = StatusBarState::new(config.journal.word_count_goal);
        status.set_word_count(writing.word_count());

        Self {
            writing,
            conversation: ConversationPane::new(),
            status,
            focused_pane: FocusedPane::default(),
            geometry: LayoutGeometry::default(),
            terminal_size: (0, 0),
            quitting: false,
            theme: Theme::from_name(&config.ui.theme),
            borders: BorderSet::new(BorderMode::from_env()),
            autosave_ticks,
            ticks_since_save: 0,
            saved_revision,
        }
    }

    /// Give the initially focused pane focus. Returns its follow-ups.
    pub fn init(&mut self) -> Vec<Command> {
        self.focus_pane(self.focused_pane).into_iter().collect()
    }

    pub fn focused_pane(&self) -> FocusedPane {
        self.focused_pane
    }

    pub fn is_quitting(&self) -> bool {
        self.quitting
    }

    pub fn geometry(&self) -> LayoutGeometry {
        self.geometry
    }

    pub fn terminal_size(&self) -> (u16, u16) {
        self.terminal_size
    }

    pub fn writing(&self) -> &WritingPane {
        &self.writing
    }

    pub fn conversation(&self) -> &ConversationPane {
        &self.conversation
    }

    pub fn status(&self) -> &StatusBarState {
        &self.status
    }

    pub fn mode(&self) -> EditorMode {
        self.writing.mode()
    }

    /// Current writing buffer content.
    pub fn writing_text(&self) -> String {
        self.writing.text()
    }

    /// Process one event.
    pub fn update(&mut self, event: Event) -> Vec<Command> {
        if self.quitting {
            return Vec::new();
        }

        let commands = match event {
            Event::Key(key) => self.handle_key(key),
            Event::Resize(width, height) => {
                self.resize(width, height);
                Vec::new()
            }
            Event::Tick => self.tick(),
            Event::Blink(generation) => self.writing.on_blink(generation).into_iter().collect(),
            Event::Agent(agent_event) => {
                if let AgentEvent::Failed(message) = &agent_event {
                    warn!(error = %message, "reflection failed");
                    self.status.notify(message.clone());
                }
                self.conversation.push_agent_event(agent_event);
                Vec::new()
            }
            Event::SaveFailed(message) => {
                self.status.notify(format!("Autosave failed: {message}"));
                self.saved_revision = None;
                Vec::new()
            }
            Event::Notice(message) => {
                self.status.notify(message);
                Vec::new()
            }
        };

        self.status.set_word_count(self.writing.word_count());
        commands
    }

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Command> {
        if is_quit_key(key) {
            info!("quit requested");
            self.quitting = true;
            return vec![Command::Save(self.writing.text()), Command::Quit];
        }

        if key.code == KeyCode::Tab {
            return self.toggle_focus().into_iter().collect();
        }

        let command = match self.focused_pane {
            FocusedPane::Writing => self.writing.handle_key(key),
            FocusedPane::Conversation => self.conversation.handle_key(key),
        };
        if command == Some(Command::RequestReflection) {
            self.conversation.begin_reflection();
        }
        command.into_iter().collect()
    }

    fn toggle_focus(&mut self) -> Option<Command> {
        match self.focused_pane {
            FocusedPane::Writing => self.writing.blur(),
            FocusedPane::Conversation => self.conversation.blur(),
        }
        self.focused_pane = self.focused_pane.toggle();
        debug!(pane = self.focused_pane.label(), "focus changed");
        self.focus_pane(self.focused_pane)
    }

    fn focus_pane(&mut self, pane: FocusedPane) -> Option<Command> {
        match pane {
            FocusedPane::Writing => self.writing.focus(),
            FocusedPane::Conversation => self.conversation.focus(),
        }
    }

    fn resize(&mut self, width: u16, height: u16) {
        self.terminal_size = (width, height);
        self.geometry = compute_layout(width, height, STATUS_BAR_HEIGHT);

        let writing = self.geometry.writing.interior();
        let conversation = self.geometry.conversation.interior();
        self.writing.set_size(writing.width, writing.height);
        self.conversation
            .set_size(conversation.width, conversation.height);
        self.status.set_size(width);
    }

    fn tick(&mut self) -> Vec<Command> {
        self.status.tick();

        self.ticks_since_save += 1;
        if self.ticks_since_save < self.autosave_ticks {
            return Vec::new();
        }
        self.ticks_since_save = 0;

        let revision = self.writing.buffer().revision();
        if self.saved_revision == Some(revision) {
            return Vec::new();
        }
        self.saved_revision = Some(revision);
        vec![Command::Save(self.writing.text())]
    }

    /// Draw the whole UI into the frame.
    pub fn render(&self, frame: &mut Frame<'_>) {
        let area = frame.area();
        let buf = frame.buffer_mut();

        if self.quitting {
            self.render_message(QUITTING_MESSAGE, area, buf);
            return;
        }
        if self.terminal_size.0 == 0 || self.terminal_size.1 == 0 {
            self.render_message(INITIALIZING_MESSAGE, area, buf);
            return;
        }

        buf.set_style(area, Style::default().bg(self.theme.base));

        let main_height = self.geometry.main_height();
        let writing_width = self.geometry.writing.width;

        // Panes may overflow a very narrow terminal; clip to the screen
        let writing_area = Rect::new(area.x, area.y, writing_width, main_height).intersection(area);
        let conversation_area = Rect::new(
            area.x.saturating_add(writing_width),
            area.y,
            self.geometry.conversation.width,
            main_height,
        )
        .intersection(area);
        let status_area = Rect::new(
            area.x,
            area.y.saturating_add(main_height),
            area.width,
            self.geometry.status_bar_height,
        )
        .intersection(area);

        self.render_pane(
            &self.writing,
            writing_area,
            buf,
            self.focused_pane == FocusedPane::Writing,
        );
        self.render_pane(
            &self.conversation,
            conversation_area,
            buf,
            self.focused_pane == FocusedPane::Conversation,
        );

        if !status_area.is_empty() {
            StatusBar::new(&self.status, self.focused_pane, &self.theme).render(status_area, buf);
        }
    }

    fn render_pane(&self, pane: &dyn Pane, area: Rect, buf: &mut Buffer, focused: bool) {
        if area.is_empty() {
            return;
        }
        let pane_frame = PaneFrame::new(&self.theme, &self.borders)
            .title(pane.title())
            .focused(focused);
        let inner = pane_frame.inner(area);
        pane_frame.render(area, buf);
        pane.render(inner, buf, &self.theme);
    }

    fn render_message(&self, message: &str, area: Rect, buf: &mut Buffer) {
        Paragraph::new(message)
            .style(Style::default().fg(self.theme.text))
            .render(area, buf);
    }
}

fn is_quit_key(key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        KeyCode::Char('q') => !key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT),
        _ => false,
    }
}
