//! Command execution for one writing session.
//!
//! The shell decides *what* should happen; [`Session`] does the I/O:
//! saving the entry, scheduling blinks and talking to the agent. Results
//! come back to the shell as events on the loop's channel.

use std::sync::Arc;
use std::time::Duration;

use momentum_engine::{
    AgentBackend, AgentEvent, Config, Entry, JournalError, JournalStore, SessionId,
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::event::{Command, Event};

/// Delay between cursor blink phases.
pub const BLINK_INTERVAL: Duration = Duration::from_millis(530);

/// Shown when a reflection is requested without a backend.
pub const NO_AGENT_MESSAGE: &str = "No agent configured";

/// Everything a TUI session needs from the outside.
pub struct AppContext {
    pub config: Config,
    pub store: JournalStore,
    pub agent: Option<Arc<dyn AgentBackend>>,
}

impl AppContext {
    /// Context without an agent backend.
    pub fn new(config: Config, store: JournalStore) -> Self {
        Self {
            config,
            store,
            agent: None,
        }
    }

    #[must_use]
    pub fn with_agent(mut self, agent: Arc<dyn AgentBackend>) -> Self {
        self.agent = Some(agent);
        self
    }
}

/// Executes shell commands against the journal store and agent.
pub struct Session<'a> {
    ctx: &'a AppContext,
    entry: Entry,
    id: SessionId,
    events: mpsc::UnboundedSender<Event>,
    /// Error from the most recent save, cleared by the next success.
    save_error: Option<JournalError>,
}

impl<'a> Session<'a> {
    pub fn new(ctx: &'a AppContext, entry: Entry, events: mpsc::UnboundedSender<Event>) -> Self {
        let id = SessionId::new();
        info!(session = %id, entry = %entry.file_name, "session started");
        Self {
            ctx,
            entry,
            id,
            events,
            save_error: None,
        }
    }

    pub fn entry(&self) -> &Entry {
        &self.entry
    }

    /// End the session, returning the entry if its last save succeeded.
    pub fn finish(self) -> Result<Entry, JournalError> {
        match self.save_error {
            Some(e) => Err(e),
            None => Ok(self.entry),
        }
    }

    /// Run commands in order. Returns `true` once `Quit` is reached.
    pub fn execute_all(&mut self, commands: Vec<Command>, content: &str) -> bool {
        for command in commands {
            if self.execute(command, content) {
                return true;
            }
        }
        false
    }

    /// Run one command. `content` is the writing buffer at this point.
    pub fn execute(&mut self, command: Command, content: &str) -> bool {
        match command {
            Command::Quit => return true,
            Command::Save(text) => self.save(text),
            Command::ScheduleBlink(generation) => self.schedule_blink(generation),
            Command::RequestReflection => self.request_reflection(content.to_string()),
        }
        false
    }

    fn save(&mut self, content: String) {
        self.entry.content = content;
        match self.ctx.store.save_entry(&mut self.entry) {
            Ok(()) => {
                debug!(
                    words = self.entry.word_count,
                    completed = self.entry.is_completed,
                    "entry saved"
                );
                self.save_error = None;
            }
            Err(e) => {
                warn!(error = %e, "failed to save entry");
                let _ = self.events.send(Event::SaveFailed(e.to_string()));
                self.save_error = Some(e);
            }
        }
    }

    fn schedule_blink(&self, generation: u64) {
        let tx = self.events.clone();
        tokio::spawn(async move {
            tokio::time::sleep(BLINK_INTERVAL).await;
            let _ = tx.send(Event::Blink(generation));
        });
    }

    fn request_reflection(&self, content: String) {
        let Some(agent) = &self.ctx.agent else {
            let _ = self
                .events
                .send(Event::Agent(AgentEvent::Failed(NO_AGENT_MESSAGE.to_string())));
            return;
        };

        info!(session = %self.id, agent = agent.name(), "requesting reflection");
        let mut replies = agent.send_context(self.id, content);
        let tx = self.events.clone();
        tokio::spawn(async move {
            while let Some(reply) = replies.recv().await {
                let finished = matches!(reply, AgentEvent::Done | AgentEvent::Failed(_));
                if tx.send(Event::Agent(reply)).is_err() || finished {
                    return;
                }
            }
            let _ = tx.send(Event::Agent(AgentEvent::Failed(
                "Agent disconnected".to_string(),
            )));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use momentum_engine::count_words;
    use tempfile::TempDir;

    struct EchoAgent;

    impl AgentBackend for EchoAgent {
        fn name(&self) -> &str {
            "echo"
        }

        fn send_context(
            &self,
            _session: SessionId,
            content: String,
        ) -> mpsc::UnboundedReceiver<AgentEvent> {
            let (tx, rx) = mpsc::unbounded_channel();
            tx.send(AgentEvent::Token(format!("{} words", count_words(&content))))
                .unwrap();
            tx.send(AgentEvent::Done).unwrap();
            rx
        }
    }

    /// Sends one token then hangs up without `Done`.
    struct FlakyAgent;

    impl AgentBackend for FlakyAgent {
        fn name(&self) -> &str {
            "flaky"
        }

        fn send_context(
            &self,
            _session: SessionId,
            _content: String,
        ) -> mpsc::UnboundedReceiver<AgentEvent> {
            let (tx, rx) = mpsc::unbounded_channel();
            tx.send(AgentEvent::Token("partial".into())).unwrap();
            rx
        }
    }

    fn context(dir: &TempDir) -> AppContext {
        let store = JournalStore::new(dir.path().join("journals"), 3).unwrap();
        AppContext::new(Config::default(), store)
    }

    #[tokio::test]
    async fn test_save_writes_entry() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir);
        let entry = ctx.store.create_entry().unwrap();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut session = Session::new(&ctx, entry, tx);

        let quit = session.execute(Command::Save("one two three".into()), "");
        assert!(!quit);
        assert!(rx.try_recv().is_err());

        let entry = session.finish().unwrap();
        assert!(entry.is_completed);
        let on_disk = std::fs::read_to_string(&entry.file_path).unwrap();
        assert_eq!(on_disk, "one two three");
    }

    #[tokio::test]
    async fn test_save_failure_is_reported() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir);
        let mut entry = ctx.store.create_entry().unwrap();
        // A directory where the file should be makes the rename fail
        entry.file_path = dir.path().join("journals");
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut session = Session::new(&ctx, entry, tx);

        session.execute(Command::Save("text".into()), "");
        assert!(matches!(rx.try_recv(), Ok(Event::SaveFailed(_))));
        assert!(matches!(session.finish(), Err(JournalError::Write { .. })));
    }

    #[tokio::test]
    async fn test_successful_save_clears_earlier_failure() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir);
        let entry = ctx.store.create_entry().unwrap();
        let good_path = entry.file_path.clone();
        let mut broken = entry;
        broken.file_path = dir.path().join("journals");
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut session = Session::new(&ctx, broken, tx);

        session.execute(Command::Save("first".into()), "");
        session.entry.file_path = good_path;
        session.execute(Command::Save("second".into()), "");

        assert_eq!(session.finish().unwrap().content, "second");
    }

    #[tokio::test]
    async fn test_execute_all_stops_at_quit() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir);
        let entry = ctx.store.create_entry().unwrap();
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut session = Session::new(&ctx, entry, tx);

        let quit = session.execute_all(
            vec![
                Command::Save("final".into()),
                Command::Quit,
                Command::Save("ignored".into()),
            ],
            "",
        );
        assert!(quit);
        assert_eq!(session.entry().content, "final");
    }

    #[tokio::test]
    async fn test_blink_is_reinjected() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir);
        let entry = ctx.store.create_entry().unwrap();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut session = Session::new(&ctx, entry, tx);

        session.execute(Command::ScheduleBlink(7), "");
        let event = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .unwrap();
        assert_eq!(event, Some(Event::Blink(7)));
    }

    #[tokio::test]
    async fn test_reflection_without_agent() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir);
        let entry = ctx.store.create_entry().unwrap();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut session = Session::new(&ctx, entry, tx);

        session.execute(Command::RequestReflection, "some text");
        assert_eq!(
            rx.try_recv().unwrap(),
            Event::Agent(AgentEvent::Failed(NO_AGENT_MESSAGE.to_string()))
        );
    }

    #[tokio::test]
    async fn test_reflection_streams_agent_events() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir).with_agent(Arc::new(EchoAgent));
        let entry = ctx.store.create_entry().unwrap();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut session = Session::new(&ctx, entry, tx);

        session.execute(Command::RequestReflection, "four little words here");
        assert_eq!(
            rx.recv().await,
            Some(Event::Agent(AgentEvent::Token("4 words".into())))
        );
        assert_eq!(rx.recv().await, Some(Event::Agent(AgentEvent::Done)));
    }

    #[tokio::test]
    async fn test_dropped_agent_stream_fails() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir).with_agent(Arc::new(FlakyAgent));
        let entry = ctx.store.create_entry().unwrap();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut session = Session::new(&ctx, entry, tx);

        session.execute(Command::RequestReflection, "");
        assert!(matches!(
            rx.recv().await,
            Some(Event::Agent(AgentEvent::Token(_)))
        ));
        assert!(matches!(
            rx.recv().await,
            Some(Event::Agent(AgentEvent::Failed(_)))
        ));
    }
}
