//! Event handling for the momentum TUI.
//!
//! Terminal input and deferred follow-ups share one queue, so every state
//! change happens in arrival order on the event loop.

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};
use momentum_engine::AgentEvent;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// Events that can occur in the TUI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A key was pressed.
    Key(KeyEvent),
    /// Terminal was resized.
    Resize(u16, u16),
    /// A tick event for timers (autosave, notice expiry).
    Tick,
    /// Cursor blink for the given blink generation.
    Blink(u64),
    /// Part of an agent reply.
    Agent(AgentEvent),
    /// Autosave failed; the message is shown to the user.
    SaveFailed(String),
    /// Show a transient message in the status bar.
    Notice(String),
}

/// Follow-up work requested by an update step, executed by the event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Stop the event loop.
    Quit,
    /// Persist the given buffer content.
    Save(String),
    /// Re-inject `Event::Blink(generation)` after the blink interval.
    ScheduleBlink(u64),
    /// Send the entry to the agent for a reflection.
    RequestReflection,
}

/// Tracks when the poller owes the loop an `Event::Tick`.
///
/// Ticks are due on a fixed cadence whether or not input arrived in
/// between, so timers keep running while the user types.
#[derive(Debug, Clone, Copy)]
struct TickClock {
    rate: Duration,
    last_tick: Instant,
}

impl TickClock {
    fn new(rate: Duration, now: Instant) -> Self {
        Self {
            rate,
            last_tick: now,
        }
    }

    /// How long to wait for input before the next tick is due.
    fn poll_timeout(&self, now: Instant) -> Duration {
        self.rate
            .saturating_sub(now.saturating_duration_since(self.last_tick))
    }

    /// Whether a tick is due at `now`. Restarts the period when it is.
    fn tick_due(&mut self, now: Instant) -> bool {
        if now.saturating_duration_since(self.last_tick) >= self.rate {
            self.last_tick = now;
            true
        } else {
            false
        }
    }
}

/// Event handler that polls the terminal on a background thread.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
    tx: mpsc::UnboundedSender<Event>,
}

impl EventHandler {
    /// Create a new event handler with the specified tick rate.
    pub fn new(tick_rate_ms: u64) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let tx_clone = tx.clone();

        // Crossterm reads block, so polling gets its own thread
        std::thread::spawn(move || {
            let mut clock = TickClock::new(Duration::from_millis(tick_rate_ms), Instant::now());
            loop {
                let timeout = clock.poll_timeout(Instant::now());
                if event::poll(timeout).unwrap_or(false) {
                    if let Ok(evt) = event::read() {
                        let event = match evt {
                            CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => {
                                Some(Event::Key(key))
                            }
                            CrosstermEvent::Resize(w, h) => Some(Event::Resize(w, h)),
                            _ => None,
                        };
                        if let Some(e) = event {
                            if tx_clone.send(e).is_err() {
                                break;
                            }
                        }
                    }
                }
                if clock.tick_due(Instant::now()) && tx_clone.send(Event::Tick).is_err() {
                    break;
                }
            }
        });

        Self { rx, tx }
    }

    /// Create a handler without a terminal poller.
    ///
    /// Events only arrive through [`EventHandler::sender`].
    pub fn detached() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { rx, tx }
    }

    /// Sender for re-injecting deferred events.
    pub fn sender(&self) -> mpsc::UnboundedSender<Event> {
        self.tx.clone()
    }

    /// Get the next event, waiting until one is available.
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    #[test]
    fn test_ticks_keep_cadence_during_steady_typing() {
        let start = Instant::now();
        let mut clock = TickClock::new(Duration::from_millis(250), start);

        // A key every 200ms never lets a full poll timeout elapse
        let due: Vec<bool> = (1..=5)
            .map(|n| clock.tick_due(start + Duration::from_millis(200 * n)))
            .collect();
        assert_eq!(due, vec![false, true, false, true, false]);
    }

    #[test]
    fn test_poll_timeout_shrinks_toward_next_tick() {
        let start = Instant::now();
        let clock = TickClock::new(Duration::from_millis(250), start);

        assert_eq!(clock.poll_timeout(start), Duration::from_millis(250));
        assert_eq!(
            clock.poll_timeout(start + Duration::from_millis(100)),
            Duration::from_millis(150)
        );
        assert_eq!(
            clock.poll_timeout(start + Duration::from_millis(400)),
            Duration::ZERO
        );
    }

    #[tokio::test]
    async fn test_events_arrive_in_order() {
        let mut events = EventHandler::detached();
        let tx = events.sender();

        tx.send(Event::Resize(120, 40)).unwrap();
        tx.send(Event::Key(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE)))
            .unwrap();
        tx.send(Event::Blink(3)).unwrap();

        assert_eq!(events.next().await, Some(Event::Resize(120, 40)));
        assert!(matches!(events.next().await, Some(Event::Key(_))));
        assert_eq!(events.next().await, Some(Event::Blink(3)));
    }
}
