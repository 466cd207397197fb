//! momentum-engine: Headless engine for the Momentum Journal
//!
//! This crate provides everything the writing session needs besides the
//! terminal UI itself:
//! - Configuration loading and defaults
//! - Journal entry persistence and the shared word counting rule
//! - The agent backend interface
//! - Tracing setup

pub mod agent;
pub mod config;
pub mod journal;
pub mod logging;

// Re-export commonly used types
pub use agent::{AgentBackend, AgentEvent, SessionId};
pub use config::{data_dir, default_config_path, Config, ConfigError, JournalConfig, LlmConfig, UiConfig};
pub use journal::{count_words, Entry, JournalError, JournalStore};
pub use logging::{LoggingError, LoggingGuard};

/// Returns the engine version.
pub fn engine_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
