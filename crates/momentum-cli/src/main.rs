//! momentum CLI: Terminal journaling for morning pages

use clap::{Parser, Subcommand};
use momentum_engine::{
    data_dir, default_config_path, logging, Config, Entry, JournalStore, LoggingGuard,
};
use momentum_tui::AppContext;
use std::path::PathBuf;
use tracing::{error, info};

/// Momentum Journal - a distraction-free journal for morning pages
#[derive(Parser)]
#[command(name = "momentum")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Config file (default is ~/.config/momentum_journal/config.json)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a new journal entry and open the writing session
    New,

    /// List journal entries
    List,
}

fn main() {
    let cli = Cli::parse();

    let _logging = init_logging(cli.debug);
    let config_path = cli.config.unwrap_or_else(default_config_path);
    let config = match Config::load_or_create(&config_path) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "failed to load configuration");
            eprintln!("Error loading config: {e}");
            std::process::exit(1);
        }
    };

    let store = match JournalStore::new(
        config.journal.storage_dir.clone(),
        config.journal.word_count_goal,
    ) {
        Ok(store) => store,
        Err(e) => {
            error!(error = %e, "failed to open journal");
            eprintln!("Error opening journal: {e}");
            std::process::exit(1);
        }
    };

    match cli.command {
        Commands::New => cmd_new(AppContext::new(config, store)),
        Commands::List => cmd_list(&store),
    }
}

fn init_logging(debug: bool) -> LoggingGuard {
    let log_dir = data_dir().join("logs");
    match logging::init(&log_dir, debug) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            std::process::exit(1);
        }
    }
}

fn cmd_new(ctx: AppContext) {
    let entry = match ctx.store.create_entry() {
        Ok(entry) => entry,
        Err(e) => {
            error!(error = %e, "failed to create journal entry");
            eprintln!("Error creating entry: {e}");
            std::process::exit(1);
        }
    };

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create tokio runtime: {e}");
            std::process::exit(1);
        }
    };

    info!("starting Momentum Journal TUI");
    match rt.block_on(momentum_tui::run_tui(&ctx, entry)) {
        Ok(entry) => {
            info!("Momentum Journal TUI finished");
            println!(
                "Saved {} ({}/{} words)",
                entry.file_name,
                entry.word_count,
                ctx.store.word_count_goal()
            );
        }
        Err(e) => {
            error!(error = %e, "TUI failed");
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

fn cmd_list(store: &JournalStore) {
    let entries = match store.list_entries() {
        Ok(entries) => entries,
        Err(e) => {
            eprintln!("Failed to list journal entries: {e}");
            std::process::exit(1);
        }
    };

    if entries.is_empty() {
        println!("No journal entries found.");
        return;
    }
    print!("{}", format_entry_table(&entries));
}

/// Render entries as aligned columns separated by two spaces.
fn format_entry_table(entries: &[Entry]) -> String {
    let mut rows = vec![
        ["DATE", "TIME", "WORDS", "COMPLETE", "FILE"].map(String::from),
        ["----", "----", "-----", "--------", "----"].map(String::from),
    ];
    for entry in entries {
        rows.push([
            entry.created_at.format("%Y-%m-%d").to_string(),
            entry.created_at.format("%H:%M").to_string(),
            entry.word_count.to_string(),
            entry.is_completed.to_string(),
            entry.file_name.clone(),
        ]);
    }

    let mut widths = [0usize; 5];
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    for row in &rows {
        let mut line = String::new();
        for (i, cell) in row.iter().enumerate() {
            if i + 1 == row.len() {
                line.push_str(cell);
            } else {
                line.push_str(&format!("{cell:<width$}  ", width = widths[i]));
            }
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};

    fn entry(words: usize, completed: bool) -> Entry {
        let created = Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 0).unwrap();
        Entry {
            file_path: PathBuf::from("/tmp/2024-03-09T07:05-morning-pages.md"),
            file_name: "2024-03-09T07:05-morning-pages.md".to_string(),
            created_at: created,
            modified_at: created,
            word_count: words,
            content: String::new(),
            is_completed: completed,
        }
    }

    #[test]
    fn test_cli_parses_global_flags() {
        let cli = Cli::parse_from(["momentum", "list", "--debug", "--config", "/tmp/c.json"]);
        assert!(cli.debug);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/c.json")));
        assert!(matches!(cli.command, Commands::List));
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["momentum"]).is_err());
        assert!(Cli::try_parse_from(["momentum", "new"]).is_ok());
    }

    #[test]
    fn test_entry_table_columns() {
        let table = format_entry_table(&[entry(812, true), entry(40, false)]);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "DATE        TIME   WORDS  COMPLETE  FILE");
        assert_eq!(lines[1], "----        ----   -----  --------  ----");
        assert_eq!(
            lines[2],
            "2024-03-09  07:05  812    true      2024-03-09T07:05-morning-pages.md"
        );
        assert!(lines[3].contains("40     false"));
    }
}
