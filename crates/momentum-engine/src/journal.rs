//! Journal entry persistence.
//!
//! Entries are plain markdown files in the configured storage directory.
//! Metadata (word count, completion) is derived from the content on every
//! save and read rather than stored alongside it.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Suffix shared by every entry file name.
const ENTRY_SUFFIX: &str = "-morning-pages.md";

/// Count words using whitespace tokenization.
///
/// This is the single counting rule for both the live status bar and
/// the saved entry metadata.
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Error type for journal operations.
#[derive(Debug, Error)]
pub enum JournalError {
    #[error("failed to create journal directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write journal entry {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read journal entry {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read journal directory {}: {source}", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A single journal entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    pub file_path: PathBuf,
    pub file_name: String,
    pub created_at: DateTime<Local>,
    pub modified_at: DateTime<Local>,
    pub word_count: usize,
    pub content: String,
    /// True once the entry meets the word count goal.
    pub is_completed: bool,
}

/// Manages journal entries on disk.
#[derive(Debug, Clone)]
pub struct JournalStore {
    storage_dir: PathBuf,
    word_count_goal: usize,
}

impl JournalStore {
    /// Create a new `JournalStore`.
    /// Creates the storage directory if it doesn't exist.
    pub fn new(storage_dir: impl Into<PathBuf>, word_count_goal: usize) -> Result<Self, JournalError> {
        let storage_dir = storage_dir.into();
        fs::create_dir_all(&storage_dir).map_err(|source| JournalError::CreateDir {
            path: storage_dir.clone(),
            source,
        })?;
        Ok(Self {
            storage_dir,
            word_count_goal,
        })
    }

    /// Directory holding the entries.
    pub fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }

    /// Word count goal used to mark entries complete.
    pub fn word_count_goal(&self) -> usize {
        self.word_count_goal
    }

    /// Create a new empty entry named after the current minute and write it.
    pub fn create_entry(&self) -> Result<Entry, JournalError> {
        let now = Local::now();
        let file_name = format!("{}{ENTRY_SUFFIX}", now.format("%Y-%m-%dT%H:%M"));
        let file_path = self.storage_dir.join(&file_name);

        let mut entry = Entry {
            file_path,
            file_name,
            created_at: now,
            modified_at: now,
            word_count: 0,
            content: String::new(),
            is_completed: false,
        };

        self.save_entry(&mut entry)?;

        info!(file = %entry.file_name, created_at = %now, "created new journal entry");
        Ok(entry)
    }

    /// Save an entry, refreshing its derived metadata.
    pub fn save_entry(&self, entry: &mut Entry) -> Result<(), JournalError> {
        entry.modified_at = Local::now();
        entry.word_count = count_words(&entry.content);
        entry.is_completed = entry.word_count >= self.word_count_goal;

        if let Some(parent) = entry.file_path.parent() {
            fs::create_dir_all(parent).map_err(|source| JournalError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        atomic_write(&entry.file_path, entry.content.as_bytes()).map_err(|source| {
            JournalError::Write {
                path: entry.file_path.clone(),
                source,
            }
        })?;

        debug!(
            file = %entry.file_name,
            word_count = entry.word_count,
            modified_at = %entry.modified_at,
            "saved journal entry"
        );
        Ok(())
    }

    /// Read an entry from disk.
    ///
    /// Creation time is approximated by the file's modification time.
    pub fn read_entry(&self, path: &Path) -> Result<Entry, JournalError> {
        let read_err = |source| JournalError::Read {
            path: path.to_path_buf(),
            source,
        };

        let metadata = fs::metadata(path).map_err(read_err)?;
        let content = fs::read_to_string(path).map_err(read_err)?;
        let modified: DateTime<Local> = metadata.modified().map_err(read_err)?.into();

        let word_count = count_words(&content);
        Ok(Entry {
            file_path: path.to_path_buf(),
            file_name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            created_at: modified,
            modified_at: modified,
            word_count,
            content,
            is_completed: word_count >= self.word_count_goal,
        })
    }

    /// List all entries, oldest first.
    ///
    /// Unreadable files are skipped with a warning. A missing directory
    /// yields an empty list.
    pub fn list_entries(&self) -> Result<Vec<Entry>, JournalError> {
        let dir = match fs::read_dir(&self.storage_dir) {
            Ok(dir) => dir,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(JournalError::ReadDir {
                    path: self.storage_dir.clone(),
                    source,
                })
            }
        };

        let mut entries = Vec::new();
        for dir_entry in dir.flatten() {
            let path = dir_entry.path();
            if path.is_dir() || !path.extension().is_some_and(|ext| ext == "md") {
                continue;
            }

            match self.read_entry(&path) {
                Ok(entry) => entries.push(entry),
                Err(e) => warn!(file = %path.display(), error = %e, "failed to read journal entry"),
            }
        }

        entries.sort_by(|a, b| a.file_name.cmp(&b.file_name));
        Ok(entries)
    }
}

/// Atomic write: write to a temp file, sync, then rename into place.
fn atomic_write(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let pid = std::process::id();

    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("entry");
    let tmp_path = path.with_file_name(format!("{file_name}.{timestamp}.{pid}.tmp"));

    let result = (|| {
        let mut file = File::create(&tmp_path)?;
        file.write_all(content)?;
        file.sync_all()?;
        fs::rename(&tmp_path, path)?;
        Ok(())
    })();

    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_store(goal: usize) -> (TempDir, JournalStore) {
        let temp = TempDir::new().unwrap();
        let store = JournalStore::new(temp.path().join("journals"), goal).unwrap();
        (temp, store)
    }

    #[test]
    fn test_count_words() {
        assert_eq!(count_words("hello world"), 2);
        assert_eq!(count_words(""), 0);
        assert_eq!(count_words("  multiple   spaces  "), 2);
        assert_eq!(count_words("line one\nline\ttwo"), 4);
    }

    #[test]
    fn test_new_creates_directory() {
        let (_temp, store) = setup_store(750);
        assert!(store.storage_dir().is_dir());
    }

    #[test]
    fn test_create_entry_writes_empty_file() {
        let (_temp, store) = setup_store(750);
        let entry = store.create_entry().unwrap();

        assert!(entry.file_path.exists());
        assert!(entry.file_name.ends_with(ENTRY_SUFFIX));
        assert_eq!(entry.word_count, 0);
        assert!(!entry.is_completed);
        assert_eq!(fs::read_to_string(&entry.file_path).unwrap(), "");
    }

    #[test]
    fn test_save_entry_updates_metadata() {
        let (_temp, store) = setup_store(3);
        let mut entry = store.create_entry().unwrap();

        entry.content = "one two".into();
        store.save_entry(&mut entry).unwrap();
        assert_eq!(entry.word_count, 2);
        assert!(!entry.is_completed);

        entry.content = "one two three".into();
        store.save_entry(&mut entry).unwrap();
        assert_eq!(entry.word_count, 3);
        assert!(entry.is_completed);
        assert_eq!(fs::read_to_string(&entry.file_path).unwrap(), "one two three");
    }

    #[test]
    fn test_save_leaves_no_temp_files() {
        let (_temp, store) = setup_store(750);
        let mut entry = store.create_entry().unwrap();
        entry.content = "words".into();
        store.save_entry(&mut entry).unwrap();

        let leftovers: Vec<_> = fs::read_dir(store.storage_dir())
            .unwrap()
            .flatten()
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_read_entry() {
        let (_temp, store) = setup_store(2);
        let path = store.storage_dir().join("2024-01-01T07:00-morning-pages.md");
        fs::write(&path, "morning pages today").unwrap();

        let entry = store.read_entry(&path).unwrap();
        assert_eq!(entry.file_name, "2024-01-01T07:00-morning-pages.md");
        assert_eq!(entry.word_count, 3);
        assert!(entry.is_completed);
    }

    #[test]
    fn test_list_entries_filters_and_sorts() {
        let (_temp, store) = setup_store(750);
        let dir = store.storage_dir();
        fs::write(dir.join("2024-01-02T07:00-morning-pages.md"), "second").unwrap();
        fs::write(dir.join("2024-01-01T07:00-morning-pages.md"), "first entry").unwrap();
        fs::write(dir.join("notes.txt"), "ignored").unwrap();
        fs::create_dir(dir.join("archive.md")).unwrap();

        let entries = store.list_entries().unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.file_name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "2024-01-01T07:00-morning-pages.md",
                "2024-01-02T07:00-morning-pages.md"
            ]
        );
        assert_eq!(entries[0].word_count, 2);
    }

    #[test]
    fn test_list_entries_missing_directory() {
        let (_temp, store) = setup_store(750);
        fs::remove_dir_all(store.storage_dir()).unwrap();
        assert!(store.list_entries().unwrap().is_empty());
    }
}
