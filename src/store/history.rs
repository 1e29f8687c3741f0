//! Append-only version history: one `timestamp\tversion\tcomment` line per change.

use crate::domain::Version;
use crate::error::{PepbumpError, Result};
use chrono::{DateTime, Local};
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// One line of the history file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub timestamp: DateTime<Local>,
    pub version: String,
    pub comment: String,
}

impl HistoryEntry {
    /// Entry stamped with the current local time.
    pub fn now(version: &Version, comment: &str) -> Self {
        HistoryEntry::at(Local::now(), version, comment)
    }

    pub fn at(timestamp: DateTime<Local>, version: &Version, comment: &str) -> Self {
        HistoryEntry {
            timestamp,
            version: version.to_string(),
            comment: single_line(comment),
        }
    }
}

impl fmt::Display for HistoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}",
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.version,
            self.comment
        )
    }
}

// Tabs and line breaks would split the entry across columns or lines.
fn single_line(comment: &str) -> String {
    comment
        .chars()
        .map(|c| if c == '\t' || c == '\n' || c == '\r' { ' ' } else { c })
        .collect::<String>()
        .trim()
        .to_string()
}

/// History file opened for appending.
///
/// Opening it before the store is saved means an unwritable history path
/// fails the command while nothing has been persisted yet.
#[derive(Debug)]
pub struct HistoryLog {
    path: PathBuf,
    file: File,
}

impl HistoryLog {
    /// Open `path` for appending, creating the file and its parent directories.
    pub fn open(path: &Path) -> Result<Self> {
        create_parent(path)?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| PepbumpError::history(path, e))?;
        Ok(HistoryLog {
            path: path.to_path_buf(),
            file,
        })
    }

    pub fn append(&mut self, entry: &HistoryEntry) -> Result<()> {
        writeln!(self.file, "{}", entry).map_err(|e| PepbumpError::history(&self.path, e))
    }
}

fn create_parent(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|e| PepbumpError::history(path, e))?;
    }
    Ok(())
}

/// Create an empty history file unless one exists. Returns true when created.
pub fn ensure_exists(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    create_parent(path)?;
    File::create(path).map_err(|e| PepbumpError::history(path, e))?;
    Ok(true)
}
