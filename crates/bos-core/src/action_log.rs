use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use parking_lot::Mutex;
use tracing::{info, warn};

/// Number of entries kept; older ones fall off the end.
pub const MAX_ENTRIES: usize = 5;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Most-recent-first history of operations shown next to the clean controls.
///
/// The file-backed variant does an unlocked read-modify-write of a JSON list,
/// so concurrent writers can drop each other's entries. Reads never fail: a
/// missing or unreadable log is empty.
#[derive(Debug)]
pub struct ActionLog {
    inner: ActionLogKind,
}

#[derive(Debug)]
enum ActionLogKind {
    File(PathBuf),
    Memory(Mutex<Vec<String>>),
}

impl ActionLog {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        ActionLog {
            inner: ActionLogKind::File(path.into()),
        }
    }

    pub fn in_memory() -> Self {
        ActionLog {
            inner: ActionLogKind::Memory(Mutex::new(Vec::new())),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match &self.inner {
            ActionLogKind::File(path) => Some(path),
            ActionLogKind::Memory(_) => None,
        }
    }

    pub fn entries(&self) -> Vec<String> {
        match &self.inner {
            ActionLogKind::File(path) => read_entries(path),
            ActionLogKind::Memory(entries) => entries.lock().clone(),
        }
    }

    /// Prepend `message` stamped with the current local time.
    pub fn record(&self, message: &str) {
        self.record_at(Local::now().naive_local(), message);
    }

    pub fn record_at(&self, at: NaiveDateTime, message: &str) {
        info!(target: "bos::action_log", "{message}");
        let entry = format!("{} - {message}", at.format(TIMESTAMP_FORMAT));
        match &self.inner {
            ActionLogKind::File(path) => {
                let mut entries = read_entries(path);
                push_front_capped(&mut entries, entry);
                write_entries(path, &entries);
            }
            ActionLogKind::Memory(entries) => push_front_capped(&mut entries.lock(), entry),
        }
    }
}

fn push_front_capped(entries: &mut Vec<String>, entry: String) {
    entries.insert(0, entry);
    entries.truncate(MAX_ENTRIES);
}

fn read_entries(path: &Path) -> Vec<String> {
    let Ok(content) = fs::read_to_string(path) else {
        return Vec::new();
    };
    serde_json::from_str(&content).unwrap_or_else(|err| {
        warn!(path = %path.display(), error = %err, "action log unreadable, starting fresh");
        Vec::new()
    })
}

fn write_entries(path: &Path, entries: &[String]) {
    let result = serde_json::to_string(entries)
        .map_err(std::io::Error::from)
        .and_then(|json| fs::write(path, json));
    if let Err(err) = result {
        warn!(path = %path.display(), error = %err, "failed to persist action log");
    }
}
