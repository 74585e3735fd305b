use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Datelike, Utc};

use super::AnomalyJournal;

pub(super) const EVENTS_PREFIX: &str = "events-";

#[derive(Debug, Clone)]
pub(super) struct JournalPaths {
    pub(super) events_dir: PathBuf,
}

impl AnomalyJournal {
    pub(super) fn paths(&self) -> JournalPaths {
        let root = PathBuf::from(&self.settings.dir);
        JournalPaths {
            events_dir: root.join("events"),
        }
    }
}

pub(super) fn ensure_journal_dirs(paths: &JournalPaths) -> Result<(), std::io::Error> {
    fs::create_dir_all(&paths.events_dir)
}

pub(super) fn daily_file_name(now: DateTime<Utc>) -> String {
    format!(
        "{}{:04}-{:02}-{:02}.jsonl",
        EVENTS_PREFIX,
        now.year(),
        now.month(),
        now.day()
    )
}

pub(super) fn is_journal_file(name: &str) -> bool {
    name.starts_with(EVENTS_PREFIX) && name.contains(".jsonl")
}
