use std::fs;
use std::path::Path;

use chrono::{Duration as ChronoDuration, NaiveDate, Utc};

use super::AnomalyJournal;
use super::paths::{EVENTS_PREFIX, ensure_journal_dirs, is_journal_file};

impl AnomalyJournal {
    pub fn run_maintenance(&self) -> usize {
        let paths = self.paths();
        if let Err(error) = ensure_journal_dirs(&paths) {
            log::warn!(
                "anomaly journal maintenance: failed to ensure dirs: {}",
                error
            );
            return 0;
        }

        prune_files_older_than(&paths.events_dir, self.settings.retention_days)
    }
}

fn prune_files_older_than(dir: &Path, retention_days: u16) -> usize {
    let Ok(entries) = fs::read_dir(dir) else {
        return 0;
    };

    let today = Utc::now().date_naive();
    let keep_for = ChronoDuration::days(retention_days as i64);
    let mut removed = 0usize;

    for entry in entries.flatten() {
        let path = entry.path();
        let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
            continue;
        };

        if !is_journal_file(file_name) {
            continue;
        }

        let date_part = file_name
            .strip_prefix(EVENTS_PREFIX)
            .and_then(|tail| tail.get(0..10));
        let Some(date_part) = date_part else {
            continue;
        };

        let Ok(file_date) = NaiveDate::parse_from_str(date_part, "%Y-%m-%d") else {
            continue;
        };

        if today.signed_duration_since(file_date) > keep_for {
            if let Err(error) = fs::remove_file(&path) {
                log::warn!(
                    "anomaly journal: failed to remove old file {}: {}",
                    path.display(),
                    error
                );
            } else {
                log::info!(
                    "anomaly journal maintenance: removed old file {}",
                    path.display()
                );
                removed += 1;
            }
        }
    }

    removed
}
