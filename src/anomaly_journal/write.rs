use std::io::Write;
use std::path::Path;

use chrono::Utc;
use file_rotate::{ContentLimit, FileRotate, compression::Compression, suffix::AppendCount};

use crate::anomaly_store::AnomalyEvent;
use crate::error::PipelineError;

use super::AnomalyJournal;
use super::model::FailedWriteEntry;
use super::paths::{daily_file_name, ensure_journal_dirs};

impl AnomalyJournal {
    pub fn record_failed_write(&self, event: &AnomalyEvent, error: &PipelineError) {
        let now = Utc::now();
        let entry = FailedWriteEntry {
            recorded_at: now.to_rfc3339(),
            timestamp: event.timestamp.clone(),
            cpu: event.cpu,
            memory: event.memory,
            disk: event.disk,
            error_kind: error.kind().to_string(),
            error: error.to_string(),
        };

        let paths = self.paths();
        if let Err(error) = ensure_journal_dirs(&paths) {
            log::warn!("anomaly journal: failed to create directory: {}", error);
            return;
        }

        let events_path = paths.events_dir.join(daily_file_name(now));
        if let Err(error) = append_entry_with_rotation(
            &events_path,
            &entry,
            self.settings.max_file_size_bytes,
            self.settings.retention_days,
        ) {
            log::warn!("anomaly journal: failed to write entry line: {}", error);
        }
    }
}

fn append_entry_with_rotation(
    path: &Path,
    entry: &FailedWriteEntry,
    max_file_size_bytes: u64,
    retention_days: u16,
) -> Result<(), std::io::Error> {
    let max_bytes = usize::try_from(max_file_size_bytes).unwrap_or(usize::MAX);
    let mut writer = FileRotate::new(
        path,
        AppendCount::new(retention_days as usize),
        ContentLimit::BytesSurpassed(max_bytes),
        Compression::None,
        None,
    );

    serde_json::to_writer(&mut writer, entry).map_err(std::io::Error::other)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}
