use std::sync::Arc;

use crate::anomaly_store::{AnomalyBackend, AnomalyEvent, RawAnomalyRecord};
use crate::error::PipelineError;

/// Rebuilds anomaly history from the durable store.
pub struct ReconciliationLoader {
    backend: Arc<dyn AnomalyBackend>,
}

impl ReconciliationLoader {
    pub fn new(backend: Arc<dyn AnomalyBackend>) -> Self {
        Self { backend }
    }

    /// Fetches every persisted record and maps it onto the in-memory shape,
    /// preserving store order. Rows that cannot be typed or carry no time
    /// field are skipped.
    pub async fn load(&self) -> Result<Vec<AnomalyEvent>, PipelineError> {
        let rows = self.backend.fetch_all().await?;
        let mut events = Vec::with_capacity(rows.len());
        let mut malformed = 0usize;
        let mut missing_time = 0usize;

        for row in rows {
            let record = match serde_json::from_value::<RawAnomalyRecord>(row) {
                Ok(record) => record,
                Err(error) => {
                    log::debug!("reconciliation_row_undecodable error={}", error);
                    malformed += 1;
                    continue;
                }
            };

            match normalize_record(record) {
                Some(event) => events.push(event),
                None => missing_time += 1,
            }
        }

        if malformed + missing_time > 0 {
            log::warn!(
                "reconciliation_records_skipped malformed={} missing_time_field={} kept={}",
                malformed,
                missing_time,
                events.len()
            );
        }

        Ok(events)
    }
}

/// The store's `_time` column wins over any echoed `timestamp` field.
fn normalize_record(record: RawAnomalyRecord) -> Option<AnomalyEvent> {
    let timestamp = record.time.or(record.timestamp)?;
    Some(AnomalyEvent {
        timestamp,
        cpu: record.cpu,
        memory: record.memory,
        disk: record.disk,
    })
}
