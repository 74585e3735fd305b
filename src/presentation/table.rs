use chrono::Local;
use serde::Serialize;

use crate::anomaly_store::AnomalyEvent;
use crate::config::Severity;
use crate::metrics::parse_timestamp;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnomalyRow {
    pub timestamp: String,
    pub display_time: String,
    pub cpu: String,
    pub memory: String,
    pub disk: String,
    pub severe: bool,
}

/// Display-only: strictly greater than any per-field threshold.
pub fn is_severe(event: &AnomalyEvent, thresholds: &Severity) -> bool {
    event.cpu > thresholds.cpu || event.memory > thresholds.memory || event.disk > thresholds.disk
}

pub fn anomaly_rows(events: &[AnomalyEvent], thresholds: &Severity) -> Vec<AnomalyRow> {
    events
        .iter()
        .map(|event| AnomalyRow {
            timestamp: event.timestamp.clone(),
            display_time: display_time(&event.timestamp),
            cpu: format!("{:.2}", event.cpu),
            memory: format!("{:.2}", event.memory),
            disk: format!("{:.2}", event.disk),
            severe: is_severe(event, thresholds),
        })
        .collect()
}

fn display_time(raw: &str) -> String {
    parse_timestamp(raw)
        .map(|instant| {
            instant
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
        })
        .unwrap_or_else(|| raw.to_string())
}
