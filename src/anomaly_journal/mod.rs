//! Local JSONL journal of anomalies whose durable write failed.
//!
//! The durable store is written best-effort and never retried; this journal
//! is where the gap between local and durable history becomes visible.

mod maintenance;
mod model;
mod paths;
mod read;
mod write;

use crate::config::Journal;

#[derive(Debug, Clone)]
pub struct AnomalyJournal {
    settings: Journal,
}

impl AnomalyJournal {
    pub fn from_config(settings: &Journal) -> Option<Self> {
        if !settings.enabled {
            return None;
        }

        Some(Self {
            settings: settings.clone(),
        })
    }
}
