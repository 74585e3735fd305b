use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::RwLock;

use crate::anomaly_journal::AnomalyJournal;
use crate::metrics::TimestampKey;

use super::backend::AnomalyBackend;
use super::model::AnomalyEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    /// Appended locally; `persisted` tells whether the durable write was acknowledged.
    Stored { persisted: bool },
    /// An event with the same timestamp identity is already held.
    Duplicate,
}

/// Owner of the in-memory anomaly collection.
///
/// Cloning yields another handle onto the same collection. Every mutation
/// goes through `append` or `load_all`.
#[derive(Clone)]
pub struct AnomalyStore {
    events: Arc<RwLock<Vec<AnomalyEvent>>>,
    /// Identities whose durable write is in flight.
    pending: Arc<Mutex<HashSet<TimestampKey>>>,
    backend: Arc<dyn AnomalyBackend>,
    journal: Option<AnomalyJournal>,
    dedup: bool,
}

/// Releases a reserved identity once its append finishes or is cancelled.
struct PendingReservation {
    pending: Arc<Mutex<HashSet<TimestampKey>>>,
    identity: TimestampKey,
}

impl Drop for PendingReservation {
    fn drop(&mut self) {
        lock_pending(&self.pending).remove(&self.identity);
    }
}

fn lock_pending(pending: &Mutex<HashSet<TimestampKey>>) -> MutexGuard<'_, HashSet<TimestampKey>> {
    pending
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl AnomalyStore {
    pub fn new(backend: Arc<dyn AnomalyBackend>, dedup: bool) -> Self {
        Self {
            events: Arc::new(RwLock::new(Vec::new())),
            pending: Arc::new(Mutex::new(HashSet::new())),
            backend,
            journal: None,
            dedup,
        }
    }

    pub fn with_journal(mut self, journal: Option<AnomalyJournal>) -> Self {
        self.journal = journal;
        self
    }

    /// Attempts the durable write, then appends locally whatever its result.
    ///
    /// A consumer may therefore observe the event before (or without) the
    /// durable store acknowledging it.
    ///
    /// With dedup on, the identity is reserved before the durable write so
    /// concurrent appends of one timestamp persist it at most once.
    pub async fn append(&self, event: AnomalyEvent) -> AppendOutcome {
        let _reservation = if self.dedup {
            match self.reserve(&event).await {
                Some(reservation) => Some(reservation),
                None => {
                    log::info!(
                        "anomaly_duplicate_skipped timestamp={} stage=before_persist",
                        event.timestamp
                    );
                    return AppendOutcome::Duplicate;
                }
            }
        } else {
            None
        };

        let persisted = match self.backend.persist(&event).await {
            Ok(()) => true,
            Err(error) => {
                log::warn!(
                    "anomaly_persist_failed timestamp={} kind={} error={}",
                    event.timestamp,
                    error.kind(),
                    error
                );
                if let Some(journal) = &self.journal {
                    journal.record_failed_write(&event, &error);
                }
                false
            }
        };

        let mut events = self.events.write().await;
        if self.dedup {
            // A reconciliation load may have delivered the same identity meanwhile.
            let identity = event.identity();
            if events.iter().any(|held| held.identity() == identity) {
                log::info!(
                    "anomaly_duplicate_skipped timestamp={} stage=after_persist",
                    event.timestamp
                );
                return AppendOutcome::Duplicate;
            }
        }
        events.push(event);

        AppendOutcome::Stored { persisted }
    }

    /// Replaces the collection with `loaded`, unless `loaded` is empty.
    ///
    /// An empty load never clears what is already held. With dedup on, local
    /// events missing from `loaded` are kept after the loaded ones.
    pub async fn load_all(&self, loaded: Vec<AnomalyEvent>) -> usize {
        let mut events = self.events.write().await;
        if loaded.is_empty() {
            log::info!(
                "anomaly_load_skipped reason=empty_input held={}",
                events.len()
            );
            return events.len();
        }

        let loaded_count = loaded.len();
        if !self.dedup {
            *events = loaded;
            log::info!("anomaly_load_applied loaded={} held={}", loaded_count, events.len());
            return events.len();
        }

        let local = std::mem::take(&mut *events);
        let mut seen = HashSet::with_capacity(loaded_count + local.len());
        let mut merged = Vec::with_capacity(loaded_count + local.len());
        for event in loaded.into_iter().chain(local) {
            if seen.insert(event.identity()) {
                merged.push(event);
            }
        }
        *events = merged;

        log::info!("anomaly_load_applied loaded={} held={}", loaded_count, events.len());
        events.len()
    }

    pub async fn snapshot(&self) -> Vec<AnomalyEvent> {
        self.events.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.events.read().await.len()
    }

    #[cfg(test)]
    pub async fn is_empty(&self) -> bool {
        self.events.read().await.is_empty()
    }

    /// Claims the event's identity unless it is already held or in flight.
    async fn reserve(&self, event: &AnomalyEvent) -> Option<PendingReservation> {
        let identity = event.identity();
        let events = self.events.read().await;
        if events.iter().any(|held| held.identity() == identity) {
            return None;
        }

        let mut pending = lock_pending(&self.pending);
        if !pending.insert(identity.clone()) {
            return None;
        }
        drop(pending);
        drop(events);

        Some(PendingReservation {
            pending: self.pending.clone(),
            identity,
        })
    }
}
