use async_trait::async_trait;

use crate::error::PipelineError;

use super::model::AnomalyEvent;

/// Write and read contract of the durable anomaly store.
#[async_trait]
pub trait AnomalyBackend: Send + Sync {
    async fn persist(&self, event: &AnomalyEvent) -> Result<(), PipelineError>;

    /// Every stored row, undecoded. Rows are typed one at a time by the
    /// caller so a single bad row cannot sink the whole history.
    async fn fetch_all(&self) -> Result<Vec<serde_json::Value>, PipelineError>;
}

#[cfg(test)]
pub(crate) use mock::MockAnomalyBackend;
