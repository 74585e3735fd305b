use std::sync::Arc;

use crate::alerting::WebhookNotifier;
use crate::anomaly_store::{AnomalyEvent, AnomalyStore, AppendOutcome};
use crate::error::PipelineError;
use crate::metrics::MetricSample;

use super::client::InferenceClient;
use super::model::{InferenceVerdict, SampleFeatures};

pub struct InferenceDispatcher {
    client: Arc<dyn InferenceClient>,
    store: AnomalyStore,
    notifier: Option<WebhookNotifier>,
}

impl InferenceDispatcher {
    pub fn new(client: Arc<dyn InferenceClient>, store: AnomalyStore) -> Self {
        Self {
            client,
            store,
            notifier: None,
        }
    }

    pub fn with_notifier(mut self, notifier: Option<WebhookNotifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn store(&self) -> &AnomalyStore {
        &self.store
    }

    /// Classifies one sample. An anomaly verdict is stored (and alerted on)
    /// before this returns; the returned verdict carries nothing else.
    pub async fn evaluate(&self, sample: &MetricSample) -> Result<InferenceVerdict, PipelineError> {
        let verdict = self.client.predict(&SampleFeatures::from(sample)).await?;
        if !verdict.is_anomaly() {
            return Ok(verdict);
        }

        log::warn!(
            "anomaly_detected timestamp={} cpu={:.2} memory={:.2} disk={:.2}",
            sample.timestamp,
            sample.cpu,
            sample.memory,
            sample.disk
        );

        let event = AnomalyEvent::from_sample(sample);
        let outcome = self.store.append(event.clone()).await;

        let AppendOutcome::Stored { persisted } = outcome else {
            return Ok(verdict);
        };
        log::info!(
            "anomaly_stored timestamp={} persisted={}",
            event.timestamp,
            persisted
        );

        if let Some(notifier) = &self.notifier
            && let Err(error) = notifier.notify_anomaly(&event).await
        {
            log::warn!(
                "anomaly_alert_failed timestamp={} kind={} error={}",
                event.timestamp,
                error.kind(),
                error
            );
        }

        Ok(verdict)
    }
}
