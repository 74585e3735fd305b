use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::anomaly_store::AnomalyStore;
use crate::inference::{InferenceDispatcher, Prediction};
use crate::metrics::{MetricSeries, MetricsSource};
use crate::presentation::DashboardPublisher;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    SkippedOverlap,
    FetchFailed,
    EmptyData,
    InferenceFailed,
    Evaluated(Prediction),
}

impl TickOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SkippedOverlap => "skipped_overlap",
            Self::FetchFailed => "fetch_failed",
            Self::EmptyData => "empty_data",
            Self::InferenceFailed => "inference_failed",
            Self::Evaluated(prediction) => prediction.as_str(),
        }
    }
}

/// Clears the in-flight flag when the tick finishes or its task is aborted.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// One poll cycle: fetch, show, classify the latest sample, publish.
pub struct TickPipeline {
    source: Arc<dyn MetricsSource>,
    dispatcher: InferenceDispatcher,
    publisher: DashboardPublisher,
    displayed: RwLock<MetricSeries>,
    in_flight: AtomicBool,
    skip_overlapping: bool,
}

impl TickPipeline {
    pub fn new(
        source: Arc<dyn MetricsSource>,
        dispatcher: InferenceDispatcher,
        publisher: DashboardPublisher,
        skip_overlapping: bool,
    ) -> Self {
        Self {
            source,
            dispatcher,
            publisher,
            displayed: RwLock::new(MetricSeries::default()),
            in_flight: AtomicBool::new(false),
            skip_overlapping,
        }
    }

    pub fn store(&self) -> &AnomalyStore {
        self.dispatcher.store()
    }

    pub async fn displayed_series(&self) -> MetricSeries {
        self.displayed.read().await.clone()
    }

    /// Re-renders the dashboard from the current series and store contents.
    pub async fn refresh_dashboard(&self) {
        let series = self.displayed_series().await;
        self.publisher.publish(&series, self.store()).await;
    }

    pub async fn run_tick(&self) -> TickOutcome {
        let _guard = if self.skip_overlapping {
            if self.in_flight.swap(true, Ordering::SeqCst) {
                log::warn!("poll_tick_skipped reason=previous_tick_in_flight");
                return TickOutcome::SkippedOverlap;
            }
            Some(InFlightGuard(&self.in_flight))
        } else {
            None
        };

        let started = Instant::now();
        let (outcome, samples) = self.evaluate_latest().await;
        let anomalies_held = self.store().len().await;

        tracing::info!(
            target: "poller",
            module = "poller",
            outcome = outcome.as_str(),
            samples = samples,
            anomalies_held = anomalies_held,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "poll_tick"
        );

        outcome
    }

    async fn evaluate_latest(&self) -> (TickOutcome, usize) {
        let series = match self.source.fetch_series().await {
            Ok(series) => series,
            Err(error) => {
                log::warn!(
                    "metrics_fetch_failed endpoint={} kind={} error={}",
                    error.endpoint(),
                    error.kind(),
                    error
                );
                return (TickOutcome::FetchFailed, 0);
            }
        };

        let Some(latest) = series.latest_sample() else {
            return (TickOutcome::EmptyData, 0);
        };
        let samples = series.len();

        // The chart follows the backend even when classification fails.
        self.displayed.write().await.clone_from(&series);

        let outcome = match self.dispatcher.evaluate(&latest).await {
            Ok(verdict) => TickOutcome::Evaluated(verdict.prediction),
            Err(error) => {
                log::warn!(
                    "inference_failed timestamp={} endpoint={} kind={} error={}",
                    latest.timestamp,
                    error.endpoint(),
                    error.kind(),
                    error
                );
                TickOutcome::InferenceFailed
            }
        };

        self.publisher.publish(&series, self.store()).await;
        (outcome, samples)
    }
}
