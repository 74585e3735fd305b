use async_trait::async_trait;

use crate::error::PipelineError;

use super::model::MetricSeries;

#[async_trait]
pub trait MetricsSource: Send + Sync {
    /// Fetches the current series. An aligned empty series is a success.
    async fn fetch_series(&self) -> Result<MetricSeries, PipelineError>;
}

#[cfg(test)]
pub(crate) use mock::MockMetricsSource;

#[cfg(test)]
mod mock {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::error::PipelineError;
    use crate::metrics::MetricSeries;

    use super::MetricsSource;

    pub(crate) struct MockMetricsSource {
        series: Option<MetricSeries>,
        delay: Option<Duration>,
        calls: AtomicUsize,
    }

    impl MockMetricsSource {
        pub(crate) fn repeating(series: MetricSeries) -> Self {
            Self {
                series: Some(series),
                delay: None,
                calls: AtomicUsize::new(0),
            }
        }

        pub(crate) fn failing() -> Self {
            Self {
                series: None,
                delay: None,
                calls: AtomicUsize::new(0),
            }
        }

        pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        pub(crate) fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl MetricsSource for MockMetricsSource {
        async fn fetch_series(&self) -> Result<MetricSeries, PipelineError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }

            self.series
                .clone()
                .ok_or_else(|| PipelineError::unavailable("/metrics"))
        }
    }
}
