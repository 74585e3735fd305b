use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{RwLock, watch};

use crate::anomaly_store::{AnomalyEvent, AnomalyStore};
use crate::config::{RuntimeConfig, Severity};
use crate::metrics::MetricSeries;

use super::chart::{ChartData, chart_data};
use super::table::{AnomalyRow, anomaly_rows};

#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub chart: ChartData,
    pub anomalies: Vec<AnomalyRow>,
    pub anomaly_count: usize,
    pub generated_at: DateTime<Utc>,
}

impl DashboardSnapshot {
    pub fn build(series: &MetricSeries, events: &[AnomalyEvent], severity: &Severity) -> Self {
        Self {
            chart: chart_data(series),
            anomalies: anomaly_rows(events, severity),
            anomaly_count: events.len(),
            generated_at: Utc::now(),
        }
    }

    pub fn empty() -> Self {
        Self::build(&MetricSeries::default(), &[], &Severity::default())
    }
}

/// Hands fresh dashboard snapshots to whoever renders them.
#[derive(Clone)]
pub struct DashboardPublisher {
    sender: Arc<watch::Sender<DashboardSnapshot>>,
    runtime_config: Arc<RwLock<RuntimeConfig>>,
}

impl DashboardPublisher {
    pub fn new(runtime_config: Arc<RwLock<RuntimeConfig>>) -> Self {
        let (sender, _) = watch::channel(DashboardSnapshot::empty());
        Self {
            sender: Arc::new(sender),
            runtime_config,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<DashboardSnapshot> {
        self.sender.subscribe()
    }

    pub async fn publish(&self, series: &MetricSeries, store: &AnomalyStore) {
        let severity = self.runtime_config.read().await.severity.clone();
        let events = store.snapshot().await;
        let snapshot = DashboardSnapshot::build(series, &events, &severity);
        self.sender.send_replace(snapshot);
    }
}
