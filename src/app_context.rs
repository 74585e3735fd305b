use std::sync::Arc;

use tokio::sync::{Notify, RwLock};

use crate::alerting::WebhookNotifier;
use crate::anomaly_journal::AnomalyJournal;
use crate::anomaly_store::AnomalyStore;
use crate::api::HttpApiClient;
use crate::config::{Config, RuntimeConfig};
use crate::inference::InferenceDispatcher;
use crate::presentation::DashboardPublisher;
use crate::reconcile::ReconciliationLoader;
use crate::scheduler::{MetricsPoller, TickPipeline};

#[derive(Clone)]
pub struct AppContext {
    pub config: Config,
    pub config_path: String,
    pub runtime_config: Arc<RwLock<RuntimeConfig>>,
    pub runtime_update_notify: Arc<Notify>,
    pub journal: Option<AnomalyJournal>,
    pub store: AnomalyStore,
    pub publisher: DashboardPublisher,
    pub pipeline: Arc<TickPipeline>,
    pub poller: Arc<MetricsPoller>,
}

/// Which parts of the runtime config a reload actually changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeConfigChange {
    pub interval_changed: bool,
    pub severity_changed: bool,
}

impl AppContext {
    pub fn new(config: Config, config_path: impl Into<String>, api: HttpApiClient) -> Self {
        let runtime_config = Arc::new(RwLock::new(RuntimeConfig::from_config(&config)));
        let runtime_update_notify = Arc::new(Notify::new());
        let api = Arc::new(api);

        let journal = AnomalyJournal::from_config(&config.journal);
        let store =
            AnomalyStore::new(api.clone(), config.anomalies.dedup).with_journal(journal.clone());
        let notifier = WebhookNotifier::from_config(&config.alerting, api.http().clone());
        let dispatcher =
            InferenceDispatcher::new(api.clone(), store.clone()).with_notifier(notifier);
        let publisher = DashboardPublisher::new(runtime_config.clone());

        let pipeline = Arc::new(TickPipeline::new(
            api.clone(),
            dispatcher,
            publisher.clone(),
            config.poller.skip_overlapping_ticks,
        ));
        let poller = Arc::new(MetricsPoller::new(
            pipeline.clone(),
            Arc::new(ReconciliationLoader::new(api)),
            runtime_config.clone(),
            runtime_update_notify.clone(),
        ));

        Self {
            config,
            config_path: config_path.into(),
            runtime_config,
            runtime_update_notify,
            journal,
            store,
            publisher,
            pipeline,
            poller,
        }
    }

    /// Swaps in a reloaded runtime config and wakes the poll loop when its
    /// cadence changed.
    pub async fn update_runtime_config(&self, runtime_config: RuntimeConfig) -> RuntimeConfigChange {
        let change = {
            let mut current = self.runtime_config.write().await;
            let change = RuntimeConfigChange {
                interval_changed: current.poll_interval_secs != runtime_config.poll_interval_secs,
                severity_changed: current.severity != runtime_config.severity,
            };
            *current = runtime_config;
            change
        };

        if change.interval_changed {
            self.runtime_update_notify.notify_one();
        }
        change
    }
}
