mod alerting;
mod anomaly_journal;
mod anomaly_store;
mod api;
mod app_context;
mod config;
mod error;
mod inference;
mod jobs;
mod metrics;
mod presentation;
mod reconcile;
mod scheduler;

use tracing_subscriber::EnvFilter;

use crate::api::HttpApiClient;
use crate::app_context::AppContext;
use crate::config::load_config;
use crate::jobs::start_background_jobs;

fn init_json_logging() {
    if let Err(error) = tracing_log::LogTracer::init() {
        eprintln!(
            "logging bridge initialization failed (continuing with existing logger): {}",
            error
        );
    }

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .json()
        .with_current_span(false)
        .with_span_list(false)
        .finish();

    if let Err(error) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("global logger initialization failed: {}", error);
    }
}

const CONFIG_PATH: &str = "config.toml";
const CONFIG_PATH_ENV_VAR: &str = "INFRA_MONITOR_CONFIG";
const JOURNAL_BACKLOG_PREVIEW: usize = 5;

fn config_path() -> String {
    std::env::var(CONFIG_PATH_ENV_VAR)
        .ok()
        .filter(|path| !path.trim().is_empty())
        .unwrap_or_else(|| CONFIG_PATH.to_string())
}

fn log_journal_backlog(app_context: &AppContext) {
    let Some(journal) = &app_context.journal else {
        return;
    };

    let backlog = journal.recent_failed_writes(JOURNAL_BACKLOG_PREVIEW);
    if backlog.is_empty() {
        return;
    }

    for entry in &backlog {
        log::warn!(
            "journal_unpersisted_anomaly timestamp={} recorded_at={} error_kind={}",
            entry.timestamp,
            entry.recorded_at,
            entry.error_kind
        );
    }
}

#[tokio::main]
async fn main() {
    init_json_logging();

    let config_path = config_path();
    let config = match load_config(&config_path) {
        Ok(config) => config,
        Err(error) => {
            log::error!("Configuration error: {}", error);
            return;
        }
    };

    let api = match HttpApiClient::from_config(&config.api) {
        Ok(api) => api,
        Err(error) => {
            log::error!("HTTP client initialization failed: {}", error);
            return;
        }
    };

    log::info!(
        "Smart infra monitor is starting... base_url={} interval_secs={}",
        config.api.base_url,
        config.poller.interval_secs
    );

    let app_context = AppContext::new(config, config_path, api);
    log_journal_backlog(&app_context);

    start_background_jobs(app_context.clone());
    app_context.poller.start().await;

    if let Err(error) = tokio::signal::ctrl_c().await {
        log::error!("shutdown signal listener failed: {}", error);
    }

    app_context.poller.stop().await;
    log::info!(
        "Smart infra monitor stopped anomalies_held={}",
        app_context.store.len().await
    );
}
