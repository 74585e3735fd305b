use serde::Deserialize;

use super::defaults::*;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: Api,
    #[serde(default)]
    pub poller: Poller,
    #[serde(default)]
    pub anomalies: Anomalies,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub journal: Journal,
    #[serde(default)]
    pub alerting: Alerting,
    #[serde(default)]
    pub dashboard: Dashboard,
}

/// The subset of [`Config`] that may change while the process is running.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub poll_interval_secs: u64,
    pub severity: Severity,
}

impl RuntimeConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            poll_interval_secs: config.poller.interval_secs,
            severity: config.severity.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Api {
    #[serde(default = "default_api_base_url")]
    pub base_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Poller {
    #[serde(default = "default_poll_interval_secs")]
    pub interval_secs: u64,
    #[serde(default = "default_skip_overlapping_ticks")]
    pub skip_overlapping_ticks: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Anomalies {
    #[serde(default = "default_anomaly_dedup")]
    pub dedup: bool,
}

/// Display-only thresholds for flagging anomaly rows as severe.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Severity {
    #[serde(default = "default_severity_cpu")]
    pub cpu: f64,
    #[serde(default = "default_severity_memory")]
    pub memory: f64,
    #[serde(default = "default_severity_disk")]
    pub disk: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Journal {
    #[serde(default = "default_journal_enabled")]
    pub enabled: bool,
    #[serde(default = "default_journal_dir")]
    pub dir: String,
    #[serde(default = "default_journal_max_file_size_bytes")]
    pub max_file_size_bytes: u64,
    #[serde(default = "default_journal_retention_days")]
    pub retention_days: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Alerting {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub webhook_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Dashboard {
    #[serde(default)]
    pub snapshot_path: Option<String>,
}
