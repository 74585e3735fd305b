use super::schema::{Alerting, Anomalies, Api, Config, Journal, Poller, Severity};

pub(super) fn default_api_base_url() -> String {
    "http://localhost:8000".to_string()
}

pub(super) fn default_request_timeout_secs() -> u64 {
    10
}

pub(super) fn default_poll_interval_secs() -> u64 {
    5
}

pub(super) fn default_skip_overlapping_ticks() -> bool {
    true
}

pub(super) fn default_anomaly_dedup() -> bool {
    true
}

pub(super) fn default_severity_cpu() -> f64 {
    85.0
}

pub(super) fn default_severity_memory() -> f64 {
    85.0
}

pub(super) fn default_severity_disk() -> f64 {
    90.0
}

pub(super) fn default_journal_enabled() -> bool {
    true
}

pub(super) fn default_journal_dir() -> String {
    "logs/anomaly_journal".to_string()
}

pub(super) fn default_journal_max_file_size_bytes() -> u64 {
    10 * 1024 * 1024
}

pub(super) fn default_journal_retention_days() -> u16 {
    7
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: Api::default(),
            poller: Poller::default(),
            anomalies: Anomalies::default(),
            severity: Severity::default(),
            journal: Journal::default(),
            alerting: Alerting::default(),
            dashboard: Default::default(),
        }
    }
}

impl Default for Api {
    fn default() -> Self {
        Self {
            base_url: default_api_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Default for Poller {
    fn default() -> Self {
        Self {
            interval_secs: default_poll_interval_secs(),
            skip_overlapping_ticks: default_skip_overlapping_ticks(),
        }
    }
}

impl Default for Anomalies {
    fn default() -> Self {
        Self {
            dedup: default_anomaly_dedup(),
        }
    }
}

impl Default for Severity {
    fn default() -> Self {
        Self {
            cpu: default_severity_cpu(),
            memory: default_severity_memory(),
            disk: default_severity_disk(),
        }
    }
}

impl Default for Journal {
    fn default() -> Self {
        Self {
            enabled: default_journal_enabled(),
            dir: default_journal_dir(),
            max_file_size_bytes: default_journal_max_file_size_bytes(),
            retention_days: default_journal_retention_days(),
        }
    }
}

impl Default for Alerting {
    fn default() -> Self {
        Self {
            enabled: false,
            webhook_url: None,
        }
    }
}
