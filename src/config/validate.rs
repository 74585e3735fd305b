use thiserror::Error;

use super::schema::Config;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
    #[error("invalid config: {0}")]
    Validation(String),
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base_url = self.api.base_url.trim();
        if base_url.is_empty() {
            return Err(ConfigError::Validation(
                "api.base_url must not be empty".to_string(),
            ));
        }
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::Validation(
                "api.base_url must start with http:// or https://".to_string(),
            ));
        }
        if self.api.request_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "api.request_timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.poller.interval_secs == 0 {
            return Err(ConfigError::Validation(
                "poller.interval_secs must be greater than 0".to_string(),
            ));
        }
        validate_percentage("severity.cpu", self.severity.cpu)?;
        validate_percentage("severity.memory", self.severity.memory)?;
        validate_percentage("severity.disk", self.severity.disk)?;

        if self.journal.enabled && self.journal.dir.trim().is_empty() {
            return Err(ConfigError::Validation(
                "journal.dir must not be empty when journal.enabled is true".to_string(),
            ));
        }
        if self.journal.max_file_size_bytes == 0 {
            return Err(ConfigError::Validation(
                "journal.max_file_size_bytes must be greater than 0".to_string(),
            ));
        }
        if self.journal.retention_days == 0 {
            return Err(ConfigError::Validation(
                "journal.retention_days must be greater than 0".to_string(),
            ));
        }

        if let Some(url) = self.alerting.webhook_url.as_deref()
            && !url.trim().is_empty()
            && !url.trim().starts_with("https://")
            && !url.trim().starts_with("http://")
        {
            return Err(ConfigError::Validation(
                "alerting.webhook_url must be an http(s) URL".to_string(),
            ));
        }

        if let Some(path) = self.dashboard.snapshot_path.as_deref()
            && path.trim().is_empty()
        {
            return Err(ConfigError::Validation(
                "dashboard.snapshot_path must not be empty when set".to_string(),
            ));
        }
        Ok(())
    }
}

fn validate_percentage(field: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_nan() || !(0.0..=100.0).contains(&value) {
        return Err(ConfigError::Validation(format!(
            "{} must be between 0 and 100",
            field
        )));
    }
    Ok(())
}
