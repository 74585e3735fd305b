use serde::Serialize;

use crate::anomaly_store::AnomalyEvent;
use crate::config::Alerting;
use crate::error::PipelineError;

const WEBHOOK_ENV_VAR: &str = "SLACK_WEBHOOK_URL";
const WEBHOOK_ENDPOINT: &str = "webhook";

#[derive(Debug, Serialize)]
struct WebhookMessage<'a> {
    text: &'a str,
}

/// Posts a Slack-style `{"text": ...}` message for every stored anomaly.
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    /// Builds a notifier when alerting is enabled and a URL is known, taking
    /// the config value first and the environment second.
    pub fn from_config(config: &Alerting, client: reqwest::Client) -> Option<Self> {
        if !config.enabled {
            return None;
        }

        let url = config
            .webhook_url
            .clone()
            .filter(|url| !url.trim().is_empty())
            .or_else(|| {
                std::env::var(WEBHOOK_ENV_VAR)
                    .ok()
                    .filter(|url| !url.trim().is_empty())
            });

        match url {
            Some(url) => Some(Self::new(client, url)),
            None => {
                log::warn!(
                    "alerting_disabled reason=webhook_url_missing env={}",
                    WEBHOOK_ENV_VAR
                );
                None
            }
        }
    }

    pub async fn notify_anomaly(&self, event: &AnomalyEvent) -> Result<(), PipelineError> {
        let text = format_anomaly_message(event);
        let response = self
            .client
            .post(&self.url)
            .json(&WebhookMessage { text: &text })
            .send()
            .await
            .map_err(|error| PipelineError::from_reqwest(WEBHOOK_ENDPOINT, error))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PipelineError::Status {
                endpoint: WEBHOOK_ENDPOINT,
                status: status.as_u16(),
            });
        }

        log::info!("anomaly_alert_sent timestamp={}", event.timestamp);
        Ok(())
    }
}

fn format_anomaly_message(event: &AnomalyEvent) -> String {
    format!(
        "🚨 Anomaly detected at {}\nCPU: {:.2}% | Memory: {:.2}% | Disk: {:.2}%",
        event.timestamp, event.cpu, event.memory, event.disk
    )
}
