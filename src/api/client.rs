use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::anomaly_store::{AnomalyBackend, AnomalyEvent};
use crate::config::Api;
use crate::error::PipelineError;
use crate::inference::{InferenceClient, InferenceVerdict, SampleFeatures};
use crate::metrics::{MetricSeries, MetricsSource};

const METRICS_ENDPOINT: &str = "/metrics";
const PREDICT_ENDPOINT: &str = "/predict";
const ANOMALY_ENDPOINT: &str = "/anomaly";
const ANOMALIES_ENDPOINT: &str = "/anomalies";

/// JSON-over-HTTP client for the monitoring backend.
#[derive(Debug, Clone)]
pub struct HttpApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpApiClient {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &Api) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self::new(client, &config.base_url))
    }

    pub fn http(&self) -> &reqwest::Client {
        &self.client
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
    ) -> Result<T, PipelineError> {
        let response = self
            .client
            .get(self.url(endpoint))
            .send()
            .await
            .map_err(|error| PipelineError::from_reqwest(endpoint, error))?;
        decode(endpoint, response).await
    }

    async fn post_json(
        &self,
        endpoint: &'static str,
        body: &(impl serde::Serialize + Sync),
    ) -> Result<reqwest::Response, PipelineError> {
        let response = self
            .client
            .post(self.url(endpoint))
            .json(body)
            .send()
            .await
            .map_err(|error| PipelineError::from_reqwest(endpoint, error))?;
        ensure_success(endpoint, response)
    }
}

fn ensure_success(
    endpoint: &'static str,
    response: reqwest::Response,
) -> Result<reqwest::Response, PipelineError> {
    let status = response.status();
    if !status.is_success() {
        return Err(PipelineError::Status {
            endpoint,
            status: status.as_u16(),
        });
    }
    Ok(response)
}

async fn decode<T: DeserializeOwned>(
    endpoint: &'static str,
    response: reqwest::Response,
) -> Result<T, PipelineError> {
    ensure_success(endpoint, response)?
        .json::<T>()
        .await
        .map_err(|error| PipelineError::from_reqwest(endpoint, error))
}

#[async_trait]
impl MetricsSource for HttpApiClient {
    async fn fetch_series(&self) -> Result<MetricSeries, PipelineError> {
        let series: MetricSeries = self.get_json(METRICS_ENDPOINT).await?;
        if let Some(reason) = series.alignment_error() {
            return Err(PipelineError::malformed(METRICS_ENDPOINT, reason));
        }
        Ok(series)
    }
}

#[async_trait]
impl InferenceClient for HttpApiClient {
    async fn predict(&self, features: &SampleFeatures) -> Result<InferenceVerdict, PipelineError> {
        let response = self.post_json(PREDICT_ENDPOINT, features).await?;
        response
            .json::<InferenceVerdict>()
            .await
            .map_err(|error| PipelineError::from_reqwest(PREDICT_ENDPOINT, error))
    }
}

#[async_trait]
impl AnomalyBackend for HttpApiClient {
    /// The response body is ignored; only the status matters.
    async fn persist(&self, event: &AnomalyEvent) -> Result<(), PipelineError> {
        self.post_json(ANOMALY_ENDPOINT, event).await?;
        Ok(())
    }

    async fn fetch_all(&self) -> Result<Vec<serde_json::Value>, PipelineError> {
        self.get_json(ANOMALIES_ENDPOINT).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::anomaly_store::{AnomalyBackend, AnomalyEvent};
    use crate::inference::{InferenceClient, Prediction, SampleFeatures};
    use crate::metrics::MetricsSource;

    use super::HttpApiClient;

    fn client_for(server: &MockServer) -> HttpApiClient {
        HttpApiClient::new(reqwest::Client::new(), format!("{}/", server.uri()))
    }

    #[tokio::test]
    async fn fetches_aligned_series() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/metrics"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "timestamps": ["2025-03-01T10:00:00Z", "2025-03-01T10:00:05Z"],
                "cpu": [10.0, 20.0],
                "memory": [30.0, 40.0],
                "disk": [50.0, 60.0]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let series = client_for(&server)
            .fetch_series()
            .await
            .expect("series should decode");

        assert_eq!(series.len(), 2);
        assert_eq!(series.latest_sample().expect("latest").cpu, 20.0);
    }

    #[tokio::test]
    async fn empty_series_is_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/metrics"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "timestamps": [], "cpu": [], "memory": [], "disk": []
            })))
            .mount(&server)
            .await;

        let series = client_for(&server).fetch_series().await.expect("empty ok");
        assert!(series.is_empty());
    }

    #[tokio::test]
    async fn misaligned_or_incomplete_series_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/metrics"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "timestamps": ["a", "b"], "cpu": [1.0], "memory": [1.0, 2.0], "disk": [1.0, 2.0]
            })))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/metrics"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "timestamps": ["a"], "cpu": [1.0]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let misaligned = client.fetch_series().await.expect_err("misaligned");
        assert_eq!(misaligned.kind(), "malformed_response");
        let incomplete = client.fetch_series().await.expect_err("incomplete");
        assert_eq!(incomplete.kind(), "malformed_response");
    }

    #[tokio::test]
    async fn server_error_is_transport_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let error = client_for(&server)
            .fetch_series()
            .await
            .expect_err("500 should fail");
        assert_eq!(error.kind(), "transport_failure");
        assert_eq!(error.endpoint(), "/metrics");
    }

    #[tokio::test]
    async fn predict_posts_features_and_decodes_verdict() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/predict"))
            .and(body_json(json!({"cpu": 90.0, "memory": 40.0, "disk": 30.0})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"prediction": "anomaly"})))
            .expect(1)
            .mount(&server)
            .await;

        let verdict = client_for(&server)
            .predict(&SampleFeatures {
                cpu: 90.0,
                memory: 40.0,
                disk: 30.0,
            })
            .await
            .expect("verdict");
        assert_eq!(verdict.prediction, Prediction::Anomaly);
    }

    #[tokio::test]
    async fn unknown_prediction_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/predict"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"prediction": "maybe"})))
            .mount(&server)
            .await;

        let error = client_for(&server)
            .predict(&SampleFeatures {
                cpu: 1.0,
                memory: 1.0,
                disk: 1.0,
            })
            .await
            .expect_err("unknown verdict");
        assert_eq!(error.kind(), "malformed_response");
    }

    #[tokio::test]
    async fn persist_posts_event_and_ignores_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/anomaly"))
            .and(body_json(json!({
                "timestamp": "2025-03-01T10:00:00Z",
                "cpu": 90.0,
                "memory": 40.0,
                "disk": 30.0
            })))
            .respond_with(ResponseTemplate::new(200).set_body_string("stored"))
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server)
            .persist(&AnomalyEvent {
                timestamp: "2025-03-01T10:00:00Z".to_string(),
                cpu: 90.0,
                memory: 40.0,
                disk: 30.0,
            })
            .await
            .expect("persist should succeed");
    }

    #[tokio::test]
    async fn fetch_all_reads_store_records() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/anomalies"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"_time": "2025-03-01T10:00:00Z", "cpu": 91.0, "memory": 40.0, "disk": 30.0},
                {"_time": "2025-03-01T10:05:00Z", "cpu": 92.0, "memory": 41.0, "disk": 31.0}
            ])))
            .mount(&server)
            .await;

        let rows = client_for(&server).fetch_all().await.expect("rows");

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1]["_time"], "2025-03-01T10:05:00Z");
        assert_eq!(rows[1]["cpu"], 92.0);
    }
}
