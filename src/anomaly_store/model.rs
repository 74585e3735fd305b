use serde::{Deserialize, Serialize};

use crate::metrics::{MetricSample, TimestampKey};

/// A sample the inference service classified as anomalous.
///
/// `timestamp` is the observation time of the originating sample, never the
/// detection time. The serialized form is also the durable write payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyEvent {
    pub timestamp: String,
    pub cpu: f64,
    pub memory: f64,
    pub disk: f64,
}

impl AnomalyEvent {
    pub fn from_sample(sample: &MetricSample) -> Self {
        Self {
            timestamp: sample.timestamp.clone(),
            cpu: sample.cpu,
            memory: sample.memory,
            disk: sample.disk,
        }
    }

    pub fn identity(&self) -> TimestampKey {
        TimestampKey::from_raw(&self.timestamp)
    }
}

/// A record as the durable store returns it.
///
/// The store names its time column `_time`; some deployments also echo the
/// `timestamp` field that was written. Unknown columns are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawAnomalyRecord {
    #[serde(rename = "_time", default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    pub cpu: f64,
    pub memory: f64,
    pub disk: f64,
}
