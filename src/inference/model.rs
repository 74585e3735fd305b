use serde::{Deserialize, Serialize};

use crate::metrics::MetricSample;

/// Request body of the inference endpoint: the sample without its timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampleFeatures {
    pub cpu: f64,
    pub memory: f64,
    pub disk: f64,
}

impl From<&MetricSample> for SampleFeatures {
    fn from(sample: &MetricSample) -> Self {
        Self {
            cpu: sample.cpu,
            memory: sample.memory,
            disk: sample.disk,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Prediction {
    Anomaly,
    Normal,
}

impl Prediction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Anomaly => "anomaly",
            Self::Normal => "normal",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InferenceVerdict {
    pub prediction: Prediction,
}

impl InferenceVerdict {
    pub fn is_anomaly(&self) -> bool {
        self.prediction == Prediction::Anomaly
    }
}
