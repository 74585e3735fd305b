use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FailedWriteEntry {
    pub recorded_at: String,
    pub timestamp: String,
    pub cpu: f64,
    pub memory: f64,
    pub disk: f64,
    pub error_kind: String,
    pub error: String,
}
