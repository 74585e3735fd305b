use serde::{Deserialize, Serialize};

/// One time-indexed observation of cpu/memory/disk usage percentages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSample {
    pub timestamp: String,
    pub cpu: f64,
    pub memory: f64,
    pub disk: f64,
}

/// Four index-aligned sequences as served by the metrics endpoint.
///
/// An empty series is the valid "no data yet" state. Fields are required on
/// the wire so that a response missing one is rejected as malformed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricSeries {
    pub timestamps: Vec<String>,
    pub cpu: Vec<f64>,
    pub memory: Vec<f64>,
    pub disk: Vec<f64>,
}

impl MetricSeries {
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_aligned(&self) -> bool {
        let len = self.timestamps.len();
        self.cpu.len() == len && self.memory.len() == len && self.disk.len() == len
    }

    /// Describes the length mismatch, if any, for error reporting.
    pub fn alignment_error(&self) -> Option<String> {
        if self.is_aligned() {
            return None;
        }

        Some(format!(
            "series lengths differ: timestamps={} cpu={} memory={} disk={}",
            self.timestamps.len(),
            self.cpu.len(),
            self.memory.len(),
            self.disk.len()
        ))
    }

    pub fn sample_at(&self, index: usize) -> Option<MetricSample> {
        Some(MetricSample {
            timestamp: self.timestamps.get(index)?.clone(),
            cpu: *self.cpu.get(index)?,
            memory: *self.memory.get(index)?,
            disk: *self.disk.get(index)?,
        })
    }

    pub fn latest_sample(&self) -> Option<MetricSample> {
        let last = self.len().checked_sub(1)?;
        self.sample_at(last)
    }
}

#[cfg(test)]
mod tests {
    use super::MetricSeries;

    fn series(len: usize) -> MetricSeries {
        MetricSeries {
            timestamps: (0..len).map(|i| format!("2025-03-01T10:00:{:02}Z", i)).collect(),
            cpu: (0..len).map(|i| 10.0 + i as f64).collect(),
            memory: (0..len).map(|i| 20.0 + i as f64).collect(),
            disk: (0..len).map(|i| 30.0 + i as f64).collect(),
        }
    }

    #[test]
    fn empty_series_has_no_latest_sample() {
        let empty = MetricSeries::default();
        assert!(empty.is_empty());
        assert!(empty.is_aligned());
        assert!(empty.latest_sample().is_none());
    }

    #[test]
    fn latest_sample_uses_last_index() {
        let sample = series(3).latest_sample().expect("latest sample");
        assert_eq!(sample.timestamp, "2025-03-01T10:00:02Z");
        assert_eq!(sample.cpu, 12.0);
        assert_eq!(sample.memory, 22.0);
        assert_eq!(sample.disk, 32.0);
    }

    #[test]
    fn detects_misaligned_series() {
        let mut misaligned = series(3);
        misaligned.disk.pop();

        assert!(!misaligned.is_aligned());
        let reason = misaligned.alignment_error().expect("mismatch reason");
        assert!(reason.contains("disk=2"));
        assert!(misaligned.latest_sample().is_none());
    }

    #[test]
    fn rejects_payload_missing_a_field() {
        let payload = r#"{"timestamps":[],"cpu":[],"memory":[]}"#;
        assert!(serde_json::from_str::<MetricSeries>(payload).is_err());
    }
}
