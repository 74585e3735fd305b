use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tokio::sync::watch;

use crate::presentation::DashboardSnapshot;

pub(super) fn start_dashboard_export_job(
    mut receiver: watch::Receiver<DashboardSnapshot>,
    snapshot_path: String,
) {
    tokio::spawn(async move {
        let path = PathBuf::from(snapshot_path);

        while receiver.changed().await.is_ok() {
            let snapshot = receiver.borrow_and_update().clone();
            if let Err(error) = write_snapshot(&path, &snapshot) {
                log::warn!(
                    "dashboard_export_failed path={} error={}",
                    path.display(),
                    error
                );
            }
        }
    });
}

/// Writes through a sibling temp file so readers never see a partial file.
fn write_snapshot(path: &Path, snapshot: &DashboardSnapshot) -> io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    let body = serde_json::to_vec_pretty(snapshot).map_err(io::Error::other)?;
    let temp_path = path.with_extension("json.tmp");
    fs::write(&temp_path, body)?;
    fs::rename(&temp_path, path)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use crate::anomaly_store::AnomalyEvent;
    use crate::config::Severity;
    use crate::metrics::MetricSeries;
    use crate::presentation::DashboardSnapshot;

    use super::write_snapshot;

    #[test]
    fn writes_snapshot_json_atomically() {
        let temp = tempdir().expect("tempdir should be created");
        let path = temp.path().join("nested").join("dashboard.json");
        let events = vec![AnomalyEvent {
            timestamp: "2025-03-01T10:00:00Z".to_string(),
            cpu: 91.0,
            memory: 40.0,
            disk: 30.0,
        }];
        let snapshot =
            DashboardSnapshot::build(&MetricSeries::default(), &events, &Severity::default());

        write_snapshot(&path, &snapshot).expect("snapshot should be written");

        let raw = fs::read_to_string(&path).expect("snapshot should be readable");
        let value: serde_json::Value = serde_json::from_str(&raw).expect("valid json");
        assert_eq!(value["anomaly_count"], 1);
        assert_eq!(value["anomalies"][0]["severe"], true);
        assert_eq!(value["chart"]["datasets"].as_array().map(Vec::len), Some(3));
        assert!(!path.with_extension("json.tmp").exists());
    }
}
