use tokio::time::{Duration, interval};

use crate::anomaly_journal::AnomalyJournal;

pub(super) fn start_maintenance_job(journal: AnomalyJournal) {
    tokio::spawn(async move {
        let mut ticker = interval(Duration::from_secs(3600));

        loop {
            ticker.tick().await;
            let removed = journal.run_maintenance();
            if removed > 0 {
                log::info!("journal_maintenance_completed removed_files={}", removed);
            }
        }
    });
}
