use std::sync::Arc;

use tokio::sync::{Mutex, Notify, RwLock};
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{Duration, Instant, sleep};

use crate::config::RuntimeConfig;
use crate::reconcile::ReconciliationLoader;

use super::pipeline::TickPipeline;

/// Drives [`TickPipeline`] on a fixed cadence and owns every task it spawns.
pub struct MetricsPoller {
    pipeline: Arc<TickPipeline>,
    reconciler: Arc<ReconciliationLoader>,
    runtime_config: Arc<RwLock<RuntimeConfig>>,
    runtime_update_notify: Arc<Notify>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl MetricsPoller {
    pub fn new(
        pipeline: Arc<TickPipeline>,
        reconciler: Arc<ReconciliationLoader>,
        runtime_config: Arc<RwLock<RuntimeConfig>>,
        runtime_update_notify: Arc<Notify>,
    ) -> Self {
        Self {
            pipeline,
            reconciler,
            runtime_config,
            runtime_update_notify,
            handle: Mutex::new(None),
        }
    }

    #[cfg(test)]
    pub async fn is_running(&self) -> bool {
        self.handle
            .lock()
            .await
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Kicks off history reconciliation and the tick loop. A second call while
    /// running is a no-op.
    pub async fn start(&self) {
        let mut handle = self.handle.lock().await;
        if handle.as_ref().is_some_and(|running| !running.is_finished()) {
            log::debug!("poller_start_ignored reason=already_running");
            return;
        }

        let interval_secs = self.runtime_config.read().await.poll_interval_secs;
        log::info!("poller_started interval_secs={}", interval_secs);

        *handle = Some(tokio::spawn(run_loop(
            self.pipeline.clone(),
            self.reconciler.clone(),
            self.runtime_config.clone(),
            self.runtime_update_notify.clone(),
        )));
    }

    /// Cancels the loop together with any in-flight tick or reconciliation.
    /// Once this returns no further tick starts. Safe to call repeatedly.
    pub async fn stop(&self) {
        let Some(handle) = self.handle.lock().await.take() else {
            return;
        };

        handle.abort();
        if let Err(error) = handle.await
            && error.is_panic()
        {
            log::error!("poller_loop_panicked error={}", error);
        }
        log::info!("poller_stopped");
    }
}

async fn run_loop(
    pipeline: Arc<TickPipeline>,
    reconciler: Arc<ReconciliationLoader>,
    runtime_config: Arc<RwLock<RuntimeConfig>>,
    runtime_update_notify: Arc<Notify>,
) {
    // Dropping the set on abort cancels everything still running in it.
    let mut tasks = JoinSet::new();
    tasks.spawn(reconcile_history(pipeline.clone(), reconciler));

    let mut tick_gaps = TickGapTracker::default();

    loop {
        let runtime = runtime_config.read().await.clone();
        let interval = Duration::from_secs(runtime.poll_interval_secs);

        tokio::select! {
            _ = sleep(interval) => {}
            _ = runtime_update_notify.notified() => {
                log::info!(
                    "poll_interval_change_interrupt_applied previous_sleep_secs={}",
                    runtime.poll_interval_secs
                );
                tick_gaps.reset();
                continue;
            }
        }

        if let Some(elapsed) = tick_gaps.record(Instant::now(), interval) {
            log::warn!(
                "poll_loop_delayed elapsed_secs={} threshold_secs={}",
                elapsed.as_secs(),
                (interval * 2).as_secs()
            );
        }

        while let Some(finished) = tasks.try_join_next() {
            if let Err(error) = finished
                && error.is_panic()
            {
                log::error!("poll_task_panicked error={}", error);
            }
        }

        let pipeline = pipeline.clone();
        tasks.spawn(async move {
            pipeline.run_tick().await;
        });
    }
}

async fn reconcile_history(pipeline: Arc<TickPipeline>, reconciler: Arc<ReconciliationLoader>) {
    match reconciler.load().await {
        Ok(events) => {
            let loaded = events.len();
            let held = pipeline.store().load_all(events).await;
            log::info!("reconciliation_completed loaded={} held={}", loaded, held);
            if loaded > 0 {
                pipeline.refresh_dashboard().await;
            }
        }
        Err(error) => {
            log::warn!(
                "reconciliation_failed endpoint={} kind={} error={}",
                error.endpoint(),
                error.kind(),
                error
            );
        }
    }
}

/// Gap between consecutive ticks, judged against the interval in force.
#[derive(Debug, Default)]
struct TickGapTracker {
    previous: Option<Instant>,
}

impl TickGapTracker {
    /// Returns the gap since the previous tick when it exceeds twice `interval`.
    fn record(&mut self, now: Instant, interval: Duration) -> Option<Duration> {
        let previous = self.previous.replace(now)?;
        let elapsed = now.duration_since(previous);
        (elapsed > interval * 2).then_some(elapsed)
    }

    /// Forgets the previous tick; gaps measured under an old interval mean nothing.
    fn reset(&mut self) {
        self.previous = None;
    }
}

#[cfg(test)]
mod tests {
    use tokio::time::{Duration, Instant};

    use super::TickGapTracker;

    #[test]
    fn flags_gaps_beyond_twice_the_interval() {
        let start = Instant::now();
        let interval = Duration::from_secs(5);
        let mut gaps = TickGapTracker::default();

        assert_eq!(gaps.record(start, interval), None);
        assert_eq!(gaps.record(start + Duration::from_secs(10), interval), None);
        assert_eq!(
            gaps.record(start + Duration::from_secs(21), interval),
            Some(Duration::from_secs(11))
        );
    }

    #[test]
    fn interval_change_does_not_report_a_false_delay() {
        let start = Instant::now();
        let mut gaps = TickGapTracker::default();

        gaps.record(start, Duration::from_secs(60));
        gaps.reset();

        let shorter = Duration::from_secs(2);
        assert_eq!(gaps.record(start + Duration::from_secs(62), shorter), None);
        assert_eq!(gaps.record(start + Duration::from_secs(64), shorter), None);
    }
}
