use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::Notify;

use super::daily::DailySchedule;
use crate::alerts::MessageSink;
use crate::feed::ReadingSource;
use crate::monitor::Monitor;

/// Background worker that runs the monitor at each scheduled time of day
pub struct Scheduler {
    schedule: DailySchedule,
    run_on_start: bool,
    running: Arc<AtomicBool>,
    wake: Notify,
}

impl Scheduler {
    pub fn new(schedule: DailySchedule, run_on_start: bool) -> Self {
        Self {
            schedule,
            run_on_start,
            running: Arc::new(AtomicBool::new(false)),
            wake: Notify::new(),
        }
    }

    /// Start the background worker. The monitor moves into the task, so
    /// cycles run one at a time.
    pub fn start<S, N>(self: Arc<Self>, mut monitor: Monitor<S, N>) -> tokio::task::JoinHandle<()>
    where
        S: ReadingSource + Send + Sync + 'static,
        N: MessageSink + Send + Sync + 'static,
    {
        self.running.store(true, Ordering::SeqCst);

        tokio::spawn(async move {
            tracing::info!(
                times = ?self.schedule.times(),
                offset = %self.schedule.offset(),
                "Scheduler started"
            );

            if self.run_on_start {
                monitor.tick().await;
            }

            let mut last_fire = Utc::now();

            while self.running.load(Ordering::SeqCst) {
                let Some(next) = self.schedule.next_after(last_fire.max(Utc::now())) else {
                    tracing::error!("No further check time can be computed");
                    break;
                };

                tracing::info!(
                    next = %next.with_timezone(&self.schedule.offset()),
                    "Next air quality check scheduled"
                );

                let wait = (next - Utc::now()).to_std().unwrap_or(Duration::ZERO);
                tokio::select! {
                    _ = tokio::time::sleep(wait) => {}
                    _ = self.wake.notified() => {}
                }

                if !self.running.load(Ordering::SeqCst) {
                    break;
                }

                monitor.tick().await;
                last_fire = next;
            }

            tracing::info!("Scheduler stopped");
        })
    }

    /// Stop the worker, interrupting any pending wait
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
        self.wake.notify_one();
    }

    /// Check if worker is running
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}
