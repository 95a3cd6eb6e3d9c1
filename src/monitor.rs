//! One evaluation cycle: fetch, evaluate, commit state, notify

use chrono::{DateTime, FixedOffset, Utc};

use crate::alerts::{evaluate, AlertMessage, AlertState, Category, MessageSink, NotifyError};
use crate::feed::{FetchError, ReadingSource};

/// Owns the alert state and runs evaluation cycles against it.
///
/// Cycles take `&mut self`, so they can never overlap.
pub struct Monitor<S, N> {
    source: S,
    sink: N,
    state: AlertState,
    offset: FixedOffset,
}

impl<S, N> Monitor<S, N>
where
    S: ReadingSource,
    N: MessageSink,
{
    /// Create a monitor with an all-clear state.
    ///
    /// `offset` is the fixed local offset used for message timestamps.
    pub fn new(source: S, sink: N, offset: FixedOffset) -> Self {
        Self {
            source,
            sink,
            state: AlertState::default(),
            offset,
        }
    }

    pub fn state(&self) -> AlertState {
        self.state
    }

    /// Run one cycle, logging and swallowing any failure
    pub async fn tick(&mut self) {
        match self.run_cycle().await {
            Ok(message) => {
                tracing::debug!(category = %message.category, "Air quality check finished");
            }
            Err(e) => {
                tracing::error!(error = %e, "Air quality check failed");
            }
        }
    }

    /// Run one cycle at the current time
    pub async fn run_cycle(&mut self) -> Result<AlertMessage, CycleError> {
        self.run_cycle_at(Utc::now()).await
    }

    /// Run one cycle as if it were `now`.
    ///
    /// The state only changes after a successful fetch. It is committed
    /// before delivery, so a failed webhook call does not roll it back.
    pub async fn run_cycle_at(&mut self, now: DateTime<Utc>) -> Result<AlertMessage, CycleError> {
        let reading = self.source.fetch().await?;

        let (message, next) = evaluate(&reading, self.state, now.with_timezone(&self.offset));

        if next != self.state {
            tracing::info!(
                general = next.general_alert_active,
                dust_storm = next.dust_storm_active,
                uv = next.uv_alert_active,
                "Alert state changed"
            );
        }
        self.state = next;

        match message.category {
            Category::None => {
                tracing::info!(
                    aqi = reading.aqi,
                    pm25 = reading.pm25,
                    pm10 = reading.pm10,
                    uv = reading.uv,
                    "Air quality is good, no notification needed"
                );
            }
            Category::Alert | Category::Recovery => {
                tracing::info!(
                    category = %message.category,
                    alerts = ?message.alerts,
                    "Sending notification"
                );
                self.sink.send(&message).await?;
            }
        }

        Ok(message)
    }
}

/// Errors surfaced by a single cycle
#[derive(Debug, thiserror::Error)]
pub enum CycleError {
    #[error("Fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("Notification failed: {0}")]
    Notify(#[from] NotifyError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::Reading;
    use chrono::TimeZone;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct ScriptedSource {
        readings: Mutex<VecDeque<Result<Reading, FetchError>>>,
    }

    impl ScriptedSource {
        fn with(readings: Vec<Result<Reading, FetchError>>) -> Self {
            Self {
                readings: Mutex::new(readings.into()),
            }
        }
    }

    impl ReadingSource for ScriptedSource {
        async fn fetch(&self) -> Result<Reading, FetchError> {
            self.readings
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(FetchError::Network("script exhausted".to_string())))
        }
    }

    #[derive(Clone, Default)]
    struct RecordingSink {
        sent: Arc<Mutex<Vec<AlertMessage>>>,
        fail: bool,
    }

    impl MessageSink for RecordingSink {
        async fn send(&self, message: &AlertMessage) -> Result<(), NotifyError> {
            self.sent.lock().unwrap().push(message.clone());
            if self.fail {
                Err(NotifyError::Status(500))
            } else {
                Ok(())
            }
        }
    }

    fn utc_minus_6() -> FixedOffset {
        FixedOffset::west_opt(6 * 3600).unwrap()
    }

    fn noon_utc() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 14, 30, 0).unwrap()
    }

    #[tokio::test]
    async fn test_alert_then_recovery() {
        let source = ScriptedSource::with(vec![
            Ok(Reading::new(150, 10.0, 10.0, 0.0)),
            Ok(Reading::new(40, 10.0, 10.0, 0.0)),
            Ok(Reading::new(40, 10.0, 10.0, 0.0)),
        ]);
        let sink = RecordingSink::default();
        let mut monitor = Monitor::new(source, sink.clone(), utc_minus_6());

        let first = monitor.run_cycle_at(noon_utc()).await.unwrap();
        assert_eq!(first.category, Category::Alert);
        assert_eq!(first.timestamp, "2024-05-01 08:30:00");
        assert!(monitor.state().general_alert_active);

        let second = monitor.run_cycle_at(noon_utc()).await.unwrap();
        assert_eq!(second.category, Category::Recovery);
        assert_eq!(monitor.state(), AlertState::cleared());

        let third = monitor.run_cycle_at(noon_utc()).await.unwrap();
        assert_eq!(third.category, Category::None);

        let sent = sink.sent.lock().unwrap();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].category, Category::Alert);
        assert_eq!(sent[1].category, Category::Recovery);
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_state() {
        let source = ScriptedSource::with(vec![
            Ok(Reading::new(0, 0.0, 0.0, 9.0)),
            Err(FetchError::Http(503)),
        ]);
        let sink = RecordingSink::default();
        let mut monitor = Monitor::new(source, sink.clone(), utc_minus_6());

        monitor.run_cycle_at(noon_utc()).await.unwrap();
        let before = monitor.state();
        assert!(before.uv_alert_active);

        let err = monitor.run_cycle_at(noon_utc()).await.unwrap_err();
        assert!(matches!(err, CycleError::Fetch(FetchError::Http(503))));
        assert_eq!(monitor.state(), before);
        assert_eq!(sink.sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_delivery_commits_state() {
        let source = ScriptedSource::with(vec![Ok(Reading::new(0, 90.0, 0.0, 0.0))]);
        let sink = RecordingSink {
            fail: true,
            ..RecordingSink::default()
        };
        let mut monitor = Monitor::new(source, sink, utc_minus_6());

        let err = monitor.run_cycle_at(noon_utc()).await.unwrap_err();
        assert!(matches!(err, CycleError::Notify(_)));
        assert!(monitor.state().general_alert_active);
    }

    #[tokio::test]
    async fn test_tick_swallows_errors() {
        let source = ScriptedSource::with(vec![
            Err(FetchError::Network("connection refused".to_string())),
            Ok(Reading::new(120, 0.0, 0.0, 0.0)),
        ]);
        let sink = RecordingSink::default();
        let mut monitor = Monitor::new(source, sink.clone(), utc_minus_6());

        monitor.tick().await;
        assert_eq!(monitor.state(), AlertState::cleared());

        monitor.tick().await;
        assert!(monitor.state().general_alert_active);
        assert_eq!(sink.sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_normal_reading_sends_nothing() {
        let source = ScriptedSource::with(vec![Ok(Reading::new(20, 3.0, 8.0, 1.0))]);
        let sink = RecordingSink::default();
        let mut monitor = Monitor::new(source, sink.clone(), utc_minus_6());

        let message = monitor.run_cycle_at(noon_utc()).await.unwrap();
        assert_eq!(message.category, Category::None);
        assert!(sink.sent.lock().unwrap().is_empty());
    }
}
