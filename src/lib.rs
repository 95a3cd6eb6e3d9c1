//! Airwatch: Scheduled Air-Quality Alerts
//!
//! Polls a WAQI station feed for one location at fixed times of day,
//! checks each reading against health thresholds and pushes markdown
//! notifications to a chat webhook when thresholds are crossed or when
//! conditions return to normal afterwards.
//!
//! # Features
//!
//! - **Cumulative Thresholds**: AQI, PM2.5, PM10, dust storm and UV rules
//! - **Recovery Messages**: One all-clear message after any alert
//! - **Daily Schedule**: Fixed check times in a fixed UTC offset
//! - **Liveness Endpoint**: Plain-text `GET /` for process keepers
//!
//! # Example
//!
//! ```
//! use airwatch::alerts::{evaluate, AlertState, Category};
//! use airwatch::feed::Reading;
//! use chrono::{FixedOffset, Utc};
//!
//! let now = Utc::now().with_timezone(&FixedOffset::west_opt(6 * 3600).unwrap());
//! let reading = Reading::new(150, 10.0, 10.0, 0.0);
//!
//! let (message, state) = evaluate(&reading, AlertState::default(), now);
//! assert_eq!(message.category, Category::Alert);
//! assert!(state.general_alert_active);
//! ```

pub mod alerts;
pub mod api;
pub mod config;
pub mod feed;
pub mod monitor;
pub mod schedule;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use alerts::{evaluate, AlertMessage, AlertState, Category, Notifier, NotifyError};
pub use config::{ConfigError, ServiceConfig};
pub use feed::{FeedClient, FetchError, Reading};
pub use monitor::{CycleError, Monitor};
