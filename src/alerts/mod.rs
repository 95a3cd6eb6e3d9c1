//! Threshold alerting
//!
//! Evaluates readings against the fixed health thresholds, tracks which
//! alert categories are active and delivers the resulting messages to a
//! chat webhook.

pub mod evaluator;
pub mod message;
pub mod notifier;
pub mod state;

pub use evaluator::{evaluate, TIMESTAMP_FORMAT};
pub use message::{AlertMessage, Category};
pub use notifier::{MessageSink, Notifier, NotifyError};
pub use state::AlertState;
