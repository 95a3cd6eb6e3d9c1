//! Time-of-day scheduling for evaluation cycles

pub mod daily;
pub mod worker;

pub use daily::{DailySchedule, ScheduleError, DEFAULT_TIMES};
pub use worker::Scheduler;
