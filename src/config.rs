//! Service configuration from environment variables
//!
//! | Variable                        | Required | Default                 |
//! |---------------------------------|----------|-------------------------|
//! | `AIRWATCH_WEBHOOK_URL`          | yes      | --                      |
//! | `AIRWATCH_FEED_TOKEN`           | yes      | --                      |
//! | `AIRWATCH_LOCATION`             | no       | `el-paso`               |
//! | `AIRWATCH_FEED_HOST`            | no       | `https://api.waqi.info` |
//! | `AIRWATCH_HOST`                 | no       | `0.0.0.0`               |
//! | `AIRWATCH_PORT`                 | no       | `8080`                  |
//! | `AIRWATCH_SCHEDULE`             | no       | six slots, 08:30-18:00  |
//! | `AIRWATCH_UTC_OFFSET_HOURS`     | no       | `-6`                    |
//! | `AIRWATCH_REQUEST_TIMEOUT_SECS` | no       | `30`                    |
//! | `AIRWATCH_RUN_ON_START`         | no       | `true`                  |

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use chrono::FixedOffset;

use crate::schedule::{DailySchedule, ScheduleError};

pub const DEFAULT_FEED_HOST: &str = "https://api.waqi.info";
pub const DEFAULT_LOCATION: &str = "el-paso";
pub const DEFAULT_UTC_OFFSET_HOURS: i32 = -6;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Full service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Liveness server bind address
    pub host: IpAddr,
    pub port: u16,
    /// Chat webhook receiving notifications
    pub webhook_url: String,
    /// Feed API token
    pub feed_token: String,
    /// Feed location identifier, e.g. `el-paso` or `@1234`
    pub location: String,
    pub feed_host: String,
    /// Offset used for timestamps and schedule slots
    pub utc_offset: FixedOffset,
    pub schedule: DailySchedule,
    /// Upper bound on each feed or webhook request
    pub request_timeout: Duration,
    /// Run one check immediately at startup
    pub run_on_start: bool,
}

impl ServiceConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable lookup
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let webhook_url =
            var("AIRWATCH_WEBHOOK_URL").ok_or(ConfigError::Missing("AIRWATCH_WEBHOOK_URL"))?;
        let feed_token =
            var("AIRWATCH_FEED_TOKEN").ok_or(ConfigError::Missing("AIRWATCH_FEED_TOKEN"))?;

        let location = var("AIRWATCH_LOCATION").unwrap_or_else(|| DEFAULT_LOCATION.to_string());
        let feed_host = var("AIRWATCH_FEED_HOST").unwrap_or_else(|| DEFAULT_FEED_HOST.to_string());
        let host = match var("AIRWATCH_HOST") {
            Some(v) => parse_var("AIRWATCH_HOST", &v)?,
            None => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        };

        let port = match var("AIRWATCH_PORT") {
            Some(v) => parse_var("AIRWATCH_PORT", &v)?,
            None => 8080,
        };

        let offset_hours: i32 = match var("AIRWATCH_UTC_OFFSET_HOURS") {
            Some(v) => parse_var("AIRWATCH_UTC_OFFSET_HOURS", &v)?,
            None => DEFAULT_UTC_OFFSET_HOURS,
        };
        let utc_offset = offset_hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| ConfigError::Invalid {
                key: "AIRWATCH_UTC_OFFSET_HOURS",
                value: offset_hours.to_string(),
            })?;

        let schedule = match var("AIRWATCH_SCHEDULE") {
            Some(v) => DailySchedule::parse(&v, utc_offset)?,
            None => DailySchedule::default_times(utc_offset),
        };

        let timeout_secs: u64 = match var("AIRWATCH_REQUEST_TIMEOUT_SECS") {
            Some(v) => parse_var("AIRWATCH_REQUEST_TIMEOUT_SECS", &v)?,
            None => DEFAULT_REQUEST_TIMEOUT_SECS,
        };
        if timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "AIRWATCH_REQUEST_TIMEOUT_SECS",
                value: "0".to_string(),
            });
        }

        let run_on_start = match var("AIRWATCH_RUN_ON_START") {
            Some(v) => parse_bool("AIRWATCH_RUN_ON_START", &v)?,
            None => true,
        };

        Ok(Self {
            host,
            port,
            webhook_url,
            feed_token,
            location,
            feed_host,
            utc_offset,
            schedule,
            request_timeout: Duration::from_secs(timeout_secs),
            run_on_start,
        })
    }

    /// Socket address for the liveness server
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_var<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        key,
        value: value.to_string(),
    })
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            key,
            value: value.to_string(),
        }),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),

    #[error("Invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },

    #[error("Invalid schedule: {0}")]
    Schedule(#[from] ScheduleError),
}
