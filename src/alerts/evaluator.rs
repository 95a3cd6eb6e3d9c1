//! Threshold evaluation
//!
//! Every rule is checked on every reading and all matching rules
//! contribute, so the higher tier of a pollutant always comes with the
//! lower tier's alert and tip as well.

use chrono::{DateTime, FixedOffset};

use super::message::{AlertMessage, Category};
use super::state::AlertState;
use crate::feed::Reading;

/// Format used for message timestamps
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const AQI_LIMIT: u32 = 100;
const PM25_LIMIT: f64 = 35.0;
const PM25_SEVERE: f64 = 70.0;
const PM10_LIMIT: f64 = 50.0;
const PM10_SEVERE: f64 = 100.0;
const DUST_STORM_PM10: f64 = 150.0;
const DUST_STORM_PM25: f64 = 30.0;
const UV_HIGH: f64 = 6.0;
const UV_VERY_HIGH: f64 = 8.0;

/// Alerts and tips collected while walking the rules
#[derive(Default)]
struct Findings {
    alerts: Vec<String>,
    tips: Vec<String>,
    dust_storm: bool,
    uv: bool,
}

impl Findings {
    fn push(&mut self, alert: String, tip: &str) {
        self.alerts.push(alert);
        self.tips.push(tip.to_string());
    }
}

fn check_thresholds(r: &Reading) -> Findings {
    let mut f = Findings::default();

    if r.aqi > AQI_LIMIT {
        f.push(
            format!("AQI: {} (exceeds threshold)", r.aqi),
            "Air quality is poor. Reduce outdoor activity and wear a mask.",
        );
    }

    if r.pm25 > PM25_LIMIT {
        f.push(
            format!("PM2.5: {} (exceeds threshold)", r.pm25),
            "PM2.5 affects the respiratory system. Wear a mask and run an air purifier.",
        );
    }
    if r.pm25 > PM25_SEVERE {
        f.push(
            format!("PM2.5: {} (severely exceeds threshold)", r.pm25),
            "PM2.5 pollution is severe. Avoid going outside.",
        );
    }

    if r.pm10 > PM10_LIMIT {
        f.push(
            format!("PM10: {} (exceeds threshold)", r.pm10),
            "PM10 may cause breathing discomfort. Take precautions.",
        );
    }
    if r.pm10 > PM10_SEVERE {
        f.push(
            format!("PM10: {} (severely exceeds threshold)", r.pm10),
            "PM10 pollution is severe. Close doors and windows and avoid going outside.",
        );
    }

    if r.pm10 > DUST_STORM_PM10 && r.pm25 > DUST_STORM_PM25 {
        f.push(
            format!("Dust storm warning (PM10: {}, PM2.5: {})", r.pm10, r.pm25),
            "A dust storm may be under way. Stay indoors and protect against dust.",
        );
        f.dust_storm = true;
    }

    if r.uv >= UV_HIGH {
        f.push(
            format!("UV Index: {} (high)", r.uv),
            "UV is strong. Use sunscreen and wear a hat.",
        );
        f.uv = true;
    }
    if r.uv >= UV_VERY_HIGH {
        f.push(
            format!("UV Index: {} (very high)", r.uv),
            "UV is very strong. Avoid prolonged sun exposure.",
        );
        f.uv = true;
    }

    f
}

/// Evaluate a reading against the previous state.
///
/// Returns the message to deliver (possibly [`Category::None`]) and the
/// state for the next cycle. An alert always wins over a pending
/// recovery; the dust storm and UV flags are only cleared by a recovery.
pub fn evaluate(
    reading: &Reading,
    state: AlertState,
    now: DateTime<FixedOffset>,
) -> (AlertMessage, AlertState) {
    let findings = check_thresholds(reading);
    let timestamp = now.format(TIMESTAMP_FORMAT).to_string();

    let (category, next) = if !findings.alerts.is_empty() {
        (
            Category::Alert,
            AlertState {
                general_alert_active: true,
                dust_storm_active: state.dust_storm_active || findings.dust_storm,
                uv_alert_active: state.uv_alert_active || findings.uv,
            },
        )
    } else if state.any_active() {
        (Category::Recovery, AlertState::cleared())
    } else {
        (Category::None, state)
    };

    let message = AlertMessage {
        category,
        alerts: findings.alerts,
        tips: findings.tips,
        reading: *reading,
        timestamp,
    };

    (message, next)
}
