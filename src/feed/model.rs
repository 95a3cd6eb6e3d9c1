//! Feed response types

use serde::{Deserialize, Deserializer};

use super::client::FetchError;

/// A snapshot of the pollutant measurements for one station
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Reading {
    /// Composite Air Quality Index
    pub aqi: u32,
    /// PM2.5 concentration (µg/m³)
    pub pm25: f64,
    /// PM10 concentration (µg/m³)
    pub pm10: f64,
    /// UV index
    pub uv: f64,
}

impl Reading {
    pub fn new(aqi: u32, pm25: f64, pm10: f64, uv: f64) -> Self {
        Self { aqi, pm25, pm10, uv }
    }
}

/// Top-level feed envelope.
///
/// `data` is an object when `status` is `"ok"` and usually an error string
/// otherwise, so it stays untyped until the status has been checked.
#[derive(Debug, Deserialize)]
pub struct FeedResponse {
    pub status: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

#[derive(Debug, Default, Deserialize)]
struct FeedData {
    #[serde(default, deserialize_with = "lenient_aqi")]
    aqi: u32,
    #[serde(default)]
    iaqi: Iaqi,
}

/// Individual pollutant readings
#[derive(Debug, Default, Deserialize)]
struct Iaqi {
    #[serde(default)]
    pm25: Measurement,
    #[serde(default)]
    pm10: Measurement,
    #[serde(default)]
    uv: Measurement,
}

#[derive(Debug, Default, Deserialize)]
struct Measurement {
    #[serde(default, deserialize_with = "lenient_f64")]
    v: f64,
}

impl FeedResponse {
    /// Validate the envelope and flatten the payload into a [`Reading`]
    pub fn into_reading(self) -> Result<Reading, FetchError> {
        if self.status != "ok" {
            let detail = match &self.data {
                serde_json::Value::String(s) => s.clone(),
                serde_json::Value::Null => String::new(),
                other => other.to_string(),
            };
            return Err(FetchError::Status {
                status: self.status,
                detail,
            });
        }

        let data: FeedData = serde_json::from_value(self.data)
            .map_err(|e| FetchError::Decode(e.to_string()))?;

        Ok(Reading {
            aqi: data.aqi,
            pm25: data.iaqi.pm25.v,
            pm10: data.iaqi.pm10.v,
            uv: data.iaqi.uv.v,
        })
    }
}

/// Interpret a JSON value as a non-negative measurement.
///
/// Stations report `"-"` for missing values, so anything that is not a
/// finite non-negative number is treated as absent.
fn as_measurement(value: &serde_json::Value) -> Option<f64> {
    let n = match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    (n.is_finite() && n >= 0.0).then_some(n)
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(as_measurement(&value).unwrap_or(0.0))
}

fn lenient_aqi<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(as_measurement(&value)
        .map(|n| n.round().min(u32::MAX as f64) as u32)
        .unwrap_or(0))
}
