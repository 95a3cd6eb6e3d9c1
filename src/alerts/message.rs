//! Alert message construction and markdown rendering

use std::fmt;

use crate::feed::Reading;

/// What kind of notification a cycle produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// At least one threshold was crossed
    Alert,
    /// Readings are back under every threshold after an alert
    Recovery,
    /// Nothing to report
    None,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Alert => "alert",
            Category::Recovery => "recovery",
            Category::None => "none",
        };
        f.write_str(name)
    }
}

/// Outcome of evaluating one reading
#[derive(Debug, Clone, PartialEq)]
pub struct AlertMessage {
    pub category: Category,
    /// Fired alert descriptions, in rule order
    pub alerts: Vec<String>,
    /// Protective tips, one per fired alert
    pub tips: Vec<String>,
    /// Reading the message was computed from
    pub reading: Reading,
    /// Local time of the evaluation, `YYYY-MM-DD HH:MM:SS`
    pub timestamp: String,
}

impl AlertMessage {
    /// Whether this message should be delivered at all
    pub fn is_deliverable(&self) -> bool {
        self.category != Category::None
    }

    /// Render as webhook markdown. Returns `None` for [`Category::None`].
    pub fn render(&self) -> Option<String> {
        match self.category {
            Category::Alert => {
                let mut content = format!(
                    "⚠️ **Air Quality Alert**\n\n**Time:** {}\n**Exceeded readings:**\n{}",
                    self.timestamp,
                    bullets(self.alerts.iter().map(|a| format!("**{}**", a)))
                );
                if !self.tips.is_empty() {
                    content.push_str("\n\n**Protective tips:**\n");
                    content.push_str(&bullets(self.tips.iter().cloned()));
                }
                Some(content)
            }
            Category::Recovery => {
                let r = &self.reading;
                Some(format!(
                    "✅ Air quality back to normal ({})\n- AQI: {}\n- PM2.5: {}\n- PM10: {}\n- UV Index: {}",
                    self.timestamp, r.aqi, r.pm25, r.pm10, r.uv
                ))
            }
            Category::None => None,
        }
    }
}

fn bullets(items: impl Iterator<Item = String>) -> String {
    items
        .map(|item| format!("- {}", item))
        .collect::<Vec<_>>()
        .join("\n")
}
