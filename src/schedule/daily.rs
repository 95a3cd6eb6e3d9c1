use chrono::{DateTime, FixedOffset, NaiveTime, TimeDelta, Utc};

/// Default check times, local to the configured offset
pub const DEFAULT_TIMES: &[&str] = &["08:30", "10:30", "12:00", "14:00", "16:00", "18:00"];

/// A fixed set of times of day in a fixed UTC offset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailySchedule {
    /// Sorted, without duplicates, never empty
    times: Vec<NaiveTime>,
    offset: FixedOffset,
}

impl DailySchedule {
    /// Build a schedule from a list of local times
    pub fn new(
        times: impl IntoIterator<Item = NaiveTime>,
        offset: FixedOffset,
    ) -> Result<Self, ScheduleError> {
        let mut times: Vec<NaiveTime> = times.into_iter().collect();
        times.sort();
        times.dedup();

        if times.is_empty() {
            return Err(ScheduleError::Empty);
        }

        Ok(Self { times, offset })
    }

    /// Parse a comma-separated list of `HH:MM` times
    pub fn parse(spec: &str, offset: FixedOffset) -> Result<Self, ScheduleError> {
        let times = spec
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                NaiveTime::parse_from_str(s, "%H:%M")
                    .map_err(|_| ScheduleError::InvalidTime(s.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(times, offset)
    }

    /// The six default daily check times
    pub fn default_times(offset: FixedOffset) -> Self {
        let times = DEFAULT_TIMES
            .iter()
            .filter_map(|s| NaiveTime::parse_from_str(s, "%H:%M").ok());
        Self {
            times: times.collect(),
            offset,
        }
    }

    pub fn times(&self) -> &[NaiveTime] {
        &self.times
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// First scheduled instant strictly after `instant`.
    ///
    /// Only `None` at the very end of the representable calendar.
    pub fn next_after(&self, instant: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let today = instant.with_timezone(&self.offset).date_naive();
        let tomorrow = today.succ_opt()?;
        let shift = TimeDelta::seconds(i64::from(self.offset.local_minus_utc()));

        [today, tomorrow]
            .into_iter()
            .flat_map(|day| self.times.iter().map(move |t| day.and_time(*t)))
            .map(|local| (local - shift).and_utc())
            .find(|candidate| *candidate > instant)
    }
}

/// Schedule configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    #[error("Invalid time of day {0:?}, expected HH:MM")]
    InvalidTime(String),

    #[error("Schedule has no times")]
    Empty,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc_minus_6() -> FixedOffset {
        FixedOffset::west_opt(6 * 3600).unwrap()
    }

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_default_times() {
        let schedule = DailySchedule::default_times(utc_minus_6());
        assert_eq!(schedule.times().len(), 6);
        assert_eq!(schedule.times()[0], hm(8, 30));
        assert_eq!(schedule.times()[5], hm(18, 0));
    }

    #[test]
    fn test_parse_sorts_and_dedups() {
        let schedule = DailySchedule::parse(" 12:00, 08:30,12:00 ,", utc_minus_6()).unwrap();
        assert_eq!(schedule.times(), &[hm(8, 30), hm(12, 0)]);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            DailySchedule::parse("25:00", utc_minus_6()),
            Err(ScheduleError::InvalidTime(_))
        ));
        assert!(matches!(
            DailySchedule::parse(" , ", utc_minus_6()),
            Err(ScheduleError::Empty)
        ));
    }

    #[test]
    fn test_next_same_day() {
        let schedule = DailySchedule::default_times(utc_minus_6());

        // 09:00 local (UTC-6)
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 15, 0, 0).unwrap();
        let next = schedule.next_after(now).unwrap();

        // 10:30 local
        assert_eq!(next, Utc.with_ymd_and_hms(2024, 5, 1, 16, 30, 0).unwrap());
    }

    #[test]
    fn test_next_is_strictly_after() {
        let schedule = DailySchedule::default_times(utc_minus_6());

        // exactly 12:00 local
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 18, 0, 0).unwrap();
        let next = schedule.next_after(now).unwrap();
        assert_eq!(next, Utc.with_ymd_and_hms(2024, 5, 1, 20, 0, 0).unwrap());
    }

    #[test]
    fn test_next_wraps_to_tomorrow() {
        let schedule = DailySchedule::default_times(utc_minus_6());

        // 19:00 local on May 1st is 01:00 UTC on May 2nd
        let now = Utc.with_ymd_and_hms(2024, 5, 2, 1, 0, 0).unwrap();
        let next = schedule.next_after(now).unwrap();

        // 08:30 local on May 2nd
        assert_eq!(next, Utc.with_ymd_and_hms(2024, 5, 2, 14, 30, 0).unwrap());
    }

    #[test]
    fn test_next_in_utc() {
        let schedule = DailySchedule::parse("00:00", FixedOffset::east_opt(0).unwrap()).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 12, 31, 23, 59, 59).unwrap();
        assert_eq!(
            schedule.next_after(now).unwrap(),
            Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
        );
    }
}
