pub mod calculator;

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::Frequency;

pub use calculator::{current_period, history, period_for, previous_period, shift, PeriodCalculator};

const SECONDS_PER_DAY: i64 = 86_400;

/// contiguous date interval of a group's payment cycle
///
/// `end` is the last calendar day of the period. As instants the period covers
/// `[start 00:00 UTC, end + 1 day 00:00 UTC)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Period {
    pub frequency: Frequency,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Period {
    /// first instant of the period
    pub fn start_at(&self) -> DateTime<Utc> {
        self.start.and_time(NaiveTime::MIN).and_utc()
    }

    /// first instant after the period
    pub fn end_at(&self) -> DateTime<Utc> {
        self.end
            .succ_opt()
            .unwrap_or(NaiveDate::MAX)
            .and_time(NaiveTime::MIN)
            .and_utc()
    }

    pub fn contains(&self, instant: &DateTime<Utc>) -> bool {
        self.contains_date(instant.date_naive())
    }

    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// whether `as_of` falls inside this period
    pub fn is_current(&self, as_of: &DateTime<Utc>) -> bool {
        self.contains(as_of)
    }

    /// calendar days in the period
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// days left until the period closes, partial days count as one
    pub fn days_remaining(&self, as_of: &DateTime<Utc>) -> i64 {
        let seconds = (self.end_at() - *as_of).num_seconds();
        if seconds <= 0 {
            return 0;
        }
        (seconds + SECONDS_PER_DAY - 1) / SECONDS_PER_DAY
    }

    /// quarter number (1-4) for quarterly periods
    pub fn quarter(&self) -> Option<u32> {
        match self.frequency {
            Frequency::Quarterly => Some(self.start.month0() / 3 + 1),
            _ => None,
        }
    }

    /// short human label, e.g. `2024-W07`, `February 2024`, `Q1 2024`, `2024`
    pub fn label(&self) -> String {
        match self.frequency {
            Frequency::Weekly => {
                let week = self.start.iso_week();
                format!("{}-W{:02}", week.year(), week.week())
            }
            Frequency::Monthly => self.start.format("%B %Y").to_string(),
            Frequency::Quarterly => {
                format!("Q{} {}", self.start.month0() / 3 + 1, self.start.year())
            }
            Frequency::Yearly => self.start.year().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_instant_bounds_are_half_open() {
        let period = Period {
            frequency: Frequency::Monthly,
            start: date(2024, 2, 1),
            end: date(2024, 2, 29),
        };

        assert!(period.contains(&Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap()));
        assert!(period.contains(&Utc.with_ymd_and_hms(2024, 2, 29, 23, 59, 59).unwrap()));
        assert!(!period.contains(&Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()));
        assert!(!period.contains(&Utc.with_ymd_and_hms(2024, 1, 31, 23, 59, 59).unwrap()));
        assert!(period.contains_date(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()));
        assert!(!period.contains_date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()));
        assert_eq!(period.days(), 29);
    }

    #[test]
    fn test_days_remaining() {
        let period = Period {
            frequency: Frequency::Weekly,
            start: date(2024, 3, 4),
            end: date(2024, 3, 10),
        };

        let monday = Utc.with_ymd_and_hms(2024, 3, 4, 0, 0, 0).unwrap();
        assert_eq!(period.days_remaining(&monday), 7);

        let sunday_noon = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        assert_eq!(period.days_remaining(&sunday_noon), 1);

        let after = Utc.with_ymd_and_hms(2024, 3, 12, 0, 0, 0).unwrap();
        assert_eq!(period.days_remaining(&after), 0);
    }

    #[test]
    fn test_labels() {
        let weekly = Period { frequency: Frequency::Weekly, start: date(2024, 2, 12), end: date(2024, 2, 18) };
        assert_eq!(weekly.label(), "2024-W07");

        let monthly = Period { frequency: Frequency::Monthly, start: date(2024, 2, 1), end: date(2024, 2, 29) };
        assert_eq!(monthly.label(), "February 2024");

        let quarterly = Period { frequency: Frequency::Quarterly, start: date(2024, 10, 1), end: date(2024, 12, 31) };
        assert_eq!(quarterly.label(), "Q4 2024");
        assert_eq!(quarterly.quarter(), Some(4));

        let yearly = Period { frequency: Frequency::Yearly, start: date(2023, 1, 1), end: date(2023, 12, 31) };
        assert_eq!(yearly.label(), "2023");
        assert_eq!(yearly.quarter(), None);
    }
}
