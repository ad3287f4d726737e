use chrono::{DateTime, Datelike, Days, Months, NaiveDate, Utc};

use crate::errors::{Result, TrackerError};
use crate::period::Period;
use crate::types::{Direction, Frequency};

/// computes period boundaries for one payment frequency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodCalculator {
    pub frequency: Frequency,
}

impl PeriodCalculator {
    pub fn new(frequency: Frequency) -> Self {
        Self { frequency }
    }

    /// period containing the anchor date
    pub fn period_for(&self, anchor: NaiveDate) -> Result<Period> {
        let (start, end) = match self.frequency.months() {
            None => {
                let offset = anchor.weekday().num_days_from_monday() as u64;
                let start = anchor
                    .checked_sub_days(Days::new(offset))
                    .ok_or_else(|| out_of_range("week start", anchor))?;
                let end = start
                    .checked_add_days(Days::new(6))
                    .ok_or_else(|| out_of_range("week end", anchor))?;
                (start, end)
            }
            Some(months) => {
                let first_month0 = anchor.month0() - anchor.month0() % months;
                let start = NaiveDate::from_ymd_opt(anchor.year(), first_month0 + 1, 1)
                    .ok_or_else(|| out_of_range("period start", anchor))?;
                let end = start
                    .checked_add_months(Months::new(months))
                    .and_then(|next| next.pred_opt())
                    .ok_or_else(|| out_of_range("period end", anchor))?;
                (start, end)
            }
        };

        // the exclusive end instant must exist as well
        if end.succ_opt().is_none() {
            return Err(out_of_range("period end", anchor));
        }

        Ok(Period {
            frequency: self.frequency,
            start,
            end,
        })
    }

    /// adjacent period, moving the anchor by one calendar unit
    pub fn shift(&self, period: &Period, direction: Direction) -> Result<Period> {
        let anchor = period.start;
        let moved = match (self.frequency.months(), direction) {
            (None, Direction::Next) => anchor.checked_add_days(Days::new(7)),
            (None, Direction::Prev) => anchor.checked_sub_days(Days::new(7)),
            (Some(months), Direction::Next) => anchor.checked_add_months(Months::new(months)),
            (Some(months), Direction::Prev) => anchor.checked_sub_months(Months::new(months)),
        }
        .ok_or_else(|| out_of_range("shifted anchor", anchor))?;

        self.period_for(moved)
    }

    /// period containing the instant
    pub fn containing(&self, instant: &DateTime<Utc>) -> Result<Period> {
        self.period_for(instant.date_naive())
    }

    /// the `count` most recent periods up to `as_of`, newest first
    pub fn history(&self, as_of: &DateTime<Utc>, count: usize) -> Result<Vec<Period>> {
        let mut periods = Vec::with_capacity(count);
        if count == 0 {
            return Ok(periods);
        }

        let mut period = self.containing(as_of)?;
        periods.push(period);
        while periods.len() < count {
            period = self.shift(&period, Direction::Prev)?;
            periods.push(period);
        }
        Ok(periods)
    }
}

/// period of `frequency` containing `anchor`
pub fn period_for(frequency: Frequency, anchor: NaiveDate) -> Result<Period> {
    PeriodCalculator::new(frequency).period_for(anchor)
}

/// period adjacent to `period` in `direction`
pub fn shift(period: &Period, frequency: Frequency, direction: Direction) -> Result<Period> {
    PeriodCalculator::new(frequency).shift(period, direction)
}

/// period containing `as_of`
pub fn current_period(frequency: Frequency, as_of: &DateTime<Utc>) -> Result<Period> {
    PeriodCalculator::new(frequency).containing(as_of)
}

/// period right before the one containing `as_of`
pub fn previous_period(frequency: Frequency, as_of: &DateTime<Utc>) -> Result<Period> {
    let calculator = PeriodCalculator::new(frequency);
    let current = calculator.containing(as_of)?;
    calculator.shift(&current, Direction::Prev)
}

/// the `count` most recent periods up to `as_of`, newest first
pub fn history(frequency: Frequency, as_of: &DateTime<Utc>, count: usize) -> Result<Vec<Period>> {
    PeriodCalculator::new(frequency).history(as_of, count)
}

fn out_of_range(what: &str, anchor: NaiveDate) -> TrackerError {
    TrackerError::InvalidDate {
        message: format!("{what} out of range for anchor {anchor}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Weekday};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_monthly_leap_february() {
        let period = period_for(Frequency::Monthly, date(2024, 2, 15)).unwrap();
        assert_eq!(period.start, date(2024, 2, 1));
        assert_eq!(period.end, date(2024, 2, 29));

        let period = period_for(Frequency::Monthly, date(2023, 2, 15)).unwrap();
        assert_eq!(period.end, date(2023, 2, 28));
    }

    #[test]
    fn test_quarterly_bounds() {
        let q1 = period_for(Frequency::Quarterly, date(2024, 1, 10)).unwrap();
        assert_eq!(q1.start, date(2024, 1, 1));
        assert_eq!(q1.end, date(2024, 3, 31));

        let q3 = period_for(Frequency::Quarterly, date(2024, 9, 30)).unwrap();
        assert_eq!(q3.start, date(2024, 7, 1));
        assert_eq!(q3.end, date(2024, 9, 30));

        let q4 = period_for(Frequency::Quarterly, date(2024, 11, 5)).unwrap();
        assert_eq!(q4.start, date(2024, 10, 1));
        assert_eq!(q4.end, date(2024, 12, 31));
    }

    #[test]
    fn test_weekly_starts_on_monday() {
        // wednesday
        let period = period_for(Frequency::Weekly, date(2024, 3, 6)).unwrap();
        assert_eq!(period.start, date(2024, 3, 4));
        assert_eq!(period.end, date(2024, 3, 10));
        assert_eq!(period.start.weekday(), Weekday::Mon);
        assert_eq!(period.end.weekday(), Weekday::Sun);

        // sunday belongs to the week that started six days earlier
        let period = period_for(Frequency::Weekly, date(2024, 3, 10)).unwrap();
        assert_eq!(period.start, date(2024, 3, 4));

        // iso week spanning new year
        let period = period_for(Frequency::Weekly, date(2025, 1, 1)).unwrap();
        assert_eq!(period.start, date(2024, 12, 30));
        assert_eq!(period.end, date(2025, 1, 5));
    }

    #[test]
    fn test_yearly_bounds() {
        let period = period_for(Frequency::Yearly, date(2024, 7, 19)).unwrap();
        assert_eq!(period.start, date(2024, 1, 1));
        assert_eq!(period.end, date(2024, 12, 31));
        assert_eq!(period.days(), 366);
    }

    #[test]
    fn test_shift_rolls_over_year() {
        let january = period_for(Frequency::Monthly, date(2024, 1, 20)).unwrap();
        let december = shift(&january, Frequency::Monthly, Direction::Prev).unwrap();
        assert_eq!(december.start, date(2023, 12, 1));
        assert_eq!(december.end, date(2023, 12, 31));

        let q4 = period_for(Frequency::Quarterly, date(2023, 12, 1)).unwrap();
        let q1 = shift(&q4, Frequency::Quarterly, Direction::Next).unwrap();
        assert_eq!(q1.start, date(2024, 1, 1));
        assert_eq!(q1.end, date(2024, 3, 31));

        let week = period_for(Frequency::Weekly, date(2024, 12, 31)).unwrap();
        let next_week = shift(&week, Frequency::Weekly, Direction::Next).unwrap();
        assert_eq!(next_week.start, date(2025, 1, 6));
    }

    #[test]
    fn test_shift_handles_month_lengths() {
        let january = period_for(Frequency::Monthly, date(2024, 1, 31)).unwrap();
        let february = shift(&january, Frequency::Monthly, Direction::Next).unwrap();
        assert_eq!(february.start, date(2024, 2, 1));
        assert_eq!(february.end, date(2024, 2, 29));

        let march = shift(&february, Frequency::Monthly, Direction::Next).unwrap();
        assert_eq!(march.end, date(2024, 3, 31));
    }

    #[test]
    fn test_shift_round_trip_for_all_frequencies() {
        let mut anchor = date(2023, 1, 1);
        while anchor <= date(2025, 12, 31) {
            for frequency in Frequency::ALL {
                let period = period_for(frequency, anchor).unwrap();
                let next = shift(&period, frequency, Direction::Next).unwrap();
                let back = shift(&next, frequency, Direction::Prev).unwrap();
                assert_eq!(back, period, "{frequency} anchored at {anchor}");

                // adjacent periods are contiguous
                assert_eq!(next.start, period.end.succ_opt().unwrap());
            }
            anchor = anchor.checked_add_days(Days::new(5)).unwrap();
        }
    }

    #[test]
    fn test_current_and_previous() {
        let as_of = Utc.with_ymd_and_hms(2024, 1, 15, 18, 30, 0).unwrap();

        let current = current_period(Frequency::Monthly, &as_of).unwrap();
        assert_eq!(current.start, date(2024, 1, 1));
        assert!(current.is_current(&as_of));

        let previous = previous_period(Frequency::Monthly, &as_of).unwrap();
        assert_eq!(previous.start, date(2023, 12, 1));
        assert!(!previous.is_current(&as_of));

        let previous_year = previous_period(Frequency::Yearly, &as_of).unwrap();
        assert_eq!(previous_year.start, date(2023, 1, 1));
    }

    #[test]
    fn test_history_newest_first() {
        let as_of = Utc.with_ymd_and_hms(2024, 5, 2, 0, 0, 0).unwrap();
        let periods = history(Frequency::Quarterly, &as_of, 3).unwrap();

        let starts: Vec<_> = periods.iter().map(|p| p.start).collect();
        assert_eq!(starts, vec![date(2024, 4, 1), date(2024, 1, 1), date(2023, 10, 1)]);
        assert!(history(Frequency::Weekly, &as_of, 0).unwrap().is_empty());
    }

    #[test]
    fn test_out_of_range_anchor() {
        let result = period_for(Frequency::Yearly, NaiveDate::MAX);
        assert!(matches!(result, Err(TrackerError::InvalidDate { .. })));
    }
}
