//! Scheduling period: one calendar month, identified as `YYYY-MM`.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::CalendarError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Period {
    year: i32,
    month: u32,
}

impl Period {
    pub fn new(year: i32, month: u32) -> Result<Self, CalendarError> {
        // Reject anything chrono can't represent as a first-of-month.
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(|_| Self { year, month })
            .ok_or_else(|| CalendarError::InvalidPeriod(format!("{year:04}-{month:02}")))
    }

    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Parse a period id like "2024-10".
    pub fn parse(id: &str) -> Result<Self, CalendarError> {
        let invalid = || CalendarError::InvalidPeriod(id.to_string());
        let (y, m) = id.trim().split_once('-').ok_or_else(invalid)?;
        if y.len() != 4 || m.len() != 2 {
            return Err(invalid());
        }
        let year: i32 = y.parse().map_err(|_| invalid())?;
        let month: u32 = m.parse().map_err(|_| invalid())?;
        Self::new(year, month).map_err(|_| invalid())
    }

    pub fn id(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn start(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// Last calendar day of the month.
    pub fn end(&self) -> NaiveDate {
        self.next()
            .start()
            .pred_opt()
            .unwrap_or(NaiveDate::MAX)
    }

    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start() <= date && date <= self.end()
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn bounds_are_leap_aware() {
        let feb = Period::parse("2024-02").unwrap();
        assert_eq!(feb.start(), d(2024, 2, 1));
        assert_eq!(feb.end(), d(2024, 2, 29));
        assert_eq!(Period::parse("2023-02").unwrap().end(), d(2023, 2, 28));
    }

    #[test]
    fn december_rolls_into_next_year() {
        let dec = Period::containing(d(2024, 12, 15));
        assert_eq!(dec.id(), "2024-12");
        assert_eq!(dec.end(), d(2024, 12, 31));
        assert_eq!(dec.next().id(), "2025-01");
    }

    #[test]
    fn rejects_malformed_ids() {
        for bad in ["2024-13", "2024-1", "24-10", "2024/10", "abcd-ef", ""] {
            assert!(Period::parse(bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn contains_is_inclusive() {
        let oct = Period::parse("2024-10").unwrap();
        assert!(oct.contains(d(2024, 10, 1)));
        assert!(oct.contains(d(2024, 10, 31)));
        assert!(!oct.contains(d(2024, 11, 1)));
        assert!(!oct.contains(d(2024, 9, 30)));
    }
}
