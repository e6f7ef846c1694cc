//! Normalized, immutable view of one year's holiday ranges and solar terms.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::CalendarError;

/// A contiguous inclusive span of non-working days.
///
/// `compensatory_workdays` are the dates the feed lists as make-up workdays for
/// this observance. Feeds usually place them on weekends around the range, so
/// they are not required to fall inside `[start, end]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidayRange {
    pub name: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    #[serde(default)]
    pub compensatory_workdays: BTreeSet<NaiveDate>,
}

impl HolidayRange {
    pub fn new(name: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            name: name.into(),
            start,
            end,
            compensatory_workdays: BTreeSet::new(),
        }
    }

    pub fn with_workdays(mut self, days: impl IntoIterator<Item = NaiveDate>) -> Self {
        self.compensatory_workdays.extend(days);
        self
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolarTerm {
    pub name: String,
    pub date: NaiveDate,
}

impl SolarTerm {
    pub fn new(name: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            name: name.into(),
            date,
        }
    }
}

/// One year of calendar facts. Built once, never patched.
///
/// Deserialization runs the same checks as [`CalendarSnapshot::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSnapshot")]
pub struct CalendarSnapshot {
    year: i32,
    holidays: Vec<HolidayRange>,
    solar_terms: Vec<SolarTerm>,
}

#[derive(Deserialize)]
struct RawSnapshot {
    year: i32,
    #[serde(default)]
    holidays: Vec<HolidayRange>,
    #[serde(default)]
    solar_terms: Vec<SolarTerm>,
}

impl TryFrom<RawSnapshot> for CalendarSnapshot {
    type Error = CalendarError;

    fn try_from(raw: RawSnapshot) -> Result<Self, Self::Error> {
        Self::new(raw.year, raw.holidays, raw.solar_terms)
    }
}

impl CalendarSnapshot {
    /// Validate and freeze a year's feed.
    pub fn new(
        year: i32,
        holidays: Vec<HolidayRange>,
        solar_terms: Vec<SolarTerm>,
    ) -> Result<Self, CalendarError> {
        for h in &holidays {
            if h.start > h.end {
                return Err(CalendarError::InvertedRange {
                    name: h.name.clone(),
                    start: h.start,
                    end: h.end,
                });
            }
            if h.name.trim().is_empty() {
                return Err(CalendarError::UnnamedHoliday { start: h.start });
            }
        }
        for t in &solar_terms {
            if t.name.trim().is_empty() {
                return Err(CalendarError::UnnamedSolarTerm { date: t.date });
            }
        }

        Ok(Self {
            year,
            holidays,
            solar_terms,
        })
    }

    /// A year with no holidays or solar terms: only the weekend rule applies.
    pub fn empty(year: i32) -> Self {
        Self {
            year,
            holidays: Vec::new(),
            solar_terms: Vec::new(),
        }
    }

    /// New snapshot with `next`'s facts appended after this year's, so a
    /// December period can see January through its carry window.
    pub fn with_following(&self, next: &CalendarSnapshot) -> Result<Self, CalendarError> {
        let expected = self
            .year
            .checked_add(1)
            .ok_or(CalendarError::NoFollowingYear(self.year))?;
        if next.year != expected {
            return Err(CalendarError::YearMismatch {
                expected,
                found: next.year,
            });
        }

        let mut holidays = self.holidays.clone();
        holidays.extend(next.holidays.iter().cloned());
        let mut solar_terms = self.solar_terms.clone();
        solar_terms.extend(next.solar_terms.iter().cloned());

        Ok(Self {
            year: self.year,
            holidays,
            solar_terms,
        })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn holidays(&self) -> &[HolidayRange] {
        &self.holidays
    }

    pub fn solar_terms(&self) -> &[SolarTerm] {
        &self.solar_terms
    }

    /// First range (in feed order) containing `date`.
    pub fn holiday_on(&self, date: NaiveDate) -> Option<&HolidayRange> {
        self.holidays.iter().find(|h| h.contains(date))
    }

    pub fn solar_term_on(&self, date: NaiveDate) -> Option<&SolarTerm> {
        self.solar_terms.iter().find(|t| t.date == date)
    }

    /// Whether any range lists `date` as a make-up workday.
    pub fn is_compensatory_workday(&self, date: NaiveDate) -> bool {
        self.holidays
            .iter()
            .any(|h| h.compensatory_workdays.contains(&date))
    }
}
