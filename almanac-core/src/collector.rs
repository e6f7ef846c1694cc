//! Special-date scan over a window, including the carry look-ahead.

use std::fmt;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::calendar::CalendarSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialKind {
    Holiday,
    SolarTerm,
}

impl SpecialKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpecialKind::Holiday => "holiday",
            SpecialKind::SolarTerm => "solar_term",
        }
    }
}

impl fmt::Display for SpecialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw (date, kind, name) triple, consumed immediately by the placer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialDateEntry {
    pub date: NaiveDate,
    pub kind: SpecialKind,
    pub name: String,
}

/// Scan `[period_start, period_end + carry_days]` and emit every special date
/// in ascending date order. A date may produce both a holiday and a solar term.
pub fn collect(
    snapshot: &CalendarSnapshot,
    period_start: NaiveDate,
    period_end: NaiveDate,
    carry_days: u32,
) -> Vec<SpecialDateEntry> {
    let window_end = period_end
        .checked_add_days(Days::new(u64::from(carry_days)))
        .unwrap_or(period_end);

    let mut out = Vec::new();
    for date in period_start.iter_days().take_while(|d| *d <= window_end) {
        if let Some(h) = snapshot.holiday_on(date) {
            out.push(SpecialDateEntry {
                date,
                kind: SpecialKind::Holiday,
                name: h.name.clone(),
            });
        }
        if let Some(t) = snapshot.solar_term_on(date) {
            out.push(SpecialDateEntry {
                date,
                kind: SpecialKind::SolarTerm,
                name: t.name.clone(),
            });
        }
    }

    out
}
