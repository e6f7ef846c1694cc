//! Daily trigger decision and the explicit force-mode fallbacks.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::calendar::CalendarSnapshot;
use crate::collector::{collect, SpecialDateEntry, SpecialKind};
use crate::placer::{MonthlySchedule, ScheduleEntry};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    Fire(ScheduleEntry),
    Skip,
}

impl Decision {
    pub fn fire(&self) -> bool {
        matches!(self, Decision::Fire(_))
    }

    pub fn entry(&self) -> Option<&ScheduleEntry> {
        match self {
            Decision::Fire(e) => Some(e),
            Decision::Skip => None,
        }
    }

    pub fn kind(&self) -> Option<SpecialKind> {
        self.entry().map(|e| e.kind)
    }

    pub fn name(&self) -> Option<&str> {
        self.entry().map(|e| e.name.as_str())
    }

    pub fn original_date(&self) -> Option<NaiveDate> {
        self.entry().map(|e| e.original_date)
    }
}

/// Pure lookup: fire with the first entry scheduled for `today`, if any.
pub fn decide(today: NaiveDate, schedule: &MonthlySchedule) -> Decision {
    match schedule.entries_on(today).first() {
        Some(e) => Decision::Fire(e.clone()),
        None => Decision::Skip,
    }
}

/// Special date falling on `today` itself. Holiday membership wins over a
/// solar term on the same day.
pub fn today_special_date(
    today: NaiveDate,
    snapshot: &CalendarSnapshot,
) -> Option<SpecialDateEntry> {
    if let Some(h) = snapshot.holiday_on(today) {
        return Some(SpecialDateEntry {
            date: today,
            kind: SpecialKind::Holiday,
            name: h.name.clone(),
        });
    }
    snapshot.solar_term_on(today).map(|t| SpecialDateEntry {
        date: today,
        kind: SpecialKind::SolarTerm,
        name: t.name.clone(),
    })
}

/// Holidays starting and solar terms falling in `(today, today + days]`,
/// sorted by date.
pub fn upcoming_special_dates(
    today: NaiveDate,
    snapshot: &CalendarSnapshot,
    days: u32,
) -> Vec<SpecialDateEntry> {
    let horizon = today
        .checked_add_days(Days::new(u64::from(days)))
        .unwrap_or(today);
    let in_window = |d: NaiveDate| today < d && d <= horizon;

    let mut out: Vec<SpecialDateEntry> = snapshot
        .holidays()
        .iter()
        .filter(|h| in_window(h.start))
        .map(|h| SpecialDateEntry {
            date: h.start,
            kind: SpecialKind::Holiday,
            name: h.name.clone(),
        })
        .collect();

    out.extend(
        snapshot
            .solar_terms()
            .iter()
            .filter(|t| in_window(t.date))
            .map(|t| SpecialDateEntry {
                date: t.date,
                kind: SpecialKind::SolarTerm,
                name: t.name.clone(),
            }),
    );

    // stable: holidays stay ahead of terms on the same date
    out.sort_by_key(|e| e.date);
    out
}

/// Force-mode fallback over a schedule: the entry with the nearest original
/// date on or after `today`.
pub fn nearest_upcoming_in_schedule(
    today: NaiveDate,
    schedule: &MonthlySchedule,
) -> Option<&ScheduleEntry> {
    schedule
        .iter()
        .filter(|e| e.original_date >= today)
        .min_by_key(|e| e.original_date)
}

/// Force-mode fallback over the raw calendar, scanning `horizon_days` ahead.
pub fn nearest_upcoming_in_calendar(
    today: NaiveDate,
    snapshot: &CalendarSnapshot,
    horizon_days: u32,
) -> Option<SpecialDateEntry> {
    collect(snapshot, today, today, horizon_days).into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{HolidayRange, SolarTerm};
    use crate::period::Period;
    use crate::placer::{plan_period, PlacementPolicy, SubstringContainment};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn snapshot() -> CalendarSnapshot {
        CalendarSnapshot::new(
            2024,
            vec![HolidayRange::new("National Day", d(2024, 10, 1), d(2024, 10, 7))
                .with_workdays([d(2024, 9, 29), d(2024, 10, 12)])],
            vec![
                SolarTerm::new("寒露", d(2024, 10, 8)),
                SolarTerm::new("霜降", d(2024, 10, 23)),
            ],
        )
        .unwrap()
    }

    #[test]
    fn fires_with_first_entry_in_bucket() {
        let mut s = MonthlySchedule::new("2024-10");
        let first = ScheduleEntry {
            send_date: d(2024, 10, 8),
            kind: SpecialKind::SolarTerm,
            name: "寒露".to_string(),
            original_date: d(2024, 10, 8),
        };
        let second = ScheduleEntry {
            name: "Other".to_string(),
            ..first.clone()
        };
        s.entries.insert(d(2024, 10, 8), vec![first.clone(), second]);

        let decision = decide(d(2024, 10, 8), &s);
        assert!(decision.fire());
        assert_eq!(decision.entry(), Some(&first));
        assert_eq!(decision.kind(), Some(SpecialKind::SolarTerm));

        let idle = decide(d(2024, 10, 9), &s);
        assert!(!idle.fire());
        assert_eq!(idle.name(), None);
        assert_eq!(idle.original_date(), None);
    }

    #[test]
    fn holiday_wins_over_term_on_same_day() {
        let snap = CalendarSnapshot::new(
            2024,
            vec![HolidayRange::new("清明节", d(2024, 4, 4), d(2024, 4, 6))],
            vec![SolarTerm::new("清明", d(2024, 4, 4))],
        )
        .unwrap();
        let today = today_special_date(d(2024, 4, 4), &snap).unwrap();
        assert_eq!(today.kind, SpecialKind::Holiday);
        assert_eq!(today.name, "清明节");
        assert!(today_special_date(d(2024, 4, 8), &snap).is_none());
    }

    #[test]
    fn upcoming_uses_half_open_window() {
        let snap = snapshot();
        let up = upcoming_special_dates(d(2024, 9, 30), &snap, 8);
        let names: Vec<&str> = up.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["National Day", "寒露"]);

        // the range already started, so it is not "upcoming"
        let up = upcoming_special_dates(d(2024, 10, 1), &snap, 30);
        let names: Vec<&str> = up.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["寒露", "霜降"]);
    }

    #[test]
    fn nearest_upcoming_fallbacks() {
        let snap = snapshot();
        let period = Period::parse("2024-10").unwrap();
        let s = plan_period(&snap, period, &PlacementPolicy::default(), &SubstringContainment);

        let next = nearest_upcoming_in_schedule(d(2024, 10, 9), &s).unwrap();
        assert_eq!(next.name, "霜降");
        assert!(nearest_upcoming_in_schedule(d(2024, 10, 24), &s).is_none());

        let raw = nearest_upcoming_in_calendar(d(2024, 10, 9), &snap, 30).unwrap();
        assert_eq!(raw.date, d(2024, 10, 23));
        assert!(nearest_upcoming_in_calendar(d(2024, 10, 9), &snap, 5).is_none());
    }
}
