//! Schedule placement: map each special date to the workday its notice fires on.
//!
//! Rules, per entry:
//! - outside the period (carry window): last workday on or before period end
//! - in period and a workday: the date itself
//! - in period and off: nearest earlier workday within `max_backtrack_days`,
//!   otherwise the entry is dropped
//!
//! Entries landing on the same send date are de-duplicated by name through a
//! [`NameSimilarity`] predicate.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar::CalendarSnapshot;
use crate::collector::{collect, SpecialDateEntry, SpecialKind};
use crate::period::Period;
use crate::workday::{is_workday, last_workday_on_or_before, previous_workday};

/// Invariant: `carry_days >= max_backtrack_days`. A backward search that
/// leaves the period can reach at most `max_backtrack_days` into the previous
/// one, so the previous period's carry window must see that far ahead or the
/// notice fires from no schedule at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementPolicy {
    /// Days past period end scanned for next-period special dates.
    pub carry_days: u32,
    /// Backward search cap for in-period non-workdays.
    pub max_backtrack_days: u32,
}

impl PlacementPolicy {
    /// Build a policy, widening `carry_days` up to `max_backtrack_days`.
    pub fn new(carry_days: u32, max_backtrack_days: u32) -> Self {
        Self {
            carry_days,
            max_backtrack_days,
        }
        .normalized()
    }

    /// Carry window actually scanned.
    pub fn effective_carry_days(&self) -> u32 {
        self.carry_days.max(self.max_backtrack_days)
    }

    pub fn normalized(self) -> Self {
        if self.carry_days < self.max_backtrack_days {
            tracing::warn!(
                carry_days = self.carry_days,
                max_backtrack_days = self.max_backtrack_days,
                "carry window shorter than backtrack cap; widening it"
            );
        }
        Self {
            carry_days: self.effective_carry_days(),
            max_backtrack_days: self.max_backtrack_days,
        }
    }
}

impl Default for PlacementPolicy {
    fn default() -> Self {
        Self {
            carry_days: 10,
            max_backtrack_days: 10,
        }
    }
}

/// Decides whether two names on the same send date refer to the same observance.
pub trait NameSimilarity {
    fn is_duplicate(&self, existing: &str, candidate: &str) -> bool;
}

/// Either name contains the other (case-sensitive).
#[derive(Debug, Clone, Copy, Default)]
pub struct SubstringContainment;

impl NameSimilarity for SubstringContainment {
    fn is_duplicate(&self, existing: &str, candidate: &str) -> bool {
        existing.contains(candidate) || candidate.contains(existing)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ExactName;

impl NameSimilarity for ExactName {
    fn is_duplicate(&self, existing: &str, candidate: &str) -> bool {
        existing == candidate
    }
}

impl<F> NameSimilarity for F
where
    F: Fn(&str, &str) -> bool,
{
    fn is_duplicate(&self, existing: &str, candidate: &str) -> bool {
        self(existing, candidate)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub send_date: NaiveDate,
    pub kind: SpecialKind,
    pub name: String,
    pub original_date: NaiveDate,
}

/// Derived, cacheable schedule for one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlySchedule {
    pub period_id: String,
    /// Buckets keyed by send date; insertion order within a bucket.
    pub entries: BTreeMap<NaiveDate, Vec<ScheduleEntry>>,
}

impl MonthlySchedule {
    pub fn new(period_id: impl Into<String>) -> Self {
        Self {
            period_id: period_id.into(),
            entries: BTreeMap::new(),
        }
    }

    pub fn entries_on(&self, date: NaiveDate) -> &[ScheduleEntry] {
        self.entries.get(&date).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All entries, by send date then insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &ScheduleEntry> {
        self.entries.values().flatten()
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.values().all(Vec::is_empty)
    }

    /// Insert unless a similar name already sits in the same bucket.
    /// Returns whether the entry was kept.
    fn insert_deduped(&mut self, entry: ScheduleEntry, similarity: &dyn NameSimilarity) -> bool {
        let bucket = self.entries.entry(entry.send_date).or_default();
        if bucket
            .iter()
            .any(|e| similarity.is_duplicate(&e.name, &entry.name))
        {
            return false;
        }
        bucket.push(entry);
        true
    }
}

/// Where an entry's notice fires, or `None` when no workday is reachable.
fn send_date_for(
    date: NaiveDate,
    period: Period,
    snapshot: &CalendarSnapshot,
    policy: &PlacementPolicy,
) -> Option<NaiveDate> {
    if !period.contains(date) {
        return last_workday_on_or_before(period.end(), period.start(), snapshot);
    }
    if is_workday(date, snapshot) {
        return Some(date);
    }
    previous_workday(date, policy.max_backtrack_days, snapshot)
}

/// Place collected entries into a schedule for `period`.
pub fn place(
    entries: &[SpecialDateEntry],
    period: Period,
    snapshot: &CalendarSnapshot,
    policy: &PlacementPolicy,
    similarity: &dyn NameSimilarity,
) -> MonthlySchedule {
    let mut schedule = MonthlySchedule::new(period.id());

    for e in entries {
        let Some(send_date) = send_date_for(e.date, period, snapshot, policy) else {
            tracing::debug!(
                date = %e.date,
                kind = %e.kind,
                name = %e.name,
                "no workday reachable, entry dropped"
            );
            continue;
        };

        let kept = schedule.insert_deduped(
            ScheduleEntry {
                send_date,
                kind: e.kind,
                name: e.name.clone(),
                original_date: e.date,
            },
            similarity,
        );
        if kept {
            tracing::debug!(date = %e.date, send = %send_date, name = %e.name, "placed");
        }
    }

    schedule
}

/// Collect and place in one step.
pub fn plan_period(
    snapshot: &CalendarSnapshot,
    period: Period,
    policy: &PlacementPolicy,
    similarity: &dyn NameSimilarity,
) -> MonthlySchedule {
    let entries = collect(
        snapshot,
        period.start(),
        period.end(),
        policy.effective_carry_days(),
    );
    place(&entries, period, snapshot, policy, similarity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{HolidayRange, SolarTerm};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn oct() -> Period {
        Period::parse("2024-10").unwrap()
    }

    fn entry(date: NaiveDate, kind: SpecialKind, name: &str) -> SpecialDateEntry {
        SpecialDateEntry {
            date,
            kind,
            name: name.to_string(),
        }
    }

    #[test]
    fn workday_term_fires_on_its_own_date() {
        let terms = vec![SolarTerm::new("寒露", d(2024, 10, 8))];
        let snap = CalendarSnapshot::new(2024, vec![], terms).unwrap();
        let s = plan_period(&snap, oct(), &PlacementPolicy::default(), &SubstringContainment);

        let on = s.entries_on(d(2024, 10, 8));
        assert_eq!(on.len(), 1);
        assert_eq!(on[0].send_date, on[0].original_date);
        assert_eq!(on[0].kind, SpecialKind::SolarTerm);
    }

    #[test]
    fn weekend_term_moves_to_friday() {
        // 2024-10-19 is a Saturday.
        let snap = CalendarSnapshot::empty(2024);
        let entries = [entry(d(2024, 10, 19), SpecialKind::SolarTerm, "X")];
        let s = place(&entries, oct(), &snap, &PlacementPolicy::default(), &SubstringContainment);

        assert_eq!(s.entries_on(d(2024, 10, 18))[0].original_date, d(2024, 10, 19));
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn carry_entry_lands_on_last_workday_of_period() {
        let snap = CalendarSnapshot::new(
            2024,
            vec![HolidayRange::new("Nov Break", d(2024, 11, 1), d(2024, 11, 3))],
            vec![],
        )
        .unwrap();
        let s = plan_period(&snap, oct(), &PlacementPolicy::default(), &SubstringContainment);

        // 2024-10-31 is a Thursday; all three holiday days collapse into one entry.
        let on = s.entries_on(d(2024, 10, 31));
        assert_eq!(on.len(), 1);
        assert_eq!(on[0].original_date, d(2024, 11, 1));
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn unreachable_workday_drops_entry() {
        let snap = CalendarSnapshot::new(
            2024,
            vec![HolidayRange::new("Long", d(2024, 10, 1), d(2024, 10, 20))],
            vec![SolarTerm::new("Mid", d(2024, 10, 15))],
        )
        .unwrap();
        let entries = [entry(d(2024, 10, 15), SpecialKind::SolarTerm, "Mid")];
        let s = place(&entries, oct(), &snap, &PlacementPolicy::default(), &SubstringContainment);
        assert!(s.is_empty());
    }

    #[test]
    fn substring_names_collapse_on_same_send_date() {
        let snap = CalendarSnapshot::empty(2024);
        let entries = [
            entry(d(2024, 10, 19), SpecialKind::Holiday, "National Day"),
            entry(d(2024, 10, 20), SpecialKind::Holiday, "National Day Holiday"),
            entry(d(2024, 10, 20), SpecialKind::SolarTerm, "霜降"),
        ];
        let s = place(&entries, oct(), &snap, &PlacementPolicy::default(), &SubstringContainment);

        let on = s.entries_on(d(2024, 10, 18));
        let names: Vec<&str> = on.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["National Day", "霜降"]);
    }

    #[test]
    fn exact_similarity_keeps_distinct_labels() {
        let snap = CalendarSnapshot::empty(2024);
        let entries = [
            entry(d(2024, 10, 19), SpecialKind::Holiday, "National Day"),
            entry(d(2024, 10, 20), SpecialKind::Holiday, "National Day Holiday"),
        ];
        let s = place(&entries, oct(), &snap, &PlacementPolicy::default(), &ExactName);
        assert_eq!(s.entries_on(d(2024, 10, 18)).len(), 2);

        let never = |_: &str, _: &str| false;
        let s = place(&entries, oct(), &snap, &PlacementPolicy::default(), &never);
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn backtrack_cap_is_configurable() {
        let snap = CalendarSnapshot::new(
            2024,
            vec![HolidayRange::new("Week", d(2024, 10, 14), d(2024, 10, 18))],
            vec![],
        )
        .unwrap();
        let entries = [entry(d(2024, 10, 18), SpecialKind::SolarTerm, "T")];

        let tight = PlacementPolicy {
            carry_days: 0,
            max_backtrack_days: 3,
        };
        assert!(place(&entries, oct(), &snap, &tight, &SubstringContainment).is_empty());

        let s = place(&entries, oct(), &snap, &PlacementPolicy::default(), &SubstringContainment);
        assert_eq!(s.entries_on(d(2024, 10, 11)).len(), 1);
    }

    #[test]
    fn backtrack_reaches_exactly_cap_days() {
        // 2024-10-25 is a Friday; the range makes 16..=25 non-working.
        let reachable = CalendarSnapshot::new(
            2024,
            vec![HolidayRange::new("Ten", d(2024, 10, 16), d(2024, 10, 25))],
            vec![],
        )
        .unwrap();
        let entries = [entry(d(2024, 10, 25), SpecialKind::SolarTerm, "T")];
        let policy = PlacementPolicy::default();

        let s = place(&entries, oct(), &reachable, &policy, &SubstringContainment);
        assert_eq!(s.entries_on(d(2024, 10, 15)).len(), 1, "workday at d-10 is kept");

        // One more day off pushes the nearest workday to d-11.
        let unreachable = CalendarSnapshot::new(
            2024,
            vec![HolidayRange::new("Eleven", d(2024, 10, 15), d(2024, 10, 25))],
            vec![],
        )
        .unwrap();
        let s = place(&entries, oct(), &unreachable, &policy, &SubstringContainment);
        assert!(s.is_empty(), "workday at d-11 is out of reach");
    }

    #[test]
    fn short_carry_is_widened_to_backtrack_cap() {
        let p = PlacementPolicy::new(3, 10);
        assert_eq!(p.carry_days, 10);
        assert_eq!(PlacementPolicy::new(14, 10).carry_days, 14);

        let raw = PlacementPolicy {
            carry_days: 3,
            max_backtrack_days: 10,
        };
        assert_eq!(raw.effective_carry_days(), 10);
        assert_eq!(raw.normalized(), p);
    }

    #[test]
    fn placement_is_deterministic() {
        let snap = CalendarSnapshot::new(
            2024,
            vec![HolidayRange::new("National Day", d(2024, 10, 1), d(2024, 10, 7))
                .with_workdays([d(2024, 9, 29), d(2024, 10, 12)])],
            vec![
                SolarTerm::new("寒露", d(2024, 10, 8)),
                SolarTerm::new("霜降", d(2024, 10, 23)),
                SolarTerm::new("立冬", d(2024, 11, 7)),
            ],
        )
        .unwrap();
        let policy = PlacementPolicy::default();

        let a = plan_period(&snap, oct(), &policy, &SubstringContainment);
        let b = plan_period(&snap, oct(), &policy, &SubstringContainment);
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }
}
