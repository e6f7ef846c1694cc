//! Workday oracle: weekend rule, overridden by holiday ranges and make-up days.

use chrono::{Datelike, NaiveDate, Weekday};

use crate::calendar::CalendarSnapshot;

/// Decide whether `date` is a working day.
///
/// Order of precedence:
/// 1. inside a holiday range: working only if listed as a compensatory day
/// 2. listed as a compensatory day by any range: working
/// 3. otherwise Monday..Friday
pub fn is_workday(date: NaiveDate, snapshot: &CalendarSnapshot) -> bool {
    if let Some(h) = snapshot.holiday_on(date) {
        return h.compensatory_workdays.contains(&date);
    }

    if snapshot.is_compensatory_workday(date) {
        return true;
    }

    !is_weekend(date)
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Walk backward from `date` (inclusive) to `floor` (inclusive) and return the
/// first workday.
pub fn last_workday_on_or_before(
    date: NaiveDate,
    floor: NaiveDate,
    snapshot: &CalendarSnapshot,
) -> Option<NaiveDate> {
    let mut cur = date;
    while cur >= floor {
        if is_workday(cur, snapshot) {
            return Some(cur);
        }
        cur = cur.pred_opt()?;
    }
    None
}

/// First workday strictly before `date`, trying at most `max_attempts` days.
pub fn previous_workday(
    date: NaiveDate,
    max_attempts: u32,
    snapshot: &CalendarSnapshot,
) -> Option<NaiveDate> {
    let mut cur = date;
    for _ in 0..max_attempts {
        cur = cur.pred_opt()?;
        if is_workday(cur, snapshot) {
            return Some(cur);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::HolidayRange;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn national_day_2024() -> CalendarSnapshot {
        CalendarSnapshot::new(
            2024,
            vec![
                HolidayRange::new("National Day", d(2024, 10, 1), d(2024, 10, 7))
                    .with_workdays([d(2024, 9, 29), d(2024, 10, 12)]),
            ],
            vec![],
        )
        .unwrap()
    }

    #[test]
    fn weekday_inside_range_is_off() {
        let snap = national_day_2024();
        // Thursday
        assert!(!is_workday(d(2024, 10, 3), &snap));
    }

    #[test]
    fn makeup_saturday_is_on() {
        let snap = national_day_2024();
        assert_eq!(d(2024, 10, 12).weekday(), Weekday::Sat);
        assert!(is_workday(d(2024, 10, 12), &snap));
        assert!(is_workday(d(2024, 9, 29), &snap));
    }

    #[test]
    fn plain_weekend_is_off_and_weekday_is_on() {
        let snap = CalendarSnapshot::empty(2024);
        assert!(!is_workday(d(2024, 10, 19), &snap));
        assert!(!is_workday(d(2024, 10, 20), &snap));
        assert!(is_workday(d(2024, 10, 21), &snap));
    }

    #[test]
    fn compensatory_day_inside_range_overrides_membership() {
        let snap = CalendarSnapshot::new(
            2024,
            vec![HolidayRange::new("Spring", d(2024, 2, 10), d(2024, 2, 20))
                .with_workdays([d(2024, 2, 14)])],
            vec![],
        )
        .unwrap();
        assert!(is_workday(d(2024, 2, 14), &snap));
        assert!(!is_workday(d(2024, 2, 15), &snap));
    }

    #[test]
    fn last_workday_respects_floor() {
        let snap = national_day_2024();
        assert_eq!(
            last_workday_on_or_before(d(2024, 10, 6), d(2024, 9, 1), &snap),
            Some(d(2024, 9, 30))
        );
        assert_eq!(
            last_workday_on_or_before(d(2024, 10, 6), d(2024, 10, 1), &snap),
            None
        );
    }

    #[test]
    fn previous_workday_is_capped() {
        let snap = national_day_2024();
        assert_eq!(previous_workday(d(2024, 10, 5), 10, &snap), Some(d(2024, 9, 30)));
        assert_eq!(previous_workday(d(2024, 10, 5), 4, &snap), None);
        assert_eq!(previous_workday(d(2024, 10, 5), 0, &snap), None);
    }

    #[test]
    fn cap_counts_the_last_attempt() {
        // Sep 30 is exactly five days before Oct 5.
        let snap = national_day_2024();
        assert_eq!(previous_workday(d(2024, 10, 5), 5, &snap), Some(d(2024, 9, 30)));
        assert_eq!(previous_workday(d(2024, 10, 5), 4, &snap), None);
    }
}
