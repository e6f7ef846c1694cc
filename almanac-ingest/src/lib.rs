//! almanac-ingest: normalize already-fetched yearly calendar feeds into snapshots.

pub mod parsers;

use std::fs;
use std::path::{Path, PathBuf};

use almanac_core::{CalendarSnapshot, Period};
use anyhow::{Context, Result};
use chrono::{Datelike, Days};

pub use parsers::holiday_feed::parse_holiday_feed;
pub use parsers::jieqi_feed::{chinese_name, parse_jieqi_feed};

pub fn holiday_path(data_dir: &Path, year: i32) -> PathBuf {
    data_dir.join(format!("holiday_{year}.json"))
}

pub fn jieqi_path(data_dir: &Path, year: i32) -> PathBuf {
    data_dir.join(format!("jieqi_{year}.json"))
}

/// Build a snapshot from feed documents already in memory.
pub fn snapshot_from_feeds(
    year: i32,
    holiday_json: &str,
    jieqi_json: &str,
) -> Result<CalendarSnapshot> {
    let holidays = parse_holiday_feed(holiday_json)?;
    let terms = parse_jieqi_feed(jieqi_json)?;
    Ok(CalendarSnapshot::new(year, holidays, terms)?)
}

/// Read `holiday_<year>.json` and `jieqi_<year>.json` from `data_dir`.
pub fn load_year(data_dir: &Path, year: i32) -> Result<CalendarSnapshot> {
    let hp = holiday_path(data_dir, year);
    let jp = jieqi_path(data_dir, year);
    let holiday_json = fs::read_to_string(&hp).with_context(|| format!("read {}", hp.display()))?;
    let jieqi_json = fs::read_to_string(&jp).with_context(|| format!("read {}", jp.display()))?;

    let snap = snapshot_from_feeds(year, &holiday_json, &jieqi_json)
        .with_context(|| format!("calendar data for {year}"))?;
    tracing::debug!(
        year,
        holidays = snap.holidays().len(),
        solar_terms = snap.solar_terms().len(),
        "loaded calendar"
    );
    Ok(snap)
}

/// Snapshot covering `period` plus its carry window. When the window crosses
/// New Year the following year is appended if its files exist.
pub fn load_for_period(
    data_dir: &Path,
    period: Period,
    carry_days: u32,
) -> Result<CalendarSnapshot> {
    let snap = load_year(data_dir, period.year())?;

    let window_end = period
        .end()
        .checked_add_days(Days::new(u64::from(carry_days)))
        .unwrap_or(period.end());
    if window_end.year() == period.year() {
        return Ok(snap);
    }

    let Some(next_year) = period.year().checked_add(1) else {
        return Ok(snap);
    };
    if !holiday_path(data_dir, next_year).exists() || !jieqi_path(data_dir, next_year).exists() {
        tracing::warn!(
            year = next_year,
            "no calendar data for following year; carry window is partial"
        );
        return Ok(snap);
    }

    let next = load_year(data_dir, next_year)?;
    Ok(snap.with_following(&next)?)
}
