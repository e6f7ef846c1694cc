use almanac_core::{
    decide, ensure_schedule, is_workday, nearest_upcoming_in_calendar,
    nearest_upcoming_in_schedule, today_special_date, upcoming_special_dates, CalendarSnapshot,
    Decision, JsonFileStore, MemoryStore, MonthlySchedule, Period, SpecialKind,
    SubstringContainment,
};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Serialize;

use crate::config::Config;

/// What content generation receives when a notice fires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Handoff {
    pub kind: SpecialKind,
    pub name: String,
    pub original_date: NaiveDate,
    /// None when the fallback came straight from the calendar.
    pub send_date: Option<NaiveDate>,
    pub forced: bool,
}

/// Scheduled trigger for `today`, or with `force` the nearest upcoming special
/// date (schedule first, then the raw calendar).
pub fn resolve(
    today: NaiveDate,
    schedule: &MonthlySchedule,
    snapshot: &CalendarSnapshot,
    force: bool,
    horizon_days: u32,
) -> Option<Handoff> {
    if let Decision::Fire(e) = decide(today, schedule) {
        return Some(Handoff {
            kind: e.kind,
            name: e.name,
            original_date: e.original_date,
            send_date: Some(e.send_date),
            forced: false,
        });
    }
    if !force {
        return None;
    }

    tracing::info!("force mode: looking for the nearest special date");
    if let Some(e) = nearest_upcoming_in_schedule(today, schedule) {
        return Some(Handoff {
            kind: e.kind,
            name: e.name.clone(),
            original_date: e.original_date,
            send_date: Some(e.send_date),
            forced: true,
        });
    }
    nearest_upcoming_in_calendar(today, snapshot, horizon_days).map(|e| Handoff {
        kind: e.kind,
        name: e.name,
        original_date: e.date,
        send_date: None,
        forced: true,
    })
}

fn load_snapshot(cfg: &Config, period: Period) -> Result<CalendarSnapshot> {
    let dir = cfg.data_dir()?;
    almanac_ingest::load_for_period(&dir, period, cfg.policy().carry_days)
        .with_context(|| format!("load calendar for {period} from {}", dir.display()))
}

fn schedule_for(
    cfg: &Config,
    snapshot: &CalendarSnapshot,
    period: Period,
    regenerate: bool,
    on_demand: bool,
) -> Result<MonthlySchedule> {
    let policy = cfg.policy();
    if on_demand {
        // Fresh in-process store: always plans, never touches the schedule file.
        let mut store = MemoryStore::new();
        return ensure_schedule(&mut store, snapshot, period, &policy, &SubstringContainment, true)
            .context("plan schedule in memory");
    }
    let mut store = JsonFileStore::new(cfg.store_path()?);
    ensure_schedule(&mut store, snapshot, period, &policy, &SubstringContainment, regenerate)
        .with_context(|| format!("schedule store {}", store.path().display()))
}

pub fn run_check(
    cfg: &Config,
    today: NaiveDate,
    force: bool,
    regenerate: bool,
    on_demand: bool,
) -> Result<()> {
    let period = Period::containing(today);
    let snapshot = load_snapshot(cfg, period)?;
    let schedule = schedule_for(cfg, &snapshot, period, regenerate, on_demand)?;

    if let Some(special) = today_special_date(today, &snapshot) {
        tracing::debug!(
            kind = %special.kind,
            name = %special.name,
            "today is itself a special date"
        );
    }

    match resolve(today, &schedule, &snapshot, force, cfg.schedule.force_horizon_days) {
        Some(handoff) => {
            tracing::info!(
                name = %handoff.name,
                original = %handoff.original_date,
                forced = handoff.forced,
                "notice fires today"
            );
            println!("{}", serde_json::to_string(&handoff)?);
        }
        None => {
            tracing::info!(%today, "not a send day");
            println!("no notice today ({today})");
        }
    }

    Ok(())
}

pub fn run_schedule(cfg: &Config, period: Period, regenerate: bool) -> Result<()> {
    let snapshot = load_snapshot(cfg, period)?;
    let schedule = schedule_for(cfg, &snapshot, period, regenerate, false)?;

    println!("# Schedule {}\n", schedule.period_id);
    if schedule.is_empty() {
        println!("(no special dates)");
    }
    for e in schedule.iter() {
        println!(
            "{} | {:<10} | {} (on {})",
            e.send_date, e.kind.as_str(), e.name, e.original_date
        );
    }
    Ok(())
}

pub fn run_workday(cfg: &Config, date: NaiveDate) -> Result<()> {
    let snapshot = load_snapshot(cfg, Period::containing(date))?;
    let verdict = if is_workday(date, &snapshot) { "workday" } else { "day off" };
    println!("{date} ({}) is a {verdict}", date.format("%a"));
    Ok(())
}

pub fn run_upcoming(cfg: &Config, today: NaiveDate, days: u32) -> Result<()> {
    let snapshot = load_snapshot(cfg, Period::containing(today))?;
    let upcoming = upcoming_special_dates(today, &snapshot, days);

    println!("Special dates after {today} (next {days} days):\n");
    if upcoming.is_empty() {
        println!("(none)");
    }
    for e in &upcoming {
        println!("- {} | {:<10} | {}", e.date, e.kind.as_str(), e.name);
    }
    Ok(())
}
