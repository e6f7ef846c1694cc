//! Persistence for computed schedules, keyed by period id.
//!
//! A stored schedule is a cache: `load` reports absence both when nothing is
//! stored and when the stored period differs from the requested one.

use std::fs;
use std::path::{Path, PathBuf};

use crate::calendar::CalendarSnapshot;
use crate::error::StoreError;
use crate::period::Period;
use crate::placer::{plan_period, MonthlySchedule, NameSimilarity, PlacementPolicy};

pub trait ScheduleStore {
    fn load(&self, period_id: &str) -> Result<Option<MonthlySchedule>, StoreError>;
    fn save(&mut self, schedule: &MonthlySchedule) -> Result<(), StoreError>;
}

/// Single-slot in-process store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slot: Option<MonthlySchedule>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScheduleStore for MemoryStore {
    fn load(&self, period_id: &str) -> Result<Option<MonthlySchedule>, StoreError> {
        Ok(self
            .slot
            .as_ref()
            .filter(|s| s.period_id == period_id)
            .cloned())
    }

    fn save(&mut self, schedule: &MonthlySchedule) -> Result<(), StoreError> {
        self.slot = Some(schedule.clone());
        Ok(())
    }
}

/// One pretty-printed JSON document holding the latest schedule.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScheduleStore for JsonFileStore {
    fn load(&self, period_id: &str) -> Result<Option<MonthlySchedule>, StoreError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let s = fs::read_to_string(&self.path)?;
        let schedule: MonthlySchedule = serde_json::from_str(&s)?;
        if schedule.period_id != period_id {
            tracing::warn!(
                stored = %schedule.period_id,
                requested = %period_id,
                "stored schedule is stale"
            );
            return Ok(None);
        }
        Ok(Some(schedule))
    }

    fn save(&mut self, schedule: &MonthlySchedule) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(schedule)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

/// Load the schedule for `period`, regenerating and saving it when absent,
/// stale, or `force` is set.
pub fn ensure_schedule<S: ScheduleStore + ?Sized>(
    store: &mut S,
    snapshot: &CalendarSnapshot,
    period: Period,
    policy: &PlacementPolicy,
    similarity: &dyn NameSimilarity,
    force: bool,
) -> Result<MonthlySchedule, StoreError> {
    let period_id = period.id();

    if !force {
        if let Some(existing) = store.load(&period_id)? {
            tracing::debug!(period = %period_id, entries = existing.len(), "using stored schedule");
            return Ok(existing);
        }
    }

    let schedule = plan_period(snapshot, period, policy, similarity);
    tracing::info!(
        period = %period_id,
        entries = schedule.len(),
        forced = force,
        "regenerated schedule"
    );
    store.save(&schedule)?;
    Ok(schedule)
}
