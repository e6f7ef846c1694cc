use almanac_core::PlacementPolicy;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::state::{default_data_dir, default_store_path, ensure_almanac_home};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub calendar: CalendarSection,
    #[serde(default)]
    pub schedule: ScheduleSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarSection {
    /// Directory with holiday_<year>.json and jieqi_<year>.json.
    /// Empty means ~/.almanac/data.
    pub data_dir: String,
    /// IANA timezone used to decide what "today" is.
    pub timezone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleSection {
    /// Persisted schedule file. Empty means ~/.almanac/schedule.json.
    pub store_path: String,
    pub carry_days: u32,
    pub max_backtrack_days: u32,
    /// How far `check --force` looks ahead when the schedule has nothing left.
    pub force_horizon_days: u32,
}

impl Default for CalendarSection {
    fn default() -> Self {
        Self {
            data_dir: String::new(),
            timezone: "Asia/Shanghai".to_string(),
        }
    }
}

impl Default for ScheduleSection {
    fn default() -> Self {
        let policy = PlacementPolicy::default();
        Self {
            store_path: String::new(),
            carry_days: policy.carry_days,
            max_backtrack_days: policy.max_backtrack_days,
            force_horizon_days: 30,
        }
    }
}

impl Config {
    /// Placement policy with the carry window widened to the backtrack cap.
    pub fn policy(&self) -> PlacementPolicy {
        PlacementPolicy::new(self.schedule.carry_days, self.schedule.max_backtrack_days)
    }

    pub fn data_dir(&self) -> Result<PathBuf> {
        if self.calendar.data_dir.trim().is_empty() {
            default_data_dir()
        } else {
            Ok(PathBuf::from(&self.calendar.data_dir))
        }
    }

    pub fn store_path(&self) -> Result<PathBuf> {
        if self.schedule.store_path.trim().is_empty() {
            default_store_path()
        } else {
            Ok(PathBuf::from(&self.schedule.store_path))
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_almanac_home()?.join("config.toml"))
}

/// Load `path` (or the default location); a missing file means defaults.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let p = match path {
        Some(p) => p.to_path_buf(),
        None => config_path()?,
    };
    if !p.exists() {
        tracing::debug!(path = %p.display(), "no config file, using defaults");
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn save_config(cfg: &Config, path: &Path) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn init_config(path: Option<&Path>) -> Result<()> {
    let p = match path {
        Some(p) => p.to_path_buf(),
        None => config_path()?,
    };
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default(), &p)?;
    println!("Wrote {}", p.display());
    Ok(())
}
