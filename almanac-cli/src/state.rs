use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

pub fn almanac_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".almanac"))
}

pub fn ensure_almanac_home() -> Result<PathBuf> {
    let dir = almanac_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

/// Where yearly `holiday_<year>.json` / `jieqi_<year>.json` feeds are kept.
pub fn default_data_dir() -> Result<PathBuf> {
    Ok(almanac_home()?.join("data"))
}

pub fn default_store_path() -> Result<PathBuf> {
    Ok(almanac_home()?.join("schedule.json"))
}
