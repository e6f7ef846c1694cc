//! Yearly holiday feed (JSON)
//!
//! Expected document shape:
//!   {"data": [{"name": "国庆节", "start": "2024-10-01", "end": "2024-10-07",
//!              "work": ["2024-09-29", "2024-10-12"]}]}
//!
//! Rows without both `start` and `end` are skipped.

use almanac_core::{time::parse_date, HolidayRange};
use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct HolidayDoc {
    #[serde(default)]
    data: Vec<HolidayRow>,
}

#[derive(Debug, Deserialize)]
struct HolidayRow {
    name: Option<String>,
    start: Option<String>,
    end: Option<String>,
    #[serde(default)]
    work: Vec<String>,
}

/// Parse a holiday feed document into ranges, in feed order.
pub fn parse_holiday_feed(json: &str) -> Result<Vec<HolidayRange>> {
    let doc: HolidayDoc = serde_json::from_str(json).context("parse holiday feed")?;

    let mut out = Vec::with_capacity(doc.data.len());
    for row in doc.data {
        let name = row.name.unwrap_or_default();
        let (Some(start), Some(end)) = (row.start.as_deref(), row.end.as_deref()) else {
            tracing::warn!(name = %name, "holiday row without start/end skipped");
            continue;
        };

        let start = parse_date(start).with_context(|| format!("holiday '{name}' start"))?;
        let end = parse_date(end).with_context(|| format!("holiday '{name}' end"))?;
        let work = row
            .work
            .iter()
            .map(|w| parse_date(w).with_context(|| format!("holiday '{name}' workday")))
            .collect::<Result<Vec<_>>>()?;

        out.push(HolidayRange::new(name, start, end).with_workdays(work));
    }

    Ok(out)
}
