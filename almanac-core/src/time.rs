//! Time utilities: timezone-aware "today" and date parsing.

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

/// Calendar date of `now` in an IANA tz like "Asia/Shanghai".
pub fn today_in(tz: &str, now: DateTime<Utc>) -> Result<NaiveDate> {
    let tz: Tz = tz
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid timezone: {tz}"))?;
    Ok(now.with_timezone(&tz).date_naive())
}

/// Parse "YYYY-MM-DD", ignoring any time-of-day suffix ("2024-02-04 16:26:53").
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();
    let head = s.split([' ', 'T']).next().unwrap_or(s);
    NaiveDate::parse_from_str(head, "%Y-%m-%d")
        .map_err(|e| anyhow::anyhow!("invalid date '{s}': {e}"))
}
