//! Yearly solar-term feed (JSON)
//!
//! Expected document shape:
//!   {"data": [{"name": "LI_CHUN", "time": "2024-02-04 16:26:53"}, ...]}
//!
//! `date` may be given directly; otherwise it is taken from the leading
//! `YYYY-MM-DD` of `time`. Pinyin identifiers are mapped to Chinese names.

use almanac_core::{time::parse_date, SolarTerm};
use anyhow::{Context, Result};
use regex::Regex;
use serde::Deserialize;

const PINYIN_NAMES: [(&str, &str); 24] = [
    ("LI_CHUN", "立春"),
    ("YU_SHUI", "雨水"),
    ("JING_ZHE", "惊蛰"),
    ("CHUN_FEN", "春分"),
    ("QING_MING", "清明"),
    ("GU_YU", "谷雨"),
    ("LI_XIA", "立夏"),
    ("XIAO_MAN", "小满"),
    ("MANG_ZHONG", "芒种"),
    ("XIA_ZHI", "夏至"),
    ("XIAO_SHU", "小暑"),
    ("DA_SHU", "大暑"),
    ("LI_QIU", "立秋"),
    ("CHU_SHU", "处暑"),
    ("BAI_LU", "白露"),
    ("QIU_FEN", "秋分"),
    ("HAN_LU", "寒露"),
    ("SHUANG_JIANG", "霜降"),
    ("LI_DONG", "立冬"),
    ("XIAO_XUE", "小雪"),
    ("DA_XUE", "大雪"),
    ("DONG_ZHI", "冬至"),
    ("XIAO_HAN", "小寒"),
    ("DA_HAN", "大寒"),
];

/// Chinese name for a pinyin identifier; unknown names pass through.
pub fn chinese_name(name: &str) -> &str {
    PINYIN_NAMES
        .iter()
        .find(|(pinyin, _)| *pinyin == name)
        .map(|(_, zh)| *zh)
        .unwrap_or(name)
}

#[derive(Debug, Deserialize)]
struct JieqiDoc {
    #[serde(default)]
    data: Vec<JieqiRow>,
}

#[derive(Debug, Deserialize)]
struct JieqiRow {
    name: Option<String>,
    date: Option<String>,
    time: Option<String>,
}

/// Parse a solar-term feed document, in feed order.
pub fn parse_jieqi_feed(json: &str) -> Result<Vec<SolarTerm>> {
    let doc: JieqiDoc = serde_json::from_str(json).context("parse solar-term feed")?;
    let date_re = Regex::new(r"^\s*(\d{4}-\d{2}-\d{2})")?;

    let mut out = Vec::with_capacity(doc.data.len());
    for row in doc.data {
        let Some(raw_name) = row.name else {
            tracing::warn!("solar-term row without name skipped");
            continue;
        };
        let name = chinese_name(&raw_name).to_string();

        let date_str = row.date.or_else(|| {
            row.time
                .as_deref()
                .and_then(|t| date_re.captures(t))
                .map(|caps| caps[1].to_string())
        });
        let Some(date_str) = date_str else {
            tracing::warn!(name = %name, "solar-term row without date skipped");
            continue;
        };

        let date = parse_date(&date_str).with_context(|| format!("solar term '{name}' date"))?;
        out.push(SolarTerm::new(name, date));
    }

    Ok(out)
}
