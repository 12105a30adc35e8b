//! Period bucketing: maps a transaction date to a coarser period key.
//!
//! Key shapes per granularity:
//! - `day`     → the calendar date, `YYYY-MM-DD`
//! - `week`    → the Monday on or before the date, `YYYY-MM-DD`
//!               (ISO week, Monday start; a Monday buckets to itself)
//! - `month`   → first day of the month, `YYYY-MM-01`
//! - `quarter` → `YYYY-Qn` (Jan–Mar = 1 … Oct–Dec = 4)
//! - `year`    → `YYYY`
//!
//! Dates are calendar dates. An ISO-8601 timestamp contributes its first ten
//! characters, so `2023-06-15T10:00:00Z` buckets exactly like `2023-06-15`.
//! Pure functions throughout; nothing here caches.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Time granularity for the date dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Day,
    Week,
    Month,
    Quarter,
    Year,
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Day => write!(f, "day"),
            Self::Week => write!(f, "week"),
            Self::Month => write!(f, "month"),
            Self::Quarter => write!(f, "quarter"),
            Self::Year => write!(f, "year"),
        }
    }
}

/// Parse a transaction date leniently: trimmed `YYYY-MM-DD`, or an ISO-8601
/// timestamp whose first ten characters form a valid date.
pub fn parse_date(value: &str) -> Result<NaiveDate, EngineError> {
    let trimmed = value.trim();
    if let Ok(d) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(d);
    }
    if let Some(prefix) = trimmed.get(..10) {
        if let Ok(d) = NaiveDate::parse_from_str(prefix, "%Y-%m-%d") {
            return Ok(d);
        }
    }
    Err(EngineError::InvalidDate(value.to_string()))
}

/// Bucket a date string at the given granularity.
pub fn bucket(date: &str, granularity: Granularity) -> Result<String, EngineError> {
    Ok(key_for(parse_date(date)?, granularity))
}

/// Period key for an already-parsed date.
pub fn key_for(date: NaiveDate, granularity: Granularity) -> String {
    match granularity {
        Granularity::Day => date.format("%Y-%m-%d").to_string(),
        Granularity::Week => {
            let monday = date - Duration::days(date.weekday().num_days_from_monday() as i64);
            monday.format("%Y-%m-%d").to_string()
        }
        Granularity::Month => format!("{:04}-{:02}-01", date.year(), date.month()),
        Granularity::Quarter => format!("{:04}-Q{}", date.year(), date.month0() / 3 + 1),
        Granularity::Year => format!("{:04}", date.year()),
    }
}
