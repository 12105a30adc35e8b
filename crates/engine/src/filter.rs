//! Record filtering: date range + text predicate.
//!
//! Invariants:
//! - Bounds are inclusive and compare the raw `date` field as a calendar
//!   date, never the bucket.
//! - The text filter is a case-insensitive substring test across `customer`
//!   and `stockitem`; it is trimmed first, and an empty value is no filter.
//! - Filtering is pure, order-preserving, and idempotent.
//! - A malformed bound is a caller error (fail fast). A malformed record
//!   date is a data error: with a bound configured the record is excluded
//!   and counted, with no bounds it passes through.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::bucket::parse_date;
use crate::error::EngineError;
use crate::model::{Transaction, Warnings};

/// Filter settings for one aggregation pass. All fields optional; absent
/// fields impose no constraint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Filters {
    pub from_date: Option<String>,
    pub to_date: Option<String>,
    pub text: Option<String>,
}

impl Filters {
    pub fn is_empty(&self) -> bool {
        self.from_date.is_none() && self.to_date.is_none() && self.needle().is_none()
    }

    /// Normalized text needle, `None` when blank.
    fn needle(&self) -> Option<String> {
        let t = self.text.as_deref()?.trim().to_lowercase();
        if t.is_empty() {
            None
        } else {
            Some(t)
        }
    }

    /// Parsed date bounds. Malformed bounds fail fast.
    pub fn bounds(&self) -> Result<(Option<NaiveDate>, Option<NaiveDate>), EngineError> {
        let parse_bound = |label: &str, value: &Option<String>| match value {
            Some(v) => parse_date(v).map(Some).map_err(|_| {
                EngineError::ConfigValidation(format!("{label} is not a valid date: '{v}'"))
            }),
            None => Ok(None),
        };
        Ok((
            parse_bound("from_date", &self.from_date)?,
            parse_bound("to_date", &self.to_date)?,
        ))
    }

    /// Apply all configured predicates, preserving record order.
    pub fn apply<'a>(
        &self,
        records: &'a [Transaction],
    ) -> Result<(Vec<&'a Transaction>, Warnings), EngineError> {
        let (from, to) = self.bounds()?;
        let needle = self.needle();
        let mut warnings = Warnings::default();

        let kept = records
            .iter()
            .filter(|t| {
                if let Some(ref n) = needle {
                    if !matches_text(t, n) {
                        return false;
                    }
                }
                if from.is_some() || to.is_some() {
                    let date = match parse_date(&t.date) {
                        Ok(d) => d,
                        Err(_) => {
                            // Membership in a date range cannot be established.
                            warnings.invalid_dates += 1;
                            return false;
                        }
                    };
                    if let Some(f) = from {
                        if date < f {
                            return false;
                        }
                    }
                    if let Some(u) = to {
                        if date > u {
                            return false;
                        }
                    }
                }
                true
            })
            .collect();

        Ok((kept, warnings))
    }
}

fn matches_text(t: &Transaction, needle: &str) -> bool {
    t.customer.to_lowercase().contains(needle) || t.stockitem.to_lowercase().contains(needle)
}
