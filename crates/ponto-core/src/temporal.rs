//! # Reference Periods
//!
//! Every generated compliance file covers exactly one closed date range —
//! the reference period requested by the employer. The [`Period`] type
//! enforces `start <= end` at construction and owns the `YYYYMMDD`
//! rendering used in record layouts and output filenames.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A closed date range `[start, end]` covered by one generated file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Period {
    start: NaiveDate,
    end: NaiveDate,
}

impl Period {
    /// Create a period, rejecting ranges where `start > end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ValidationError> {
        if start > end {
            return Err(ValidationError::InvalidPeriod { start, end });
        }
        Ok(Self { start, end })
    }

    /// The first day of the period.
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// The last day of the period (inclusive).
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Whether the given date falls inside the period.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// The period start rendered as `YYYYMMDD`.
    pub fn start_yyyymmdd(&self) -> String {
        self.start.format("%Y%m%d").to_string()
    }

    /// The period end rendered as `YYYYMMDD`.
    pub fn end_yyyymmdd(&self) -> String {
        self.end.format("%Y%m%d").to_string()
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn period_rejects_inverted_range() {
        assert!(Period::new(date(2026, 2, 1), date(2026, 1, 31)).is_err());
    }

    #[test]
    fn period_accepts_single_day() {
        let p = Period::new(date(2026, 1, 15), date(2026, 1, 15)).unwrap();
        assert!(p.contains(date(2026, 1, 15)));
        assert!(!p.contains(date(2026, 1, 16)));
    }

    #[test]
    fn period_renders_yyyymmdd() {
        let p = Period::new(date(2026, 1, 1), date(2026, 1, 31)).unwrap();
        assert_eq!(p.start_yyyymmdd(), "20260101");
        assert_eq!(p.end_yyyymmdd(), "20260131");
    }
}
