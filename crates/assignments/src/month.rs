use chrono::{DateTime, Datelike, Utc};
use core::str::FromStr;
use serde::{Deserialize, Serialize};

use kitflow_core::{DomainError, ValueObject};

/// A calendar month (`"YYYY-MM"`), used to bucket assignments by their
/// `assigned_at` timestamp.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Month {
    pub year: i32,
    pub month: u32,
}

impl ValueObject for Month {}

impl Month {
    pub fn new(year: i32, month: u32) -> Result<Self, DomainError> {
        if !(1..=12).contains(&month) {
            return Err(DomainError::validation(format!(
                "month must be 1-12, got {month}"
            )));
        }
        Ok(Self { year, month })
    }

    /// The calendar month a UTC timestamp falls in.
    pub fn of(ts: DateTime<Utc>) -> Self {
        Self {
            year: ts.year(),
            month: ts.month(),
        }
    }

    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        ts.year() == self.year && ts.month() == self.month
    }
}

impl core::fmt::Display for Month {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for Month {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month) = s
            .split_once('-')
            .ok_or_else(|| DomainError::validation(format!("expected YYYY-MM, got {s:?}")))?;
        let year: i32 = year
            .parse()
            .map_err(|_| DomainError::validation(format!("invalid year in {s:?}")))?;
        let month: u32 = month
            .parse()
            .map_err(|_| DomainError::validation(format!("invalid month in {s:?}")))?;
        Month::new(year, month)
    }
}
