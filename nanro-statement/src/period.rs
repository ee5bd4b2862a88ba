//! Inclusive statement date ranges.

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{StatementError, StatementResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl StatementPeriod {
    pub fn new(start: NaiveDate, end: NaiveDate) -> StatementResult<Self> {
        if start > end {
            return Err(StatementError::InvalidPeriod { start, end });
        }
        Ok(Self { start, end })
    }

    /// Parse two `YYYY-MM-DD` dates.
    pub fn parse(start: &str, end: &str) -> StatementResult<Self> {
        Self::new(parse_date(start)?, parse_date(end)?)
    }

    /// The `days` days ending on (and including) `today`.
    pub fn last_days(days: u32, today: NaiveDate) -> StatementResult<Self> {
        let back = u64::from(days.max(1)) - 1;
        let start = today
            .checked_sub_days(Days::new(back))
            .ok_or(StatementError::OutOfRange { days, end: today })?;
        Ok(Self { start, end: today })
    }

    /// First of the month through `today`.
    pub fn month_to_date(today: NaiveDate) -> Self {
        Self {
            start: today.with_day(1).unwrap_or(today),
            end: today,
        }
    }

    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// e.g. "01 Mar 2026 - 31 Mar 2026"
    pub fn label(&self) -> String {
        format!(
            "{} - {}",
            self.start.format("%d %b %Y"),
            self.end.format("%d %b %Y")
        )
    }
}

fn parse_date(raw: &str) -> StatementResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| StatementError::InvalidDate(raw.to_string()))
}
