//! Month columns of the yearly CV report.

use chrono::{Datelike, NaiveDate};

use crate::error::{ReportError, Result};

/// Format of report start dates, e.g. `2024.03.01`.
pub const START_DATE_FORMAT: &str = "%Y.%m.%d";

/// Twelve `YYYY-MM` labels starting at the month of `start`.
pub fn generate_months(start: &str) -> Result<Vec<String>> {
    let date = NaiveDate::parse_from_str(start.trim(), START_DATE_FORMAT).map_err(|source| {
        ReportError::InvalidStartDate {
            value: start.to_owned(),
            source,
        }
    })?;
    let first = date.year() * 12 + date.month0() as i32;
    Ok((first..first + 12)
        .map(|month| format!("{}-{:02}", month.div_euclid(12), month.rem_euclid(12) + 1))
        .collect())
}
