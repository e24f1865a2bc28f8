//! Error types for report rendering.

use std::io;

use thiserror::Error;

use qc_layout::LayoutError;
use qc_model::ProfileError;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReportError {
    #[error("invalid report source JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid start date {value:?} (expected YYYY.MM.DD)")]
    InvalidStartDate {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("profile {profile} has {expected} columns but the report rows have {found}")]
    ArityMismatch {
        profile: String,
        expected: usize,
        found: usize,
    },

    #[error(transparent)]
    Profile(#[from] ProfileError),

    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error("document output failed: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, ReportError>;
