//! Error types for the layout engine.

use thiserror::Error;

use qc_model::ProfileError;

/// A cell could not be measured.
///
/// Never fatal: callers degrade the cell to a single blank line.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum MeasureError {
    #[error("cannot wrap text into non-positive width {width}")]
    InvalidWidth { width: f32 },

    #[error("invalid text style: font size {font_size}")]
    InvalidStyle { font_size: f32 },
}

/// Errors that stop a layout.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum LayoutError {
    /// One row is taller than a whole page.
    #[error(
        "row {row} needs {height:.1}pt but a full page holds {capacity:.1}pt; it cannot be placed on any page"
    )]
    LayoutOverflow { row: usize, height: f32, capacity: f32 },

    /// Group runs that do not partition the page rows. This is an invariant
    /// breach in run-length computation, not a data problem.
    #[error("malformed group {group}: run of {length} rows at row {first_row} on a {rows}-row page")]
    MalformedGroup {
        group: usize,
        first_row: usize,
        length: usize,
        rows: usize,
    },

    #[error(transparent)]
    Profile(#[from] ProfileError),
}

impl LayoutError {
    /// Overflow errors are caused by the data; everything else by the engine
    /// or its configuration.
    pub fn is_data_error(&self) -> bool {
        matches!(self, Self::LayoutOverflow { .. })
    }
}

pub type Result<T> = std::result::Result<T, LayoutError>;
