//! Column descriptors.

use serde::{Deserialize, Serialize};

/// Width and wrapping behaviour of one table column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Width in page units (points).
    pub width: f32,
    /// Whether the column participates in multi-line height calculation.
    #[serde(default)]
    pub wrappable: bool,
}

impl ColumnSpec {
    pub fn fixed(width: f32) -> Self {
        Self {
            width,
            wrappable: false,
        }
    }

    pub fn wrapping(width: f32) -> Self {
        Self {
            width,
            wrappable: true,
        }
    }
}

/// Cells `first..=last` of every row drawn as one horizontally merged cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMerge {
    pub first: usize,
    pub last: usize,
}

impl ColumnMerge {
    pub fn new(first: usize, last: usize) -> Self {
        Self { first, last }
    }

    pub fn contains(&self, column: usize) -> bool {
        (self.first..=self.last).contains(&column)
    }
}
