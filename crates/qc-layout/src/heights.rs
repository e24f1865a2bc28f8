//! Row height resolution.
//!
//! Each wrappable column is measured independently; a row's height is the
//! tallest of its wrappable cells and its line count is the largest
//! normalized count. Capacity decisions compare the normalized totals, never
//! the drawn heights.

use qc_model::{ReportProfile, Row};
use tracing::trace;

use crate::measure::{TextMeasurer, WrapMeasurement, measure_cell};

/// Measurements of one row.
#[derive(Debug, Clone, PartialEq)]
pub struct RowMetrics {
    /// `(column, measurement)` for every wrappable column, in column order.
    pub cells: Vec<(usize, WrapMeasurement)>,
    /// Tallest wrappable cell, or one single line when nothing wraps.
    pub height: f32,
    /// Largest normalized line count.
    pub normalized: f32,
}

impl RowMetrics {
    /// Measured height of `column`, if it is wrappable.
    pub fn column_height(&self, column: usize) -> Option<f32> {
        self.cells
            .iter()
            .find(|(index, _)| *index == column)
            .map(|(_, measured)| measured.height)
    }

    /// Tallest wrappable cell other than `column`.
    pub fn height_excluding(&self, column: usize) -> Option<f32> {
        self.cells
            .iter()
            .filter(|(index, _)| *index != column)
            .map(|(_, measured)| measured.height)
            .reduce(f32::max)
    }
}

/// Measurements of a row stream.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowHeights {
    rows: Vec<RowMetrics>,
}

impl RowHeights {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[RowMetrics] {
        &self.rows
    }

    /// Drawn height of every row.
    pub fn heights(&self) -> Vec<f32> {
        self.rows.iter().map(|row| row.height).collect()
    }

    /// Normalized line count of every row.
    pub fn normalized(&self) -> Vec<f32> {
        self.rows.iter().map(|row| row.normalized).collect()
    }

    /// Sum of the normalized line counts; this is what page capacities are
    /// compared against.
    pub fn normalized_total(&self) -> f32 {
        self.rows.iter().map(|row| row.normalized).sum()
    }
}

impl From<Vec<RowMetrics>> for RowHeights {
    fn from(rows: Vec<RowMetrics>) -> Self {
        Self { rows }
    }
}

/// Measure every wrappable cell of `rows` at its column's text width.
pub fn resolve_heights<M: TextMeasurer + ?Sized>(
    rows: &[Row],
    profile: &ReportProfile,
    measurer: &M,
) -> RowHeights {
    let metrics = &profile.line_metrics;
    let wrappable = profile.wrappable_columns();
    let widths: Vec<f32> = wrappable
        .iter()
        .map(|&column| profile.text_width(column))
        .collect();

    let rows = rows
        .iter()
        .enumerate()
        .map(|(row_index, row)| {
            let cells: Vec<(usize, WrapMeasurement)> = wrappable
                .iter()
                .zip(&widths)
                .map(|(&column, &width)| {
                    let text = row.cell(column);
                    let measured =
                        measure_cell(measurer, &text.display(), width, &profile.text, metrics);
                    (column, measured)
                })
                .collect();
            let height = cells
                .iter()
                .map(|(_, measured)| measured.height)
                .reduce(f32::max)
                .unwrap_or(metrics.single_line);
            let normalized = cells
                .iter()
                .map(|(_, measured)| measured.normalized(metrics))
                .reduce(f32::max)
                .unwrap_or(1.0);
            trace!(row = row_index, height, normalized, "resolved row height");
            RowMetrics {
                cells,
                height,
                normalized,
            }
        })
        .collect();

    RowHeights { rows }
}
