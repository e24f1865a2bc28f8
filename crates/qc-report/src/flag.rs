//! Value flagging.
//!
//! Rules look at one row at a time and return styles for the cells they
//! judge; [`flag_cells`] collects them into a sparse overlay. Cells a rule
//! cannot judge (missing or non-numeric values) get no entry at all.

use std::ops::Range;

use qc_model::{CellStyle, Row, StyleOverlay, TextColor};

/// A per-row highlighting rule.
pub trait FlagRule {
    /// `(column, style)` for every cell of `row` this rule judges.
    fn flag(&self, row: &Row) -> Vec<(usize, CellStyle)>;
}

impl<F> FlagRule for F
where
    F: Fn(&Row) -> Vec<(usize, CellStyle)>,
{
    fn flag(&self, row: &Row) -> Vec<(usize, CellStyle)> {
        self(row)
    }
}

/// Red bold when a value exceeds the row's target, regular black otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExceedsTarget {
    pub columns: Range<usize>,
    pub target: usize,
}

impl ExceedsTarget {
    pub fn new(columns: Range<usize>, target: usize) -> Self {
        Self { columns, target }
    }
}

impl FlagRule for ExceedsTarget {
    fn flag(&self, row: &Row) -> Vec<(usize, CellStyle)> {
        let Some(target) = row.number(self.target) else {
            return Vec::new();
        };
        self.columns
            .clone()
            .filter_map(|column| {
                let value = row.number(column)?;
                let style = if value > target {
                    CellStyle::highlight(TextColor::Red)
                } else {
                    CellStyle::normal()
                };
                Some((column, style))
            })
            .collect()
    }
}

/// Compares a value against `reference ± spread` from the same row.
///
/// Below the band is blue bold, above it red bold, inside it regular black.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeanOutsideSpread {
    pub value: usize,
    pub reference: usize,
    pub spread: usize,
}

impl FlagRule for MeanOutsideSpread {
    fn flag(&self, row: &Row) -> Vec<(usize, CellStyle)> {
        let (Some(value), Some(reference), Some(spread)) = (
            row.number(self.value),
            row.number(self.reference),
            row.number(self.spread),
        ) else {
            return Vec::new();
        };
        let style = if value < reference - spread {
            CellStyle::highlight(TextColor::Blue)
        } else if value > reference + spread {
            CellStyle::highlight(TextColor::Red)
        } else {
            CellStyle::normal()
        };
        vec![(self.value, style)]
    }
}

/// Apply every rule to every row. Later rules win on shared cells.
pub fn flag_cells(rows: &[Row], rules: &[Box<dyn FlagRule>]) -> StyleOverlay {
    let mut overlay = StyleOverlay::new();
    for (index, row) in rows.iter().enumerate() {
        for rule in rules {
            for (column, style) in rule.flag(row) {
                overlay.insert(index, column, style);
            }
        }
    }
    overlay
}
