//! Group runs over the designator column.
//!
//! A group opens at the first row and at every row with a non-blank
//! designator cell; it extends until the next opening row. Runs are always
//! recomputed from the rows at hand, so a group split across a page boundary
//! yields a shorter run on each page.

use qc_model::Row;

use crate::error::{LayoutError, Result};
use crate::plan::CellSpan;

/// Receives the merge and outline instructions of group spans.
pub trait SpanTarget {
    fn merge_cells(&mut self, span: CellSpan);

    /// Draw a full border around `span`.
    fn outline(&mut self, span: CellSpan);
}

/// Lengths of the consecutive groups in `rows`, in encounter order.
///
/// The lengths always sum to `rows.len()`; an empty slice has no groups.
pub fn compute_run_lengths(rows: &[Row], designator: usize) -> Vec<usize> {
    let mut runs = Vec::new();
    for (index, row) in rows.iter().enumerate() {
        let opens = index == 0 || !row.cell(designator).is_blank();
        match runs.last_mut() {
            Some(length) if !opens => *length += 1,
            _ => runs.push(1),
        }
    }
    runs
}

/// Spread each group's first-row height evenly over its members.
///
/// The designator cell of the first row is what the merged cell must hold,
/// so that height (not the group maximum) is what gets divided. Rows past
/// the end of `runs` keep their height.
pub fn redistribute_height(heights: &[f32], runs: &[usize]) -> Vec<f32> {
    let mut spread = heights.to_vec();
    let mut start = 0;
    for &length in runs {
        let end = (start + length).min(spread.len());
        if length == 0 || start >= end {
            continue;
        }
        let share = heights[start] / (end - start) as f32;
        spread[start..end].fill(share);
        start = end;
    }
    spread
}

/// Merge every group of a page into one spanned cell in `column` and outline it.
///
/// `runs` must partition `page_rows`; a zero-length run or one reaching past
/// the page is an engine bug and reported as [`LayoutError::MalformedGroup`].
pub fn apply_group_spans<T: SpanTarget + ?Sized>(
    target: &mut T,
    column: usize,
    runs: &[usize],
    page_rows: usize,
) -> Result<()> {
    let mut first_row = 0;
    for (group, &length) in runs.iter().enumerate() {
        if length == 0 || first_row + length > page_rows {
            return Err(LayoutError::MalformedGroup {
                group,
                first_row,
                length,
                rows: page_rows,
            });
        }
        let span = CellSpan::Group {
            column,
            first_row,
            last_row: first_row + length - 1,
        };
        if length > 1 {
            target.merge_cells(span);
        }
        target.outline(span);
        first_row += length;
    }
    if first_row != page_rows {
        return Err(LayoutError::MalformedGroup {
            group: runs.len(),
            first_row,
            length: 0,
            rows: page_rows,
        });
    }
    Ok(())
}
