//! Page render instructions.
//!
//! A [`PagePlan`] is everything a drawing backend needs to put one page on
//! paper: the rows, their final heights, the column table, spans, outlines,
//! the page-local style overlay and the position of the summary block.

use std::fmt;

use serde::{Deserialize, Serialize};

use qc_model::{Row, StyleOverlay};

use crate::groups::SpanTarget;

/// Where a page sits in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PagePhase {
    /// Below the identity header.
    First,
    /// A full continuation page.
    Interior,
    /// The remaining rows, followed by the summary if it fits.
    Last,
    /// Only the summary and signature; no table rows.
    Closing,
}

impl PagePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            PagePhase::First => "first",
            PagePhase::Interior => "interior",
            PagePhase::Last => "last",
            PagePhase::Closing => "closing",
        }
    }
}

impl fmt::Display for PagePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Table corner radii in `[top_left, top_right, bottom_left, bottom_right]` order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CornerRadii(pub [f32; 4]);

impl CornerRadii {
    pub const fn square() -> Self {
        Self([0.0; 4])
    }

    /// The first page continues the header's column titles above it.
    pub const fn bottom_rounded() -> Self {
        Self([0.0, 0.0, 1.0, 1.0])
    }

    pub const fn rounded() -> Self {
        Self([1.0; 4])
    }

    /// The last page hands over to the summary box below it.
    pub const fn top_rounded() -> Self {
        Self([1.0, 1.0, 0.0, 0.0])
    }
}

/// A merged cell region, in page-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CellSpan {
    /// Horizontal merge within one row.
    Columns {
        row: usize,
        first_column: usize,
        last_column: usize,
    },
    /// Vertical merge of a group's designator cells.
    Group {
        column: usize,
        first_row: usize,
        last_row: usize,
    },
}

/// Position of the summary box on its page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryPlacement {
    pub title: String,
    /// Distance from the top of the usable area to the top of the box.
    pub top_offset: f32,
    /// Box height: the wrapped text height, never below the minimum.
    pub height: f32,
    pub lines: Vec<String>,
    /// The box did not fit below the table and was moved to a fresh page.
    pub pushed: bool,
}

/// One page of output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PagePlan {
    /// 1-based page number.
    pub number: usize,
    pub phase: PagePhase,
    /// Index of this page's first row in the whole row stream.
    pub first_row: usize,
    pub rows: Vec<Row>,
    pub row_heights: Vec<f32>,
    pub column_widths: Vec<f32>,
    pub spans: Vec<CellSpan>,
    pub outlines: Vec<CellSpan>,
    pub styles: StyleOverlay,
    pub corners: CornerRadii,
    /// Distance from the top of the usable area to the first table row.
    pub table_top: f32,
    pub summary: Option<SummaryPlacement>,
    /// The reviewer signature line is drawn on this page.
    pub signature: bool,
    /// A page break follows this page.
    pub break_after: bool,
}

impl PagePlan {
    pub(crate) fn new(number: usize, phase: PagePhase, column_widths: Vec<f32>) -> Self {
        Self {
            number,
            phase,
            first_row: 0,
            rows: Vec::new(),
            row_heights: Vec::new(),
            column_widths,
            spans: Vec::new(),
            outlines: Vec::new(),
            styles: StyleOverlay::default(),
            corners: CornerRadii::square(),
            table_top: 0.0,
            summary: None,
            signature: false,
            break_after: false,
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn table_height(&self) -> f32 {
        // Starts at +0.0; an empty f32 `sum` is -0.0.
        self.row_heights.iter().fold(0.0, |total, height| total + height)
    }

    /// Global indices of the rows on this page.
    pub fn row_range(&self) -> std::ops::Range<usize> {
        self.first_row..self.first_row + self.rows.len()
    }
}

impl SpanTarget for PagePlan {
    fn merge_cells(&mut self, span: CellSpan) {
        self.spans.push(span);
    }

    fn outline(&mut self, span: CellSpan) {
        self.outlines.push(span);
    }
}
