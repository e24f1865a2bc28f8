//! Paginated table layout for QC reports.
//!
//! The engine works bottom-up:
//!
//! - **Measurement** (`measure`): the text measuring seam and a font-free default
//! - **Heights** (`heights`): per-row wrapped heights and normalized line counts
//! - **Groups** (`groups`): designator run lengths, height equalization and spans
//! - **Header** (`header`): identity header overflow, which shrinks the first page
//! - **Pagination** (`paginate`): the page-by-page driver producing [`PagePlan`]s
//!
//! # Example
//!
//! ```ignore
//! use qc_layout::{AdvanceMeasurer, HeaderLayout, Paginator};
//!
//! let measurer = AdvanceMeasurer::default();
//! let pages = Paginator::new(&profile, &measurer, rows)
//!     .with_header(HeaderLayout::plain(&profile.header))
//!     .with_summary(summary_text)
//!     .collect::<Result<Vec<_>, _>>()?;
//! ```

pub mod error;
pub mod groups;
pub mod header;
pub mod heights;
pub mod measure;
pub mod paginate;
pub mod plan;
pub mod summary;

pub use error::{LayoutError, MeasureError, Result};
pub use groups::{SpanTarget, apply_group_spans, compute_run_lengths, redistribute_height};
pub use header::{HeaderLayout, HeaderLine, resolve_identity_header, split_overflow};
pub use heights::{RowHeights, RowMetrics, resolve_heights};
pub use measure::{AdvanceMeasurer, TextMeasurer, WrapMeasurement, measure_cell};
pub use paginate::{CapacityBand, Paginator, fit_count, layout_pages};
pub use plan::{CellSpan, CornerRadii, PagePhase, PagePlan, SummaryPlacement};
pub use summary::{SummaryFit, summary_height};
