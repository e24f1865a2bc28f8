//! Data model for laboratory QC report layout.
//!
//! - **Rows** (`row`): fixed-arity sequences of numeric or text cells
//! - **Columns** (`column`): widths, wrappable flags and horizontal merges
//! - **Styles** (`style`): sparse per-cell style overlays
//! - **Profiles** (`profile`): the full layout configuration of one report variant

pub mod column;
pub mod error;
pub mod profile;
pub mod row;
pub mod style;

pub use column::{ColumnMerge, ColumnSpec};
pub use error::{ProfileError, Result};
pub use profile::{
    A4_LANDSCAPE_USABLE_HEIGHT, A4_LANDSCAPE_USABLE_WIDTH, CapacityPlan, HeaderField,
    HeaderFieldBudget, IdentityHeaderSpec, LineMetrics, PageGeometry, PhaseCapacity,
    ReportProfile, SummaryBlockSpec, TextStyle,
};
pub use row::{Cell, Row};
pub use style::{CellStyle, StyleOverlay, TextColor};
