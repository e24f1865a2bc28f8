//! QC report rendering.
//!
//! Turns a report source document into a stream of page plans:
//!
//! - **Sources** (`source`): per-variant JSON schemas flattened into rows
//! - **Variants** (`variant`): titles, number formats and flagging rules
//! - **Profiles** (`profiles`): the built-in column tables and page budgets
//! - **Flagging** (`flag`) and **formatting** (`format`): cell styles and text
//! - **Documents** (`document`): the sink protocol and a JSON Lines backend
//! - **Rendering** (`report`): [`render_report`] ties the steps together

pub mod document;
pub mod error;
pub mod flag;
pub mod format;
pub mod months;
pub mod profiles;
pub mod report;
pub mod source;
pub mod variant;

pub use document::{DocumentMeta, DocumentSession, DocumentSink, JsonLinesSink, PageCollector};
pub use error::{ReportError, Result};
pub use flag::{ExceedsTarget, FlagRule, MeanOutsideSpread, flag_cells};
pub use format::{NumberFormat, format_row};
pub use months::generate_months;
pub use profiles::{builtin_profile, cv_annual_profile, cv_two_month_profile, out_of_control_profile};
pub use report::{PageSummary, RenderSummary, default_profile, render_report};
pub use source::{Extracted, ReportHeader, extract, reagent_name};
pub use variant::ReportVariant;
