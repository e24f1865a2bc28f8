//! End-to-end report rendering.

use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info, info_span};

use qc_layout::{PagePhase, PagePlan, Paginator, TextMeasurer, resolve_identity_header};
use qc_model::{ReportProfile, Row, StyleOverlay};

use crate::document::{DocumentMeta, DocumentSession, DocumentSink};
use crate::error::{ReportError, Result};
use crate::flag::flag_cells;
use crate::format::format_row;
use crate::profiles::{builtin_profile, cv_two_month_profile};
use crate::source::{Extracted, extract};
use crate::variant::ReportVariant;

/// What one page ended up holding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageSummary {
    pub number: usize,
    pub phase: PagePhase,
    pub first_row: usize,
    pub rows: usize,
    pub table_height: f32,
    pub summary: bool,
    pub signature: bool,
}

impl From<&PagePlan> for PageSummary {
    fn from(page: &PagePlan) -> Self {
        Self {
            number: page.number,
            phase: page.phase,
            first_row: page.first_row,
            rows: page.row_count(),
            table_height: page.table_height(),
            summary: page.summary.is_some(),
            signature: page.signature,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderSummary {
    pub variant: ReportVariant,
    pub profile: String,
    pub record_count: usize,
    pub header_overflowed: bool,
    /// The summary block did not fit under the table and got its own page.
    pub summary_pushed: bool,
    pub pages: Vec<PageSummary>,
}

impl RenderSummary {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// Profile used for `extracted` when none is given.
///
/// The two-month CV rows carry the ratio column only for single-level
/// documents, so its column table follows the extracted arity.
pub fn default_profile(variant: ReportVariant, extracted: &Extracted) -> ReportProfile {
    match variant {
        ReportVariant::CvTwoMonth => cv_two_month_profile(extracted.arity() == Some(12)),
        _ => builtin_profile(variant),
    }
}

/// Styles and number formats applied to the raw extracted rows.
fn prepare_rows(variant: ReportVariant, rows: &[Row], arity: usize) -> (Vec<Row>, StyleOverlay) {
    let styles = flag_cells(rows, &variant.flag_rules());
    let formats = variant.column_formats(arity);
    let rows = rows.iter().map(|row| format_row(row, &formats)).collect();
    (rows, styles)
}

/// Extract, lay out and emit one report.
///
/// The sink is finished on every path once `begin` succeeded, including
/// layout failures part-way through the document.
pub fn render_report<M, S>(
    variant: ReportVariant,
    source_json: &str,
    profile_override: Option<ReportProfile>,
    measurer: &M,
    sink: &mut S,
) -> Result<RenderSummary>
where
    M: TextMeasurer + ?Sized,
    S: DocumentSink + ?Sized,
{
    let span = info_span!("render_report", variant = %variant);
    let _guard = span.enter();
    let start = Instant::now();

    let extracted = extract(variant, source_json)?;
    let profile = profile_override.unwrap_or_else(|| default_profile(variant, &extracted));
    profile.validate()?;
    if let Some(found) = extracted.arity()
        && found != profile.arity()
    {
        return Err(ReportError::ArityMismatch {
            profile: profile.name.clone(),
            expected: profile.arity(),
            found,
        });
    }
    debug!(
        profile = %profile.name,
        rows = extracted.rows.len(),
        record_count = extracted.record_count,
        "extracted report rows"
    );

    // Flags judge the raw numbers; formatting turns them into text.
    let (rows, styles) = prepare_rows(variant, &extracted.rows, profile.arity());
    let fields = extracted.header.identity_fields(variant);
    let header = resolve_identity_header(&fields, &profile.header, measurer);
    let header_overflowed = header.overflowed;

    let meta = DocumentMeta {
        variant,
        title: variant.title().to_string(),
        report_code: extracted.header.report_code.clone(),
        profile: profile.name.clone(),
        record_count: extracted.record_count,
        header: header.clone(),
        column_labels: extracted.column_labels.clone(),
    };

    let paginator = Paginator::new(&profile, measurer, rows)
        .with_header(header)
        .with_summary(extracted.header.summary.as_str())
        .with_styles(styles);

    let mut session = DocumentSession::begin(sink, &meta)?;
    let mut pages = Vec::new();
    let mut summary_pushed = false;
    for page in paginator {
        let page = page?;
        session.write_page(&page)?;
        summary_pushed |= page.summary.as_ref().is_some_and(|summary| summary.pushed);
        pages.push(PageSummary::from(&page));
    }
    let written = session.finish()?;

    info!(
        pages = written,
        record_count = extracted.record_count,
        header_overflowed,
        summary_pushed,
        duration_ms = start.elapsed().as_millis(),
        "report rendered"
    );

    Ok(RenderSummary {
        variant,
        profile: profile.name,
        record_count: extracted.record_count,
        header_overflowed,
        summary_pushed,
        pages,
    })
}
