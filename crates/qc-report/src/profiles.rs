//! Built-in layout profiles.
//!
//! All variants print on landscape A4 with 0.15in margins. Column tables are
//! derived from an even split of the usable width, then adjusted per column.

use qc_model::{
    A4_LANDSCAPE_USABLE_WIDTH, CapacityPlan, ColumnMerge, ColumnSpec, HeaderField,
    HeaderFieldBudget, IdentityHeaderSpec, PhaseCapacity, ReportProfile, SummaryBlockSpec,
};

use crate::variant::ReportVariant;

/// Width budget of the laboratory name in the identity header.
pub const LABORATORY_BUDGET: f32 = 293.94;
/// Width budget of the lot / reagent / expiry line.
pub const LOT_BUDGET: f32 = 275.94;

const SUMMARY_WRAP_WIDTH: f32 = 791.09;
const SUMMARY_MIN_HEIGHT: f32 = 82.0;
const SUMMARY_BOTTOM_RESERVE: f32 = 33.0;

/// The built-in profile of `variant`.
///
/// The two-month CV report has an optional ratio column; this returns its
/// narrower form, see [`cv_two_month_profile`].
pub fn builtin_profile(variant: ReportVariant) -> ReportProfile {
    match variant {
        ReportVariant::CvAnnual => cv_annual_profile(),
        ReportVariant::CvTwoMonth => cv_two_month_profile(false),
        ReportVariant::OutOfControl => out_of_control_profile(),
        ReportVariant::MonthlySummary | ReportVariant::BatchMonthly | ReportVariant::BatchYearly => {
            statistics_profile(variant)
        }
    }
}

fn even_columns(count: usize, wrappable: &[usize]) -> Vec<ColumnSpec> {
    let width = A4_LANDSCAPE_USABLE_WIDTH / count as f32;
    (0..count)
        .map(|column| ColumnSpec {
            width,
            wrappable: wrappable.contains(&column),
        })
        .collect()
}

fn summary_block(title: &str, padding: f32) -> SummaryBlockSpec {
    SummaryBlockSpec {
        title: title.to_string(),
        min_height: SUMMARY_MIN_HEIGHT,
        wrap_width: SUMMARY_WRAP_WIDTH,
        bottom_reserve: SUMMARY_BOTTOM_RESERVE,
        padding,
    }
}

fn cv_header() -> IdentityHeaderSpec {
    IdentityHeaderSpec {
        height: 175.0,
        overflow_height: 195.0,
        budgets: vec![
            HeaderFieldBudget::new(HeaderField::Laboratory, LABORATORY_BUDGET),
            HeaderFieldBudget::wrap_only(HeaderField::LotAndExpiry, LOT_BUDGET),
        ],
        ..IdentityHeaderSpec::default()
    }
}

/// Sixteen even columns; the analyte name spans the first two.
pub fn cv_annual_profile() -> ReportProfile {
    ReportProfile::new(ReportVariant::CvAnnual.as_str(), even_columns(16, &[0]))
        .with_merge(ColumnMerge::new(0, 1))
        .with_cell_padding(4.0)
        .with_capacity(CapacityPlan {
            full_band: 5.0,
            ..CapacityPlan::default()
        })
        .with_header(cv_header())
        .with_summary(Some(summary_block("总结:", 8.0)))
}

/// Eleven columns, or twelve with the CV ratio column when only one level
/// is reported.
pub fn cv_two_month_profile(with_ratio: bool) -> ReportProfile {
    let arity = if with_ratio { 12 } else { 11 };
    ReportProfile::new(ReportVariant::CvTwoMonth.as_str(), even_columns(arity, &[0]))
        .with_designator(0)
        .with_placeholder_rows(2)
        .with_header(cv_header())
        .with_summary(Some(summary_block("总结:", 8.0)))
}

pub fn out_of_control_profile() -> ReportProfile {
    let base = A4_LANDSCAPE_USABLE_WIDTH / 10.0;
    let widths = [
        base,
        base - 50.0,
        base + 10.0,
        base - 40.0,
        base - 40.0,
        base - 40.0,
        base - 40.0,
        base - 40.0,
        base,
        base + 240.0,
    ];
    let columns = widths
        .iter()
        .enumerate()
        .map(|(column, &width)| ColumnSpec {
            width,
            wrappable: matches!(column, 0 | 8 | 9),
        })
        .collect();

    ReportProfile::new(ReportVariant::OutOfControl.as_str(), columns)
        .with_designator(0)
        .with_placeholder_rows(2)
        .with_capacity(CapacityPlan {
            first_page: PhaseCapacity {
                normal: 21.0,
                header_overflow: 20.0,
            },
            one_page_limit: PhaseCapacity {
                normal: 19.0,
                header_overflow: 18.0,
            },
            full_page: 30.0,
            full_band: 1.0,
        })
        .with_header(IdentityHeaderSpec {
            height: 155.0,
            overflow_height: 175.0,
            budgets: vec![
                HeaderFieldBudget::new(HeaderField::Laboratory, LABORATORY_BUDGET),
                HeaderFieldBudget::new(HeaderField::LotAndExpiry, LOT_BUDGET),
            ],
            ..IdentityHeaderSpec::default()
        })
}

/// Twenty-two columns for the monthly and batch statistics reports.
///
/// The analyte column is widened at the expense of the level, count and
/// total-count columns.
fn statistics_profile(variant: ReportVariant) -> ReportProfile {
    let mut columns = even_columns(22, &[0, 1]);
    columns[1].width += 49.0;
    columns[2].width -= 15.0;
    columns[9].width -= 17.0;
    columns[18].width -= 17.0;

    ReportProfile::new(variant.as_str(), columns)
        .with_designator(0)
        .with_placeholder_rows(2)
        .with_capacity(CapacityPlan {
            full_band: 6.0,
            ..CapacityPlan::default()
        })
        .with_header(IdentityHeaderSpec {
            height: 175.0,
            overflow_height: 175.0,
            budgets: vec![HeaderFieldBudget::new(
                HeaderField::Laboratory,
                LABORATORY_BUDGET,
            )],
            ..IdentityHeaderSpec::default()
        })
        .with_summary(Some(summary_block("评价:", 0.0)))
}
