//! Report variants.
//!
//! Each variant has its own source schema, column table, number formats and
//! flagging rules. Layout itself is shared and driven by the variant's
//! [`ReportProfile`](qc_model::ReportProfile).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::flag::{ExceedsTarget, FlagRule, MeanOutsideSpread};
use crate::format::NumberFormat;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
pub enum ReportVariant {
    /// Yearly batch CV summary: twelve monthly CVs per level against a target.
    CvAnnual,
    /// Two-month mean/CV comparison per level.
    CvTwoMonth,
    /// Out-of-control events with their corrective action log.
    OutOfControl,
    /// Monthly statistics per analyte and level.
    MonthlySummary,
    /// Monthly statistics grouped by QC batch.
    BatchMonthly,
    /// Yearly statistics grouped by QC batch.
    BatchYearly,
}

impl ReportVariant {
    pub const ALL: [ReportVariant; 6] = [
        ReportVariant::CvAnnual,
        ReportVariant::CvTwoMonth,
        ReportVariant::OutOfControl,
        ReportVariant::MonthlySummary,
        ReportVariant::BatchMonthly,
        ReportVariant::BatchYearly,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportVariant::CvAnnual => "cv-annual",
            ReportVariant::CvTwoMonth => "cv-two-month",
            ReportVariant::OutOfControl => "out-of-control",
            ReportVariant::MonthlySummary => "monthly-summary",
            ReportVariant::BatchMonthly => "batch-monthly",
            ReportVariant::BatchYearly => "batch-yearly",
        }
    }

    /// Document title printed above the identity header.
    pub fn title(&self) -> &'static str {
        match self {
            ReportVariant::CvAnnual => "批CV均值年汇总报告",
            ReportVariant::CvTwoMonth => "批CV均值双月对比报告",
            ReportVariant::OutOfControl => "失控信息汇总报告",
            ReportVariant::MonthlySummary | ReportVariant::BatchMonthly => "室内质控月报表",
            ReportVariant::BatchYearly => "室内质控年报表",
        }
    }

    /// Numeric columns rendered with two decimals, for rows of `arity` columns.
    pub fn column_formats(&self, arity: usize) -> Vec<(usize, NumberFormat)> {
        let columns: &[usize] = match self {
            ReportVariant::CvAnnual | ReportVariant::MonthlySummary => &[],
            ReportVariant::CvTwoMonth if arity > 11 => &[2, 3, 5, 6, 10, 11],
            ReportVariant::CvTwoMonth => &[2, 3, 5, 6, 10],
            ReportVariant::OutOfControl => &[3, 4, 5, 6],
            ReportVariant::BatchMonthly | ReportVariant::BatchYearly => {
                &[3, 4, 5, 6, 7, 8, 11, 12, 13, 14, 15, 16, 17, 19, 20, 21]
            }
        };
        columns
            .iter()
            .map(|&column| (column, NumberFormat::Fixed2))
            .collect()
    }

    /// Highlighting rules applied to every row.
    pub fn flag_rules(&self) -> Vec<Box<dyn FlagRule>> {
        match self {
            ReportVariant::CvAnnual => vec![Box::new(ExceedsTarget::new(3..15, 15))],
            ReportVariant::BatchMonthly | ReportVariant::BatchYearly => vec![
                Box::new(ExceedsTarget::new(8..9, 20)),
                Box::new(MeanOutsideSpread {
                    value: 6,
                    reference: 3,
                    spread: 4,
                }),
            ],
            ReportVariant::CvTwoMonth
            | ReportVariant::OutOfControl
            | ReportVariant::MonthlySummary => Vec::new(),
        }
    }
}

impl fmt::Display for ReportVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        ReportVariant::ALL
            .into_iter()
            .find(|variant| variant.as_str() == normalized)
            .ok_or_else(|| format!("Unknown report variant: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_from_str() {
        for variant in ReportVariant::ALL {
            assert_eq!(variant.as_str().parse::<ReportVariant>(), Ok(variant));
        }
        assert_eq!("Batch_Yearly".parse(), Ok(ReportVariant::BatchYearly));
        assert!("weekly".parse::<ReportVariant>().is_err());
    }

    #[test]
    fn two_month_formats_follow_the_ratio_column() {
        let with_ratio = ReportVariant::CvTwoMonth.column_formats(12);
        let without = ReportVariant::CvTwoMonth.column_formats(11);
        assert_eq!(with_ratio.last(), Some(&(11, NumberFormat::Fixed2)));
        assert_eq!(without.last(), Some(&(10, NumberFormat::Fixed2)));
    }
}
