//! Source JSON extraction.
//!
//! Every variant's source document is a nested analyte / level / value tree.
//! Extraction flattens it into fixed-arity rows where group designators
//! (analyte, batch) appear only on the first row of their group.

mod cv_annual;
mod cv_two_month;
mod out_of_control;
mod stats;

use serde::{Deserialize, Deserializer, Serialize};

use qc_model::{Cell, HeaderField, Row};

use crate::error::Result;
use crate::variant::ReportVariant;

/// Identity fields shared by every source document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportHeader {
    #[serde(deserialize_with = "nullable")]
    pub report_code: String,
    #[serde(deserialize_with = "nullable")]
    pub start_date_str: String,
    #[serde(deserialize_with = "nullable")]
    pub end_date_str: String,
    #[serde(deserialize_with = "nullable")]
    pub kits_name: String,
    #[serde(deserialize_with = "nullable")]
    pub laboratory_name: String,
    #[serde(deserialize_with = "nullable")]
    pub laboratory_relation: String,
    #[serde(deserialize_with = "nullable")]
    pub batch_code: String,
    #[serde(deserialize_with = "nullable")]
    pub quality_controls: String,
    #[serde(deserialize_with = "nullable")]
    pub batch_expiration_date_str: String,
    #[serde(deserialize_with = "nullable")]
    pub summary: String,
}

impl ReportHeader {
    /// Free-text fields of the identity header box, in drawing order.
    pub fn identity_fields(&self, variant: ReportVariant) -> Vec<(HeaderField, String)> {
        let time_range = format!("{} - {}", self.start_date_str, self.end_date_str);
        let mut fields = vec![
            (HeaderField::TimeRange, time_range),
            (HeaderField::Instrument, self.kits_name.clone()),
        ];
        match variant {
            ReportVariant::MonthlySummary
            | ReportVariant::BatchMonthly
            | ReportVariant::BatchYearly => {
                fields.push((
                    HeaderField::Laboratory,
                    format!("{}({})", self.laboratory_name, self.laboratory_relation),
                ));
            }
            ReportVariant::CvAnnual | ReportVariant::CvTwoMonth | ReportVariant::OutOfControl => {
                fields.push((
                    HeaderField::Laboratory,
                    format!("{} ({})", self.laboratory_name, self.laboratory_relation),
                ));
                fields.push((
                    HeaderField::LotAndExpiry,
                    format!(
                        "{}, {}, {}",
                        self.batch_code,
                        reagent_name(&self.quality_controls),
                        self.batch_expiration_date_str
                    ),
                ));
            }
        }
        fields
    }
}

/// Rows and metadata extracted from one source document.
#[derive(Debug, Clone, PartialEq)]
pub struct Extracted {
    pub header: ReportHeader,
    pub rows: Vec<Row>,
    /// Number of level rows in the source.
    pub record_count: usize,
    /// Month labels of the period columns, where the variant has them.
    pub column_labels: Vec<String>,
}

impl Extracted {
    /// Arity of the extracted rows, if there are any.
    pub fn arity(&self) -> Option<usize> {
        self.rows.first().map(Row::arity)
    }
}

/// Parse `json` as a source document of `variant` and flatten it into rows.
pub fn extract(variant: ReportVariant, json: &str) -> Result<Extracted> {
    match variant {
        ReportVariant::CvAnnual => cv_annual::extract(json),
        ReportVariant::CvTwoMonth => cv_two_month::extract(json),
        ReportVariant::OutOfControl => out_of_control::extract(json),
        ReportVariant::MonthlySummary => stats::extract_monthly(json),
        ReportVariant::BatchMonthly | ReportVariant::BatchYearly => stats::extract_batches(json),
    }
}

/// Reagent name without its last parenthesised part.
///
/// `"Liquichek (Bio-Rad) (Lot A)"` becomes `"Liquichek (Bio-Rad) "`.
pub fn reagent_name(name: &str) -> String {
    match (name.rfind('('), name.rfind(')')) {
        (Some(open), Some(close)) if open < close => {
            format!("{}{}", &name[..open], &name[close + 1..])
        }
        _ => name.to_owned(),
    }
}

/// Missing and `null` values both deserialize to the default.
fn nullable<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A source value as a cell; missing and null values are empty.
fn cell(value: &Option<Cell>) -> Cell {
    value.clone().unwrap_or_default()
}

/// `value` on the first row of a group, empty on the rest.
fn designator(value: &Option<Cell>, first: bool) -> Cell {
    if first { cell(value) } else { Cell::empty() }
}
