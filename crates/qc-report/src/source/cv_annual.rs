//! Yearly batch CV summary (`cvDataList`).

use serde::Deserialize;

use qc_model::{Cell, Row};

use super::{Extracted, ReportHeader, cell, designator, nullable};
use crate::error::Result;
use crate::months::generate_months;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct Source {
    #[serde(flatten)]
    header: ReportHeader,
    #[serde(deserialize_with = "nullable")]
    cv_data_list: Vec<Analyte>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct Analyte {
    analytes_name: Option<Cell>,
    target: Option<Cell>,
    #[serde(deserialize_with = "nullable")]
    level_data: Vec<Level>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct Level {
    level: Option<Cell>,
    #[serde(deserialize_with = "nullable")]
    data_list: Vec<MonthlyCv>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct MonthlyCv {
    #[serde(deserialize_with = "nullable")]
    year_month: String,
    cv: Option<Cell>,
}

/// `[analyte, "", level, cv x 12, target]`, one row per level.
///
/// Month columns follow the twelve months from the report start; a month
/// without data is empty.
pub(super) fn extract(json: &str) -> Result<Extracted> {
    let source: Source = serde_json::from_str(json)?;
    let months = generate_months(&source.header.start_date_str)?;

    let mut rows = Vec::new();
    for analyte in &source.cv_data_list {
        for (index, level) in analyte.level_data.iter().enumerate() {
            let mut cells = Vec::with_capacity(16);
            cells.push(designator(&analyte.analytes_name, index == 0));
            cells.push(Cell::empty());
            cells.push(cell(&level.level));
            cells.extend(months.iter().map(|month| {
                level
                    .data_list
                    .iter()
                    .find(|data| &data.year_month == month)
                    .map(|data| cell(&data.cv))
                    .unwrap_or_default()
            }));
            cells.push(cell(&analyte.target));
            rows.push(Row::new(cells));
        }
    }

    Ok(Extracted {
        header: source.header,
        record_count: rows.len(),
        rows,
        column_labels: months,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = r#"{
        "startDateStr": "2024.01.01",
        "endDateStr": "2024.12.31",
        "cvDataList": [
            {
                "analytesName": "ALT",
                "target": 5.0,
                "levelData": [
                    {"level": 1, "dataList": [
                        {"yearMonth": "2024-03", "cv": 3.2},
                        {"yearMonth": "2024-01", "cv": 6.1}
                    ]},
                    {"level": 2, "dataList": []}
                ]
            }
        ]
    }"#;

    #[test]
    fn aligns_cvs_to_report_months() {
        let extracted = extract(SOURCE).unwrap();
        assert_eq!(extracted.record_count, 2);
        assert_eq!(extracted.column_labels[0], "2024-01");

        let first = &extracted.rows[0];
        assert_eq!(first.arity(), 16);
        assert_eq!(*first.cell(0), Cell::text("ALT"));
        assert_eq!(*first.cell(3), Cell::Number(6.1));
        assert!(first.cell(4).is_blank());
        assert_eq!(*first.cell(5), Cell::Number(3.2));
        assert_eq!(*first.cell(15), Cell::Number(5.0));

        let second = &extracted.rows[1];
        assert!(second.cell(0).is_blank());
        assert!((3..15).all(|column| second.cell(column).is_blank()));
        assert_eq!(*second.cell(15), Cell::Number(5.0));
    }

    #[test]
    fn requires_a_parsable_start_date() {
        let error = extract(r#"{"startDateStr": "January"}"#).unwrap_err();
        assert!(matches!(error, crate::ReportError::InvalidStartDate { .. }));
    }
}
