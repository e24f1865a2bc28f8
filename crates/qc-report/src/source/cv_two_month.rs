//! Two-month mean/CV comparison (`projectMonthDataList`).

use serde::Deserialize;

use qc_model::{Cell, Row};

use super::{Extracted, ReportHeader, cell, designator, nullable};
use crate::error::Result;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct Source {
    #[serde(flatten)]
    header: ReportHeader,
    #[serde(deserialize_with = "nullable")]
    project_month_data_list: Vec<Project>,
    #[serde(deserialize_with = "nullable")]
    level_list: Vec<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct Project {
    analytes_name: Option<Cell>,
    #[serde(deserialize_with = "nullable")]
    month_data_list: Vec<LevelMonths>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct LevelMonths {
    level: Option<Cell>,
    target: Option<Cell>,
    #[serde(deserialize_with = "nullable")]
    month_data: Vec<MonthStats>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct MonthStats {
    #[serde(deserialize_with = "nullable")]
    year_month: String,
    mean: Option<Cell>,
    cv: Option<Cell>,
    data_count: Option<Cell>,
}

/// `(b - a) / a` as a two-decimal percentage, empty when either side is not
/// numeric or `a` is zero.
fn relative_change(a: &Cell, b: &Cell) -> Cell {
    match (a.as_number(), b.as_number()) {
        (Some(a), Some(b)) if a != 0.0 => Cell::Text(format!("{:.2}%", (b - a) / a * 100.0)),
        _ => Cell::empty(),
    }
}

fn ratio(a: &Cell, b: &Cell) -> Cell {
    match (a.as_number(), b.as_number()) {
        (Some(a), Some(b)) if b != 0.0 => Cell::Number(a / b),
        _ => Cell::empty(),
    }
}

fn as_text(value: &Option<Cell>) -> Cell {
    Cell::Text(cell(value).display().into_owned())
}

/// `[analyte, level, mean1, cv1, n1, mean2, cv2, n2, Δmean, Δcv, (cv1/cv2), target]`.
///
/// Only the first two months of a level are compared; a missing month leaves
/// its three columns empty. The ratio column exists only when the document
/// reports exactly one level.
pub(super) fn extract(json: &str) -> Result<Extracted> {
    let source: Source = serde_json::from_str(json)?;
    let with_ratio = source.level_list.len() == 1;

    let mut months: Vec<String> = Vec::new();
    let mut rows = Vec::new();
    for project in &source.project_month_data_list {
        for (index, level) in project.month_data_list.iter().enumerate() {
            for month in &level.month_data {
                if !months.contains(&month.year_month) {
                    months.push(month.year_month.clone());
                }
            }

            let mut cells = Vec::with_capacity(12);
            cells.push(designator(&project.analytes_name, index == 0));
            cells.push(as_text(&level.level));
            for slot in 0..2 {
                match level.month_data.get(slot) {
                    Some(month) => {
                        cells.push(cell(&month.mean));
                        cells.push(cell(&month.cv));
                        cells.push(as_text(&month.data_count));
                    }
                    None => cells.extend(std::iter::repeat_with(Cell::empty).take(3)),
                }
            }
            let mean_change = relative_change(&cells[2], &cells[5]);
            let cv_change = relative_change(&cells[3], &cells[6]);
            let cv_ratio = ratio(&cells[3], &cells[6]);
            cells.push(mean_change);
            cells.push(cv_change);
            if with_ratio {
                cells.push(cv_ratio);
            }
            cells.push(cell(&level.target));
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

    fn source(levels: &str) -> String {
        format!(
            r#"{{
                "levelList": {levels},
                "projectMonthDataList": [{{
                    "analytesName": "GLU",
                    "monthDataList": [
                        {{"level": 1, "target": 4.0, "monthData": [
                            {{"yearMonth": "2024-05", "mean": 5.0, "cv": 2.0, "dataCount": 20}},
                            {{"yearMonth": "2024-06", "mean": 5.5, "cv": 2.5, "dataCount": 18}}
                        ]}},
                        {{"level": 2, "target": 4.0, "monthData": [
                            {{"yearMonth": "2024-06", "mean": 0.0, "cv": 1.0, "dataCount": 3}}
                        ]}}
                    ]
                }}]
            }}"#
        )
    }

    #[test]
    fn compares_the_first_two_months() {
        let extracted = extract(&source("[1, 2]")).unwrap();
        assert_eq!(extracted.column_labels, ["2024-05", "2024-06"]);

        let row = &extracted.rows[0];
        assert_eq!(row.arity(), 11);
        assert_eq!(*row.cell(1), Cell::text("1"));
        assert_eq!(*row.cell(4), Cell::text("20"));
        assert_eq!(*row.cell(8), Cell::text("10.00%"));
        assert_eq!(*row.cell(9), Cell::text("25.00%"));
        assert_eq!(*row.cell(10), Cell::Number(4.0));
    }

    #[test]
    fn a_single_month_leaves_the_comparison_empty() {
        let extracted = extract(&source("[1, 2]")).unwrap();
        let row = &extracted.rows[1];
        assert!(row.cell(0).is_blank());
        assert!((5..10).all(|column| row.cell(column).is_blank()));
    }

    #[test]
    fn one_level_adds_the_cv_ratio() {
        let extracted = extract(&source("[1]")).unwrap();
        let row = &extracted.rows[0];
        assert_eq!(row.arity(), 12);
        assert_eq!(*row.cell(10), Cell::Number(0.8));
        assert_eq!(*row.cell(11), Cell::Number(4.0));
    }
}
