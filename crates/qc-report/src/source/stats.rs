//! Monthly and batch statistics (`testProjectList`, `batchManageList`).
//!
//! Both reports print the same nineteen statistics per level and differ only
//! in their two leading group columns.

use serde::Deserialize;

use qc_model::{Cell, Row};

use super::{Extracted, ReportHeader, cell, designator, nullable};
use crate::error::Result;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct MonthlySource {
    #[serde(flatten)]
    header: ReportHeader,
    #[serde(deserialize_with = "nullable")]
    test_project_list: Vec<TestProject>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct BatchSource {
    #[serde(flatten)]
    header: ReportHeader,
    #[serde(deserialize_with = "nullable")]
    batch_manage_list: Vec<Batch>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct Batch {
    batch_code: Option<Cell>,
    #[serde(deserialize_with = "nullable")]
    test_project_list: Vec<TestProject>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct TestProject {
    analytes_name: Option<Cell>,
    measure_unit: Option<Cell>,
    #[serde(deserialize_with = "nullable")]
    level_data_list: Vec<LevelStats>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct LevelStats {
    level: Option<Cell>,
    test_mean: Option<Cell>,
    test_sd: Option<Cell>,
    test_cv: Option<Cell>,
    month_mean: Option<Cell>,
    month_sd: Option<Cell>,
    month_cv: Option<Cell>,
    month_data_count: Option<Cell>,
    month_uncontrolled_data_count: Option<Cell>,
    month_control_rate: Option<Cell>,
    control_mean: Option<Cell>,
    control_sd: Option<Cell>,
    control_cv: Option<Cell>,
    total_mean: Option<Cell>,
    total_sd: Option<Cell>,
    total_cv: Option<Cell>,
    total_data_count: Option<Cell>,
    total_uncontrolled_rate: Option<Cell>,
    goal_cv: Option<Cell>,
    goal_sd: Option<Cell>,
}

impl LevelStats {
    /// Level followed by its statistics, twenty cells.
    fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        [
            &self.level,
            &self.test_mean,
            &self.test_sd,
            &self.test_cv,
            &self.month_mean,
            &self.month_sd,
            &self.month_cv,
            &self.month_data_count,
            &self.month_uncontrolled_data_count,
            &self.month_control_rate,
            &self.control_mean,
            &self.control_sd,
            &self.control_cv,
            &self.total_mean,
            &self.total_sd,
            &self.total_cv,
            &self.total_data_count,
            &self.total_uncontrolled_rate,
            &self.goal_cv,
            &self.goal_sd,
        ]
        .into_iter()
        .map(cell)
    }
}

fn stats_row(first: Cell, second: Cell, level: &LevelStats) -> Row {
    let mut cells = Vec::with_capacity(22);
    cells.push(first);
    cells.push(second);
    cells.extend(level.cells());
    Row::new(cells)
}

/// `[analyte, unit, level, stats...]`.
pub(super) fn extract_monthly(json: &str) -> Result<Extracted> {
    let source: MonthlySource = serde_json::from_str(json)?;

    let mut rows = Vec::new();
    for project in &source.test_project_list {
        for (index, level) in project.level_data_list.iter().enumerate() {
            let first = index == 0;
            rows.push(stats_row(
                designator(&project.analytes_name, first),
                designator(&project.measure_unit, first),
                level,
            ));
        }
    }

    Ok(Extracted {
        header: source.header,
        record_count: rows.len(),
        rows,
        column_labels: Vec::new(),
    })
}

/// `[batch, analyte, level, stats...]`; the batch code appears once per
/// batch, the analyte once per analyte within it.
pub(super) fn extract_batches(json: &str) -> Result<Extracted> {
    let source: BatchSource = serde_json::from_str(json)?;

    let mut rows = Vec::new();
    for batch in &source.batch_manage_list {
        let mut batch_first = true;
        for project in &batch.test_project_list {
            for (index, level) in project.level_data_list.iter().enumerate() {
                rows.push(stats_row(
                    designator(&batch.batch_code, batch_first),
                    designator(&project.analytes_name, index == 0),
                    level,
                ));
                batch_first = false;
            }
        }
    }

    Ok(Extracted {
        header: source.header,
        record_count: rows.len(),
        rows,
        column_labels: Vec::new(),
    })
}
