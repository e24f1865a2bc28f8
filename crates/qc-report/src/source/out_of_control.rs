//! Out-of-control events (`projectDataList`).

use serde::Deserialize;
use serde_json::Value;

use qc_model::{Cell, Row};

use super::{Extracted, ReportHeader, cell, designator, nullable};
use crate::error::Result;

const REJECTED: &str = "拒绝";
const ACCEPTED: &str = "接受";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct Source {
    #[serde(flatten)]
    header: ReportHeader,
    #[serde(deserialize_with = "nullable")]
    project_data_list: Vec<Project>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct Project {
    analytes_name: Option<Cell>,
    #[serde(deserialize_with = "nullable")]
    point_data_list: Vec<Point>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct Point {
    level: Option<Cell>,
    create_time: Option<Cell>,
    point_value: Option<Cell>,
    mean: Option<Cell>,
    sd: Option<Cell>,
    z_point: Option<Cell>,
    acceptable: Option<Value>,
    operation_user_name: Option<Cell>,
    #[serde(deserialize_with = "nullable")]
    spc_rule: String,
    #[serde(deserialize_with = "nullable")]
    action_log_list: Vec<ActionLog>,
    #[serde(deserialize_with = "nullable")]
    remark: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ActionLog {
    #[serde(deserialize_with = "nullable")]
    action_desc: String,
    #[serde(deserialize_with = "nullable")]
    operation_user_name: String,
    #[serde(deserialize_with = "nullable")]
    create_time: String,
}

impl ActionLog {
    /// `desc(user, - YYYY-MM-DD)`.
    fn describe(&self) -> String {
        let date: String = self.create_time.chars().take(10).collect();
        format!("{}({}, - {date})", self.action_desc, self.operation_user_name)
    }
}

impl Point {
    /// Zero (or `false`) is a rejection, any other value an acceptance.
    fn state(&self) -> &'static str {
        match &self.acceptable {
            None | Some(Value::Null) => "",
            Some(Value::Number(number)) if number.as_f64() == Some(0.0) => REJECTED,
            Some(Value::Bool(false)) => REJECTED,
            Some(_) => ACCEPTED,
        }
    }

    /// `rule, log // log // remark`.
    fn handling(&self) -> String {
        let logs: Vec<String> = self.action_log_list.iter().map(ActionLog::describe).collect();
        format!("{}, {} // {}", self.spc_rule, logs.join(" // "), self.remark)
    }
}

/// `[analyte, level, time, value, mean, sd, z, state, operator, handling]`.
pub(super) fn extract(json: &str) -> Result<Extracted> {
    let source: Source = serde_json::from_str(json)?;

    let mut rows = Vec::new();
    for project in &source.project_data_list {
        for (index, point) in project.point_data_list.iter().enumerate() {
            rows.push(Row::new(vec![
                designator(&project.analytes_name, index == 0),
                cell(&point.level),
                cell(&point.create_time),
                cell(&point.point_value),
                cell(&point.mean),
                cell(&point.sd),
                cell(&point.z_point),
                Cell::text(point.state()),
                cell(&point.operation_user_name),
                Cell::Text(point.handling()),
            ]));
        }
    }

    Ok(Extracted {
        header: source.header,
        record_count: rows.len(),
        rows,
        column_labels: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = r#"{
        "projectDataList": [{
            "analytesName": "K",
            "pointDataList": [
                {
                    "level": "L1", "createTime": "2024-04-02 08:15:00",
                    "pointValue": 5.123, "mean": 4.8, "sd": 0.1, "zPoint": 3.23,
                    "acceptable": 0, "operationUserName": "王敏", "spcRule": "1-3s",
                    "actionLogList": [
                        {"actionDesc": "重新定标", "operationUserName": "王敏", "createTime": "2024-04-02 09:00:00"},
                        {"actionDesc": "复测", "operationUserName": "李强", "createTime": "2024-04-03"}
                    ],
                    "remark": "已处理"
                },
                {"level": "L2", "acceptable": 1},
                {"level": "L3", "acceptable": null}
            ]
        }]
    }"#;

    #[test]
    fn flattens_points_with_their_handling() {
        let extracted = extract(SOURCE).unwrap();
        assert_eq!(extracted.record_count, 3);

        let row = &extracted.rows[0];
        assert_eq!(row.arity(), 10);
        assert_eq!(*row.cell(0), Cell::text("K"));
        assert_eq!(*row.cell(7), Cell::text("拒绝"));
        assert_eq!(
            *row.cell(9),
            Cell::text("1-3s, 重新定标(王敏, - 2024-04-02) // 复测(李强, - 2024-04-03) // 已处理")
        );
    }

    #[test]
    fn acceptance_labels() {
        let extracted = extract(SOURCE).unwrap();
        assert_eq!(*extracted.rows[1].cell(7), Cell::text("接受"));
        assert!(extracted.rows[2].cell(7).is_blank());
        assert!(extracted.rows[1].cell(0).is_blank());
        assert_eq!(*extracted.rows[1].cell(9), Cell::text(",  // "));
    }
}
