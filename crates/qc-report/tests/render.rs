//! End-to-end rendering tests.

use qc_layout::{AdvanceMeasurer, LayoutError, PagePhase};
use qc_model::{Cell, CellStyle, ColumnSpec, ReportProfile, TextColor};
use qc_report::{
    JsonLinesSink, PageCollector, RenderSummary, ReportError, ReportVariant, render_report,
};
use serde_json::{Value, json};

fn render(variant: ReportVariant, source: &Value) -> (RenderSummary, PageCollector) {
    let mut sink = PageCollector::default();
    let summary = render_report(
        variant,
        &source.to_string(),
        None,
        &AdvanceMeasurer::default(),
        &mut sink,
    )
    .unwrap();
    (summary, sink)
}

fn outline(summary: &RenderSummary) -> String {
    summary
        .pages
        .iter()
        .map(|page| {
            let mut line = format!(
                "page {} {} rows {}..{} height {:.0}",
                page.number,
                page.phase,
                page.first_row,
                page.first_row + page.rows,
                page.table_height
            );
            if page.summary {
                line.push_str(" summary");
            }
            if page.signature {
                line.push_str(" signature");
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// `analytes` analytes with two levels each; the first level of every other
/// analyte has a CV above target in January.
fn cv_annual_source(analytes: usize, summary: &str) -> Value {
    let list: Vec<Value> = (0..analytes)
        .map(|index| {
            let january = if index % 2 == 0 { 6.5 } else { 2.5 };
            json!({
                "analytesName": format!("A{index}"),
                "target": 5.0,
                "levelData": [
                    {"level": 1, "dataList": [{"yearMonth": "2024-01", "cv": january}]},
                    {"level": 2, "dataList": [{"yearMonth": "2024-02", "cv": 3.0}]}
                ]
            })
        })
        .collect();
    json!({
        "reportCode": "CV-2024",
        "startDateStr": "2024.01.01",
        "endDateStr": "2024.12.31",
        "kitsName": "Cobas c702",
        "laboratoryName": "Central Lab",
        "laboratoryRelation": "Main",
        "batchCode": "B-17",
        "qualityControls": "Liquichek (Level 1)",
        "batchExpirationDateStr": "2025.06.30",
        "summary": summary,
        "cvDataList": list
    })
}

#[test]
fn cv_annual_report_fits_its_summary_under_the_table() {
    let (summary, sink) = render(ReportVariant::CvAnnual, &cv_annual_source(20, "Stable."));

    insta::assert_snapshot!(outline(&summary), @r"
    page 1 first rows 0..20 height 380
    page 2 last rows 20..40 height 380 summary signature
    ");
    assert_eq!(summary.record_count, 40);
    assert!(!summary.summary_pushed);

    let meta = sink.meta.unwrap();
    assert_eq!(meta.title, "批CV均值年汇总报告");
    assert_eq!(meta.column_labels.len(), 12);
    let lot = &meta.header.lines[3];
    assert_eq!(lot.text, "B-17, Liquichek , 2025.06.30");
    assert!(sink.finished);
}

#[test]
fn long_summaries_move_to_a_closing_page() {
    let text = vec!["reviewed"; 20].join("\n");
    let (summary, sink) = render(ReportVariant::CvAnnual, &cv_annual_source(20, &text));

    insta::assert_snapshot!(outline(&summary), @r"
    page 1 first rows 0..20 height 380
    page 2 last rows 20..40 height 380
    page 3 closing rows 40..40 height 0 summary signature
    ");
    assert!(summary.summary_pushed);
    let closing = sink.pages.last().unwrap().summary.as_ref().unwrap();
    assert_eq!(closing.lines.len(), 20);
    assert_eq!(closing.title, "总结:");
}

#[test]
fn cv_values_above_target_are_flagged_per_page() {
    let (_, sink) = render(ReportVariant::CvAnnual, &cv_annual_source(20, ""));

    let first = &sink.pages[0];
    assert_eq!(first.styles.get(0, 3), Some(&CellStyle::highlight(TextColor::Red)));
    assert_eq!(first.styles.get(2, 3), Some(&CellStyle::normal()));
    // Empty months are not judged.
    assert_eq!(first.styles.get(0, 4), None);

    // Row 20 is the first row of the second page.
    let second = &sink.pages[1];
    assert_eq!(second.styles.get(0, 3), Some(&CellStyle::highlight(TextColor::Red)));
}

#[test]
fn batch_statistics_are_formatted_after_flagging() {
    let source = json!({
        "batchManageList": [{
            "batchCode": "B-01",
            "testProjectList": [{
                "analytesName": "ALT",
                "levelDataList": [
                    {"level": 1, "testMean": 40.0, "testSd": 1.0, "monthMean": 42.5,
                     "monthCv": 3.456, "goalCv": 3.0},
                    {"level": 2, "testMean": 80.0, "testSd": 2.0, "monthMean": 80.5,
                     "monthCv": 1.5, "goalCv": 3.0}
                ]
            }]
        }]
    });
    let (summary, sink) = render(ReportVariant::BatchMonthly, &source);
    assert_eq!(summary.page_count(), 1);

    let page = &sink.pages[0];
    assert_eq!(*page.rows[0].cell(8), Cell::text("3.46"));
    assert_eq!(*page.rows[0].cell(6), Cell::text("42.50"));
    assert_eq!(page.styles.get(0, 8), Some(&CellStyle::highlight(TextColor::Red)));
    assert_eq!(page.styles.get(0, 6), Some(&CellStyle::highlight(TextColor::Red)));
    assert_eq!(page.styles.get(1, 6), Some(&CellStyle::normal()));
}

#[test]
fn empty_sources_render_placeholder_rows() {
    let (summary, sink) = render(ReportVariant::CvTwoMonth, &json!({"levelList": [1, 2]}));

    assert_eq!(summary.record_count, 0);
    assert_eq!(summary.profile, "cv-two-month");
    let page = &sink.pages[0];
    assert_eq!(page.rows.len(), 2);
    assert!(page.rows.iter().all(|row| row.arity() == 11));
}

#[test]
fn single_level_two_month_reports_use_the_ratio_columns() {
    let source = json!({
        "levelList": [1],
        "projectMonthDataList": [{
            "analytesName": "GLU",
            "monthDataList": [{"level": 1, "target": 4.0, "monthData": [
                {"yearMonth": "2024-05", "mean": 5.0, "cv": 2.0, "dataCount": 20},
                {"yearMonth": "2024-06", "mean": 5.5, "cv": 2.5, "dataCount": 18}
            ]}]
        }]
    });
    let (_, sink) = render(ReportVariant::CvTwoMonth, &source);

    let row = &sink.pages[0].rows[0];
    assert_eq!(row.arity(), 12);
    assert_eq!(*row.cell(10), Cell::text("0.80"));
    assert_eq!(*row.cell(11), Cell::text("4.00"));
}

#[test]
fn profile_overrides_must_match_the_row_arity() {
    let profile = ReportProfile::new("narrow", vec![ColumnSpec::fixed(100.0); 5]);
    let mut sink = PageCollector::default();
    let error = render_report(
        ReportVariant::OutOfControl,
        r#"{"projectDataList": [{"analytesName": "K", "pointDataList": [{"level": 1}]}]}"#,
        Some(profile),
        &AdvanceMeasurer::default(),
        &mut sink,
    )
    .unwrap_err();

    assert!(matches!(
        error,
        ReportError::ArityMismatch {
            expected: 5,
            found: 10,
            ..
        }
    ));
    assert!(sink.meta.is_none());
}

#[test]
fn overflowing_rows_still_finish_the_document() {
    let remark = "note\n".repeat(80);
    let source = json!({
        "projectDataList": [{
            "analytesName": "K",
            "pointDataList": [{"level": 1, "remark": remark}]
        }]
    });
    let mut sink = JsonLinesSink::new(Vec::new());
    let error = render_report(
        ReportVariant::OutOfControl,
        &source.to_string(),
        None,
        &AdvanceMeasurer::default(),
        &mut sink,
    )
    .unwrap_err();

    assert!(matches!(
        error,
        ReportError::Layout(LayoutError::LayoutOverflow { row: 0, .. })
    ));
    let output = String::from_utf8(sink.into_inner()).unwrap();
    let kinds: Vec<String> = output
        .lines()
        .map(|line| {
            let value: Value = serde_json::from_str(line).unwrap();
            value["instruction"].as_str().unwrap().to_string()
        })
        .collect();
    assert_eq!(kinds, ["begin", "finish"]);
}

#[test]
fn out_of_control_reports_close_on_the_first_page() {
    let source = json!({
        "projectDataList": [{
            "analytesName": "K",
            "pointDataList": [
                {"level": 1, "pointValue": 5.123, "mean": 4.8, "sd": 0.1, "zPoint": 3.23,
                 "acceptable": 0, "spcRule": "1-3s", "remark": "recalibrated"},
                {"level": 2, "acceptable": 1}
            ]
        }]
    });
    let (summary, sink) = render(ReportVariant::OutOfControl, &source);

    assert_eq!(summary.page_count(), 1);
    assert_eq!(summary.pages[0].phase, PagePhase::First);
    assert!(summary.pages[0].signature);
    assert!(!summary.pages[0].summary);

    let page = &sink.pages[0];
    assert_eq!(*page.rows[0].cell(3), Cell::text("5.12"));
    assert_eq!(*page.rows[0].cell(7), Cell::text("拒绝"));
    assert_eq!(page.table_top, 155.0);
}
