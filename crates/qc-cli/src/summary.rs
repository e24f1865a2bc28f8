use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use qc_layout::PagePhase;
use qc_report::RenderSummary;

use crate::types::{OutputTarget, RenderOutcome};

/// Print the page table. It goes to stderr when the page plans themselves
/// are written to stdout.
pub fn print_summary(outcome: &RenderOutcome) {
    let mut lines = vec![
        format!("Input: {}", outcome.input.display()),
        format!(
            "Report: {} ({} records, profile {})",
            outcome.summary.variant, outcome.summary.record_count, outcome.summary.profile
        ),
    ];
    match &outcome.target {
        OutputTarget::File(path) => lines.push(format!("Pages: {}", path.display())),
        OutputTarget::Stdout => lines.push("Pages: <stdout>".to_string()),
        OutputTarget::Discarded => lines.push("Pages: not written (dry run)".to_string()),
    }
    if outcome.summary.header_overflowed {
        lines.push("Identity header overflowed; first page shortened".to_string());
    }
    let table = page_table(&outcome.summary);

    if outcome.target == OutputTarget::Stdout {
        for line in lines {
            eprintln!("{line}");
        }
        eprintln!("{table}");
    } else {
        for line in lines {
            println!("{line}");
        }
        println!("{table}");
    }
}

pub fn page_table(summary: &RenderSummary) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Page"),
        header_cell("Phase"),
        header_cell("Rows"),
        header_cell("Table height"),
        header_cell("Summary"),
        header_cell("Signature"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    for page in &summary.pages {
        let rows = if page.rows == 0 {
            dim_cell("-")
        } else {
            Cell::new(format!("{}-{}", page.first_row + 1, page.first_row + page.rows))
        };
        table.add_row(vec![
            Cell::new(page.number),
            phase_cell(page.phase),
            rows,
            Cell::new(format!("{:.1}", page.table_height)),
            flag_cell(page.summary),
            flag_cell(page.signature),
        ]);
    }
    if summary.summary_pushed {
        table.add_row(vec![
            dim_cell(""),
            Cell::new("summary moved to its own page").fg(Color::Yellow),
        ]);
    }
    table
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn phase_cell(phase: PagePhase) -> Cell {
    let cell = Cell::new(phase);
    match phase {
        PagePhase::First => cell.fg(Color::Blue).add_attribute(Attribute::Bold),
        PagePhase::Interior => cell,
        PagePhase::Last => cell.fg(Color::Green),
        PagePhase::Closing => cell.fg(Color::Yellow),
    }
}

fn flag_cell(value: bool) -> Cell {
    if value {
        Cell::new("yes").fg(Color::Green)
    } else {
        dim_cell("-")
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
