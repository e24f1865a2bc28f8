//! Numeric cell formatting.

use serde::{Deserialize, Serialize};

use qc_model::{Cell, Row};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumberFormat {
    /// `3.14159` becomes `"3.14"`.
    Fixed2,
    /// `3.14159` becomes `"3.14%"`.
    Percent2,
}

impl NumberFormat {
    pub fn apply(&self, value: f64) -> String {
        match self {
            NumberFormat::Fixed2 => format!("{value:.2}"),
            NumberFormat::Percent2 => format!("{value:.2}%"),
        }
    }
}

/// Render the numeric cells of the listed columns as text.
///
/// Only numbers are touched: text cells, including already formatted
/// values and non-numeric placeholders, pass through unchanged, so
/// formatting a row twice gives the same result.
pub fn format_row(row: &Row, formats: &[(usize, NumberFormat)]) -> Row {
    let mut formatted = row.clone();
    for &(column, format) in formats {
        if let Cell::Number(value) = *row.cell(column) {
            formatted.set(column, Cell::Text(format.apply(value)));
        }
    }
    formatted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> Row {
        Row::new(vec![
            Cell::text("ALT"),
            Cell::Number(3.14159),
            Cell::text("n/a"),
            Cell::Number(2.0),
        ])
    }

    #[test]
    fn formats_numbers_and_passes_text_through() {
        let formats = [(1, NumberFormat::Fixed2), (2, NumberFormat::Fixed2), (3, NumberFormat::Percent2)];
        let formatted = format_row(&row(), &formats);
        assert_eq!(
            formatted.cells(),
            &[
                Cell::text("ALT"),
                Cell::text("3.14"),
                Cell::text("n/a"),
                Cell::text("2.00%"),
            ]
        );
    }

    #[test]
    fn formatting_is_idempotent() {
        let formats = [(1, NumberFormat::Fixed2), (3, NumberFormat::Fixed2)];
        let once = format_row(&row(), &formats);
        assert_eq!(format_row(&once, &formats), once);
    }

    #[test]
    fn columns_past_the_row_are_ignored() {
        let formatted = format_row(&row(), &[(9, NumberFormat::Fixed2)]);
        assert_eq!(formatted, row());
    }
}
