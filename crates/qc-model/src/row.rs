//! Table rows and their cells.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// A single table cell.
///
/// The empty string is the "not applicable" sentinel; there is no separate
/// null variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Number(f64),
    Text(String),
}

impl Cell {
    /// The "not applicable" cell.
    pub fn empty() -> Self {
        Cell::Text(String::new())
    }

    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    /// True for empty or whitespace-only text. Numbers are never blank.
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Number(_) => false,
            Cell::Text(text) => text.trim().is_empty(),
        }
    }

    /// Numeric value of the cell, parsing numeric text.
    ///
    /// Unit suffixes are not stripped: `"3.5%"` is not numeric.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(value) if value.is_finite() => Some(*value),
            Cell::Number(_) => None,
            Cell::Text(text) => text.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        }
    }

    /// Text used for measuring and drawing the cell.
    pub fn display(&self) -> Cow<'_, str> {
        match self {
            Cell::Number(value) => Cow::Owned(value.to_string()),
            Cell::Text(text) => Cow::Borrowed(text.as_str()),
        }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Cell::empty()
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

/// An ordered, fixed-arity sequence of cells.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    cells: Vec<Cell>,
}

impl Row {
    pub fn new(cells: Vec<Cell>) -> Self {
        Self { cells }
    }

    /// A placeholder row of `arity` empty cells.
    pub fn blank(arity: usize) -> Self {
        Self {
            cells: vec![Cell::empty(); arity],
        }
    }

    pub fn arity(&self) -> usize {
        self.cells.len()
    }

    /// Cell at `column`; out-of-range columns read as empty.
    pub fn cell(&self, column: usize) -> Cow<'_, Cell> {
        match self.cells.get(column) {
            Some(cell) => Cow::Borrowed(cell),
            None => Cow::Owned(Cell::empty()),
        }
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Replace the cell at `column`, padding the row with empty cells if needed.
    pub fn set(&mut self, column: usize, cell: Cell) {
        if column >= self.cells.len() {
            self.cells.resize(column + 1, Cell::empty());
        }
        self.cells[column] = cell;
    }

    /// Numeric value at `column`.
    pub fn number(&self, column: usize) -> Option<f64> {
        self.cells.get(column).and_then(Cell::as_number)
    }
}

impl From<Vec<Cell>> for Row {
    fn from(cells: Vec<Cell>) -> Self {
        Self { cells }
    }
}

impl FromIterator<Cell> for Row {
    fn from_iter<I: IntoIterator<Item = Cell>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_and_numeric_text() {
        assert!(Cell::empty().is_blank());
        assert!(Cell::text("  ").is_blank());
        assert!(!Cell::Number(0.0).is_blank());
        assert_eq!(Cell::text(" 3.14 ").as_number(), Some(3.14));
        assert_eq!(Cell::text("3.5%").as_number(), None);
        assert_eq!(Cell::Number(f64::NAN).as_number(), None);
    }

    #[test]
    fn out_of_range_cells_read_empty() {
        let row = Row::new(vec![Cell::text("Glucose")]);
        assert_eq!(row.cell(0).display(), "Glucose");
        assert!(row.cell(7).is_blank());
    }

    #[test]
    fn set_pads_short_rows() {
        let mut row = Row::blank(1);
        row.set(3, Cell::Number(1.5));
        assert_eq!(row.arity(), 4);
        assert_eq!(row.number(3), Some(1.5));
    }
}
