//! Per-cell style overlays.
//!
//! Flagging rules produce a sparse map keyed by `(row, column)` instead of
//! issuing style calls against a live table, so the drawing backend only ever
//! sees the finished overlay.

use std::collections::BTreeMap;
use std::ops::Range;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextColor {
    #[default]
    Black,
    Red,
    Blue,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellStyle {
    pub color: TextColor,
    pub bold: bool,
}

impl CellStyle {
    /// Regular black text.
    pub fn normal() -> Self {
        Self::default()
    }

    /// Bold text in `color`.
    pub fn highlight(color: TextColor) -> Self {
        Self { color, bold: true }
    }
}

/// Sparse `(row, column) -> style` map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StyleOverlay {
    #[serde(with = "entries")]
    styles: BTreeMap<(usize, usize), CellStyle>,
}

impl StyleOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the style of one cell; later writes win.
    pub fn insert(&mut self, row: usize, column: usize, style: CellStyle) {
        self.styles.insert((row, column), style);
    }

    pub fn get(&self, row: usize, column: usize) -> Option<&CellStyle> {
        self.styles.get(&(row, column))
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = ((usize, usize), &CellStyle)> {
        self.styles.iter().map(|(key, style)| (*key, style))
    }

    /// Entries whose row falls in `rows`, re-keyed relative to `rows.start`.
    pub fn rebase(&self, rows: Range<usize>) -> StyleOverlay {
        let start = rows.start;
        let styles = self
            .styles
            .range((rows.start, 0)..(rows.end, 0))
            .map(|(&(row, column), style)| ((row - start, column), *style))
            .collect();
        StyleOverlay { styles }
    }
}

/// Serialize the tuple-keyed map as a list of `{row, column, style}` entries.
mod entries {
    use std::collections::BTreeMap;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::CellStyle;

    #[derive(Serialize, Deserialize)]
    struct Entry {
        row: usize,
        column: usize,
        #[serde(flatten)]
        style: CellStyle,
    }

    pub fn serialize<S: Serializer>(
        styles: &BTreeMap<(usize, usize), CellStyle>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let entries: Vec<Entry> = styles
            .iter()
            .map(|(&(row, column), style)| Entry {
                row,
                column,
                style: *style,
            })
            .collect();
        entries.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<(usize, usize), CellStyle>, D::Error> {
        let entries = Vec::<Entry>::deserialize(deserializer)?;
        Ok(entries
            .into_iter()
            .map(|entry| ((entry.row, entry.column), entry.style))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rebase_keeps_only_rows_in_range() {
        let mut overlay = StyleOverlay::new();
        overlay.insert(1, 4, CellStyle::highlight(TextColor::Red));
        overlay.insert(5, 3, CellStyle::normal());
        overlay.insert(6, 0, CellStyle::highlight(TextColor::Blue));

        let page = overlay.rebase(5..6);
        assert_eq!(page.len(), 1);
        assert_eq!(page.get(0, 3), Some(&CellStyle::normal()));
    }
}
