//! Layout configuration for one report variant.
//!
//! Every number the layout engine needs (page geometry, column table, line
//! heights, capacity thresholds) lives here and is passed explicitly.

use serde::{Deserialize, Serialize};

use crate::column::{ColumnMerge, ColumnSpec};
use crate::error::{ProfileError, Result};

/// Landscape A4 with 0.15in margins, in points.
pub const A4_LANDSCAPE_USABLE_WIDTH: f32 = 820.29;
pub const A4_LANDSCAPE_USABLE_HEIGHT: f32 = 573.68;

/// Usable drawing area of a page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageGeometry {
    pub usable_width: f32,
    pub usable_height: f32,
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self {
            usable_width: A4_LANDSCAPE_USABLE_WIDTH,
            usable_height: A4_LANDSCAPE_USABLE_HEIGHT,
        }
    }
}

/// Font size and line leading used to wrap cell and summary text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub font_size: f32,
    pub leading: f32,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_size: 9.0,
            leading: 12.0,
        }
    }
}

/// Row height constants.
///
/// A single-line row carries extra padding (`single_line`), wrapped rows use a
/// tight per-line height (`wrapped_line`). The two are independent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineMetrics {
    pub single_line: f32,
    pub wrapped_line: f32,
}

impl Default for LineMetrics {
    fn default() -> Self {
        Self {
            single_line: 19.0,
            wrapped_line: 12.0,
        }
    }
}

impl LineMetrics {
    /// Drawn height of a cell that wraps to `lines` lines (at least one).
    pub fn height_for(&self, lines: usize) -> f32 {
        match lines {
            0 | 1 => self.single_line,
            n => n as f32 * self.wrapped_line,
        }
    }

    /// Line count expressed in single-line units.
    pub fn normalized(&self, lines: usize) -> f32 {
        match lines {
            0 | 1 => 1.0,
            n => n as f32 * self.wrapped_line / self.single_line,
        }
    }

    /// Height of `units` single-line rows.
    pub fn units_to_height(&self, units: f32) -> f32 {
        units * self.single_line
    }
}

/// A threshold that depends on whether the identity header overflowed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseCapacity {
    pub normal: f32,
    pub header_overflow: f32,
}

impl PhaseCapacity {
    pub fn select(&self, header_overflowed: bool) -> f32 {
        if header_overflowed {
            self.header_overflow
        } else {
            self.normal
        }
    }
}

/// Page capacities, in single-line row units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapacityPlan {
    /// Capacity of the first page below the identity header.
    pub first_page: PhaseCapacity,
    /// Largest normalized line total that still leaves the summary block on
    /// the first page.
    pub one_page_limit: PhaseCapacity,
    /// Capacity of every following page.
    pub full_page: f32,
    /// Width of the "almost full" band below `full_page`.
    #[serde(default)]
    pub full_band: f32,
}

impl Default for CapacityPlan {
    fn default() -> Self {
        Self {
            first_page: PhaseCapacity {
                normal: 20.0,
                header_overflow: 19.0,
            },
            one_page_limit: PhaseCapacity {
                normal: 15.0,
                header_overflow: 14.0,
            },
            full_page: 30.0,
            full_band: 0.0,
        }
    }
}

/// Free-text fields of the identity header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderField {
    TimeRange,
    Instrument,
    Laboratory,
    LotAndExpiry,
}

/// Width allotted to one header field before it overflows onto a second line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeaderFieldBudget {
    pub field: HeaderField,
    pub max_width: f32,
    /// Overflowing this field shrinks the first page. When false the field
    /// still wraps but fits in the header's spare space.
    #[serde(default = "default_resizes")]
    pub resizes: bool,
}

impl HeaderFieldBudget {
    pub fn new(field: HeaderField, max_width: f32) -> Self {
        Self {
            field,
            max_width,
            resizes: true,
        }
    }

    /// A budget whose overflow does not change the first page.
    pub fn wrap_only(field: HeaderField, max_width: f32) -> Self {
        Self {
            resizes: false,
            ..Self::new(field, max_width)
        }
    }
}

fn default_resizes() -> bool {
    true
}

/// Geometry of the identity header on the first page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityHeaderSpec {
    /// Height from the top of the usable area to the first table row.
    pub height: f32,
    /// Height when a budgeted field overflowed.
    pub overflow_height: f32,
    pub font_size: f32,
    #[serde(default)]
    pub budgets: Vec<HeaderFieldBudget>,
}

impl Default for IdentityHeaderSpec {
    fn default() -> Self {
        Self {
            height: 175.0,
            overflow_height: 195.0,
            font_size: 11.0,
            budgets: Vec::new(),
        }
    }
}

/// The free-text summary box drawn after the table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryBlockSpec {
    pub title: String,
    pub min_height: f32,
    pub wrap_width: f32,
    /// Space kept free below the box for the signature line.
    pub bottom_reserve: f32,
    /// Extra height added to the text before the fit check.
    #[serde(default)]
    pub padding: f32,
}

/// Complete layout configuration of one report variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportProfile {
    pub name: String,
    #[serde(default)]
    pub page: PageGeometry,
    pub columns: Vec<ColumnSpec>,
    #[serde(default)]
    pub merges: Vec<ColumnMerge>,
    #[serde(default)]
    pub designator_column: Option<usize>,
    /// Horizontal padding subtracted from a column width before wrapping.
    pub cell_padding: f32,
    #[serde(default)]
    pub text: TextStyle,
    #[serde(default)]
    pub line_metrics: LineMetrics,
    #[serde(default)]
    pub capacity: CapacityPlan,
    /// Blank rows emitted when the source produced none.
    #[serde(default)]
    pub placeholder_rows: usize,
    #[serde(default)]
    pub header: IdentityHeaderSpec,
    #[serde(default)]
    pub summary: Option<SummaryBlockSpec>,
}

impl ReportProfile {
    /// A profile with default geometry and thresholds over `columns`.
    pub fn new(name: impl Into<String>, columns: Vec<ColumnSpec>) -> Self {
        Self {
            name: name.into(),
            page: PageGeometry::default(),
            columns,
            merges: Vec::new(),
            designator_column: None,
            cell_padding: 2.0,
            text: TextStyle::default(),
            line_metrics: LineMetrics::default(),
            capacity: CapacityPlan::default(),
            placeholder_rows: 0,
            header: IdentityHeaderSpec::default(),
            summary: None,
        }
    }

    #[must_use]
    pub fn with_designator(mut self, column: usize) -> Self {
        self.designator_column = Some(column);
        self
    }

    #[must_use]
    pub fn with_merge(mut self, merge: ColumnMerge) -> Self {
        self.merges.push(merge);
        self
    }

    #[must_use]
    pub fn with_capacity(mut self, capacity: CapacityPlan) -> Self {
        self.capacity = capacity;
        self
    }

    #[must_use]
    pub fn with_placeholder_rows(mut self, rows: usize) -> Self {
        self.placeholder_rows = rows;
        self
    }

    #[must_use]
    pub fn with_cell_padding(mut self, padding: f32) -> Self {
        self.cell_padding = padding;
        self
    }

    #[must_use]
    pub fn with_header(mut self, header: IdentityHeaderSpec) -> Self {
        self.header = header;
        self
    }

    #[must_use]
    pub fn with_summary(mut self, summary: Option<SummaryBlockSpec>) -> Self {
        self.summary = summary;
        self
    }

    pub fn arity(&self) -> usize {
        self.columns.len()
    }

    pub fn column_widths(&self) -> Vec<f32> {
        self.columns.iter().map(|column| column.width).collect()
    }

    /// Indices of the wrappable columns, in table order.
    pub fn wrappable_columns(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .filter(|(_, column)| column.wrappable)
            .map(|(index, _)| index)
            .collect()
    }

    /// Width available to text in `column`: the merged width if the column
    /// starts a merge, minus the cell padding.
    pub fn text_width(&self, column: usize) -> f32 {
        let span = self
            .merges
            .iter()
            .find(|merge| merge.first == column)
            .map_or(column..=column, |merge| merge.first..=merge.last);
        let width: f32 = span
            .filter_map(|index| self.columns.get(index))
            .map(|spec| spec.width)
            .sum();
        width - self.cell_padding
    }

    pub fn validate(&self) -> Result<()> {
        let profile = || self.name.clone();
        let arity = self.arity();
        if arity == 0 {
            return Err(ProfileError::NoColumns { profile: profile() });
        }
        for (column, spec) in self.columns.iter().enumerate() {
            if spec.width.is_nan() || spec.width <= 0.0 {
                return Err(ProfileError::InvalidColumnWidth {
                    profile: profile(),
                    column,
                    width: spec.width,
                });
            }
        }
        if let Some(column) = self.designator_column {
            match self.columns.get(column) {
                None => {
                    return Err(ProfileError::DesignatorOutOfRange {
                        profile: profile(),
                        column,
                        arity,
                    });
                }
                Some(spec) if !spec.wrappable => {
                    return Err(ProfileError::DesignatorNotWrappable {
                        profile: profile(),
                        column,
                    });
                }
                Some(_) => {}
            }
        }
        for merge in &self.merges {
            if merge.first > merge.last || merge.last >= arity {
                return Err(ProfileError::InvalidMerge {
                    profile: profile(),
                    first: merge.first,
                    last: merge.last,
                    arity,
                });
            }
        }
        for column in self.wrappable_columns() {
            let width = self.text_width(column);
            if width.is_nan() || width <= 0.0 {
                return Err(ProfileError::NoTextWidth {
                    profile: profile(),
                    column,
                    padding: self.cell_padding,
                });
            }
        }
        let positives = [
            ("line_metrics.single_line", self.line_metrics.single_line),
            ("line_metrics.wrapped_line", self.line_metrics.wrapped_line),
            ("text.font_size", self.text.font_size),
            ("text.leading", self.text.leading),
            ("capacity.first_page.normal", self.capacity.first_page.normal),
            (
                "capacity.first_page.header_overflow",
                self.capacity.first_page.header_overflow,
            ),
            ("capacity.full_page", self.capacity.full_page),
            ("page.usable_width", self.page.usable_width),
            ("page.usable_height", self.page.usable_height),
        ];
        for (field, value) in positives {
            if value.is_nan() || value <= 0.0 {
                return Err(ProfileError::NonPositive {
                    profile: profile(),
                    field,
                    value,
                });
            }
        }
        if self.capacity.full_band < 0.0 {
            return Err(ProfileError::NegativeBand {
                profile: profile(),
                value: self.capacity.full_band,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn height_formula_is_asymmetric() {
        let metrics = LineMetrics::default();
        assert_eq!(metrics.height_for(0), 19.0);
        assert_eq!(metrics.height_for(1), 19.0);
        assert_eq!(metrics.height_for(2), 24.0);
        assert_eq!(metrics.height_for(3), 36.0);
        assert_eq!(metrics.normalized(1), 1.0);
        assert!((metrics.normalized(19) - 12.0).abs() < 1e-5);
    }

    #[test]
    fn merged_columns_measure_at_combined_width() {
        let profile = ReportProfile::new(
            "cv",
            vec![ColumnSpec::wrapping(50.0), ColumnSpec::fixed(50.0)],
        )
        .with_merge(ColumnMerge::new(0, 1))
        .with_cell_padding(4.0);
        assert_eq!(profile.text_width(0), 96.0);
        assert_eq!(profile.text_width(1), 46.0);
    }

    #[test]
    fn designator_must_be_wrappable() {
        let profile =
            ReportProfile::new("ooc", vec![ColumnSpec::fixed(40.0)]).with_designator(0);
        assert!(matches!(
            profile.validate(),
            Err(ProfileError::DesignatorNotWrappable { column: 0, .. })
        ));
    }
}
