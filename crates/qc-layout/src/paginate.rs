//! The pagination driver.
//!
//! [`Paginator`] walks the row stream page by page:
//!
//! 1. **First**: below the identity header, with a capacity reduced further
//!    when a header field overflowed. Short tables stay on this page together
//!    with the summary.
//! 2. **Interior**: full pages, for as long as the remainder is full or does
//!    not fit.
//! 3. **Last**: the remaining rows, followed by the summary when it fits.
//! 4. **Closing**: the summary and signature alone, when they were pushed off
//!    the last table page or nothing was left for it.
//!
//! Capacities are in single-line row units; a page holds `units * 19` points
//! of row height with the default line metrics.

use std::iter::FusedIterator;
use std::mem;

use tracing::debug;

use qc_model::{LineMetrics, ReportProfile, Row, StyleOverlay};

use crate::error::{LayoutError, Result};
use crate::groups::{apply_group_spans, compute_run_lengths, redistribute_height};
use crate::header::HeaderLayout;
use crate::heights::{RowHeights, RowMetrics, resolve_heights};
use crate::measure::TextMeasurer;
use crate::plan::{CellSpan, CornerRadii, PagePhase, PagePlan, SummaryPlacement};
use crate::summary::{SummaryFit, summary_height};

/// Slack for comparing sums of divided group heights.
const HEIGHT_TOLERANCE: f32 = 1e-3;

/// "Page is full" predicate for continuation pages.
///
/// A remainder at or above `capacity` is full, and so is one within `band`
/// units below it. Such a page is closed and the summary moves to the next
/// one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapacityBand {
    pub capacity: f32,
    pub band: f32,
}

impl CapacityBand {
    pub fn new(capacity: f32, band: f32) -> Self {
        Self { capacity, band }
    }

    pub fn is_full(&self, units: f32) -> bool {
        units >= self.capacity || (self.band > 0.0 && units > self.capacity - self.band)
    }
}

/// Number of leading rows whose heights fit in `capacity_units` single lines.
///
/// Walks the running total: overshooting at row `i` takes the `i` rows
/// before it, landing exactly on the limit takes `i + 1`.
pub fn fit_count(heights: &[f32], capacity_units: f32, metrics: &LineMetrics) -> usize {
    let limit = metrics.units_to_height(capacity_units);
    let mut total = 0.0f32;
    for (index, height) in heights.iter().enumerate() {
        total += height;
        if total > limit {
            return index;
        }
        if total == limit {
            return index + 1;
        }
    }
    heights.len()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    First,
    Interior,
    Closing,
    Done,
}

/// Page-by-page layout of one table.
///
/// Yields one [`PagePlan`] per physical page. After an error the iterator is
/// exhausted.
pub struct Paginator<'a, M: TextMeasurer + ?Sized> {
    profile: &'a ReportProfile,
    measurer: &'a M,
    rows: Vec<Row>,
    styles: StyleOverlay,
    header: HeaderLayout,
    summary: String,
    state: State,
    /// Global index of `rows[0]`.
    next_row: usize,
    pages: usize,
    summary_pushed: bool,
}

impl<'a, M: TextMeasurer + ?Sized> Paginator<'a, M> {
    /// Lay out `rows` with `profile`. Empty input is replaced by the
    /// profile's placeholder rows.
    pub fn new(profile: &'a ReportProfile, measurer: &'a M, rows: Vec<Row>) -> Self {
        let rows = if rows.is_empty() && profile.placeholder_rows > 0 {
            debug!(
                profile = %profile.name,
                count = profile.placeholder_rows,
                "no rows; using placeholder rows"
            );
            vec![Row::blank(profile.arity()); profile.placeholder_rows]
        } else {
            rows
        };
        Self {
            profile,
            measurer,
            rows,
            styles: StyleOverlay::default(),
            header: HeaderLayout::plain(&profile.header),
            summary: String::new(),
            state: State::First,
            next_row: 0,
            pages: 0,
            summary_pushed: false,
        }
    }

    #[must_use]
    pub fn with_header(mut self, header: HeaderLayout) -> Self {
        self.header = header;
        self
    }

    /// Summary text; ignored when the profile has no summary block.
    #[must_use]
    pub fn with_summary(mut self, text: impl Into<String>) -> Self {
        self.summary = text.into();
        self
    }

    /// Style overlay in whole-table coordinates.
    #[must_use]
    pub fn with_styles(mut self, styles: StyleOverlay) -> Self {
        self.styles = styles;
        self
    }

    fn first_page(&mut self) -> Result<Option<PagePlan>> {
        let profile = self.profile;
        profile.validate()?;
        let capacity = &profile.capacity;
        let overflowed = self.header.overflowed;
        let units = capacity.first_page.select(overflowed);

        let metrics = resolve_heights(&self.rows, profile, self.measurer);
        let (take, heights) = self.checked_take(&metrics, units);
        if take == 0 {
            if let Some(first) = metrics.rows().first() {
                let limit = profile.line_metrics.units_to_height(capacity.full_page);
                if first.height > limit {
                    return Err(self.overflow(first, limit));
                }
                debug!(
                    height = first.height,
                    "first row does not fit below the header; starting the table on page 2"
                );
            }
        }

        let total = metrics.normalized_total();
        let one_page =
            take == self.rows.len() && total <= capacity.one_page_limit.select(overflowed);
        debug!(units = total, take, overflowed, one_page, "first page");

        let rows = self.take_rows(take);
        let mut page = self.build_page(PagePhase::First, rows, heights)?;
        page.table_top = self.header.height;
        page.corners = if one_page {
            CornerRadii::square()
        } else {
            CornerRadii::bottom_rounded()
        };

        if one_page && self.rows.is_empty() {
            let used = self.header.height + page.table_height();
            self.close_table_page(&mut page, used);
        } else {
            page.break_after = true;
            self.state = State::Interior;
        }
        Ok(Some(page))
    }

    fn interior_page(&mut self) -> Result<Option<PagePlan>> {
        if self.rows.is_empty() {
            self.state = State::Closing;
            return Ok(None);
        }
        let profile = self.profile;
        let capacity = &profile.capacity;
        let band = CapacityBand::new(capacity.full_page, capacity.full_band);

        let metrics = resolve_heights(&self.rows, profile, self.measurer);
        let units = metrics.normalized_total();
        let (take, heights) = self.checked_take(&metrics, capacity.full_page);
        if take == 0 {
            let limit = profile.line_metrics.units_to_height(capacity.full_page);
            return match metrics.rows().first() {
                Some(first) => Err(self.overflow(first, limit)),
                None => Ok(None),
            };
        }

        let remaining = self.rows.len();
        let full = band.is_full(units);
        let rows = self.take_rows(take);
        if full || take < remaining {
            debug!(units, take, remaining, full, "interior page");
            let mut page = self.build_page(PagePhase::Interior, rows, heights)?;
            page.corners = CornerRadii::rounded();
            page.break_after = true;
            return Ok(Some(page));
        }

        debug!(units, take, "last table page");
        let mut page = self.build_page(PagePhase::Last, rows, heights)?;
        page.corners = CornerRadii::top_rounded();
        let used = page.table_height();
        self.close_table_page(&mut page, used);
        Ok(Some(page))
    }

    fn closing_page(&mut self) -> PagePlan {
        self.pages += 1;
        let mut page = PagePlan::new(self.pages, PagePhase::Closing, self.profile.column_widths());
        page.first_row = self.next_row;
        page.summary = self
            .summary_fit()
            .map(|fit| self.placement(fit, 0.0, self.summary_pushed));
        page.signature = true;
        self.state = State::Done;
        debug!(page = page.number, pushed = self.summary_pushed, "closing page");
        page
    }

    /// Finish the page holding the end of the table: the summary and signature
    /// go here when the summary fits below `used` points, otherwise to a
    /// closing page.
    fn close_table_page(&mut self, page: &mut PagePlan, used: f32) {
        let profile = self.profile;
        let usable = profile.page.usable_height;
        match (self.summary_fit(), &profile.summary) {
            (Some(fit), Some(spec)) if !fit.fits(spec, usable, used) => {
                debug!(
                    text_height = fit.text_height,
                    used, "summary does not fit below the table; pushing it to a new page"
                );
                page.break_after = true;
                self.summary_pushed = true;
                self.state = State::Closing;
            }
            (fit, _) => {
                page.summary = fit.map(|fit| self.placement(fit, used, false));
                page.signature = true;
                self.state = State::Done;
            }
        }
    }

    fn summary_fit(&self) -> Option<SummaryFit> {
        let spec = self.profile.summary.as_ref()?;
        Some(summary_height(
            &self.summary,
            spec,
            &self.profile.text,
            self.measurer,
        ))
    }

    fn placement(&self, fit: SummaryFit, top_offset: f32, pushed: bool) -> SummaryPlacement {
        let title = self
            .profile
            .summary
            .as_ref()
            .map(|spec| spec.title.clone())
            .unwrap_or_default();
        SummaryPlacement {
            title,
            top_offset,
            height: fit.box_height,
            lines: fit.lines,
            pushed,
        }
    }

    /// Largest prefix of the remaining rows whose final heights fit in
    /// `units`, with those heights.
    fn checked_take(&self, metrics: &RowHeights, units: f32) -> (usize, Vec<f32>) {
        let line_metrics = &self.profile.line_metrics;
        let limit = line_metrics.units_to_height(units);
        let mut take = fit_count(&metrics.heights(), units, line_metrics);
        while take > 0 {
            let heights = self.page_heights(&self.rows[..take], &metrics.rows()[..take]);
            let total: f32 = heights.iter().sum();
            if total <= limit + HEIGHT_TOLERANCE {
                return (take, heights);
            }
            debug!(take, total, limit, "equalized group heights overflow the page; dropping a row");
            take -= 1;
        }
        (0, Vec::new())
    }

    /// Final drawn heights of `rows` laid out together on one page.
    ///
    /// With a designator column, each page-local group shares its first
    /// row's designator height equally; a row is then as tall as the larger
    /// of that share and its other wrappable cells, and never below one line.
    fn page_heights(&self, rows: &[Row], metrics: &[RowMetrics]) -> Vec<f32> {
        let Some(column) = self.profile.designator_column else {
            return metrics.iter().map(|row| row.height).collect();
        };
        let single = self.profile.line_metrics.single_line;
        let runs = compute_run_lengths(rows, column);
        let designator: Vec<f32> = metrics
            .iter()
            .map(|row| row.column_height(column).unwrap_or(single))
            .collect();
        redistribute_height(&designator, &runs)
            .into_iter()
            .zip(metrics)
            .map(|(share, row)| row.height_excluding(column).unwrap_or(single).max(share))
            .collect()
    }

    fn take_rows(&mut self, take: usize) -> Vec<Row> {
        let rest = self.rows.split_off(take.min(self.rows.len()));
        mem::replace(&mut self.rows, rest)
    }

    fn build_page(&mut self, phase: PagePhase, rows: Vec<Row>, heights: Vec<f32>) -> Result<PagePlan> {
        self.pages += 1;
        let mut page = PagePlan::new(self.pages, phase, self.profile.column_widths());
        page.first_row = self.next_row;
        self.next_row += rows.len();

        for row in 0..rows.len() {
            for merge in &self.profile.merges {
                page.spans.push(CellSpan::Columns {
                    row,
                    first_column: merge.first,
                    last_column: merge.last,
                });
            }
        }
        if let Some(column) = self.profile.designator_column {
            let runs = compute_run_lengths(&rows, column);
            apply_group_spans(&mut page, column, &runs, rows.len())?;
        }

        page.styles = self.styles.rebase(page.first_row..self.next_row);
        page.rows = rows;
        page.row_heights = heights;
        debug!(
            page = page.number,
            phase = ?page.phase,
            rows = page.rows.len(),
            height = page.table_height(),
            "built page"
        );
        Ok(page)
    }

    fn overflow(&self, row: &RowMetrics, capacity: f32) -> LayoutError {
        LayoutError::LayoutOverflow {
            row: self.next_row,
            height: row.height,
            capacity,
        }
    }
}

impl<M: TextMeasurer + ?Sized> Iterator for Paginator<'_, M> {
    type Item = Result<PagePlan>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let step = match self.state {
                State::Done => return None,
                State::First => self.first_page(),
                State::Interior => self.interior_page(),
                State::Closing => Ok(Some(self.closing_page())),
            };
            match step {
                Ok(Some(page)) => return Some(Ok(page)),
                Ok(None) => continue,
                Err(error) => {
                    self.state = State::Done;
                    return Some(Err(error));
                }
            }
        }
    }
}

impl<M: TextMeasurer + ?Sized> FusedIterator for Paginator<'_, M> {}

/// Lay out `rows` with a plain header and no summary text.
pub fn layout_pages<M: TextMeasurer + ?Sized>(
    profile: &ReportProfile,
    measurer: &M,
    rows: Vec<Row>,
) -> Result<Vec<PagePlan>> {
    Paginator::new(profile, measurer, rows).collect()
}

#[cfg(test)]
mod tests {
    use qc_model::{Cell, ColumnSpec, SummaryBlockSpec};

    use super::*;
    use crate::measure::AdvanceMeasurer;

    fn profile() -> ReportProfile {
        ReportProfile::new(
            "test",
            vec![ColumnSpec::wrapping(40.0), ColumnSpec::fixed(40.0)],
        )
        .with_designator(0)
    }

    fn rows(count: usize) -> Vec<Row> {
        (0..count)
            .map(|index| Row::new(vec![Cell::text(format!("A{index}")), Cell::Number(1.0)]))
            .collect()
    }

    #[test]
    fn fit_count_distinguishes_exact_from_overshoot() {
        let metrics = LineMetrics::default();
        assert_eq!(fit_count(&[19.0, 19.0, 19.0], 2.0, &metrics), 2);
        assert_eq!(fit_count(&[19.0, 24.0, 19.0], 2.0, &metrics), 1);
        assert_eq!(fit_count(&[19.0, 19.0], 5.0, &metrics), 2);
        assert_eq!(fit_count(&[60.0], 3.0, &metrics), 0);
        assert_eq!(fit_count(&[], 3.0, &metrics), 0);
    }

    #[test]
    fn band_marks_almost_full_pages() {
        let exact = CapacityBand::new(30.0, 0.0);
        assert!(exact.is_full(30.0));
        assert!(!exact.is_full(29.9));

        let banded = CapacityBand::new(30.0, 5.0);
        assert!(banded.is_full(25.5));
        assert!(!banded.is_full(25.0));
    }

    #[test]
    fn short_tables_stay_on_the_first_page() {
        let profile = profile();
        let pages = layout_pages(&profile, &AdvanceMeasurer::default(), rows(5)).unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].corners, CornerRadii::square());
        assert!(pages[0].signature);
        assert!(!pages[0].break_after);
    }

    #[test]
    fn tables_above_the_one_page_limit_close_on_a_fresh_page() {
        // 17 rows fit below the header (20) but exceed the one-page limit (15).
        let profile = profile();
        let pages = layout_pages(&profile, &AdvanceMeasurer::default(), rows(17)).unwrap();
        let phases: Vec<PagePhase> = pages.iter().map(|page| page.phase).collect();
        assert_eq!(phases, vec![PagePhase::First, PagePhase::Closing]);
        assert_eq!(pages[0].corners, CornerRadii::bottom_rounded());
        assert!(pages[1].signature);
        assert_eq!(pages[1].first_row, 17);
    }

    #[test]
    fn long_summaries_are_pushed_off_the_last_page() {
        let profile = profile().with_summary(Some(SummaryBlockSpec {
            title: "总结:".to_string(),
            min_height: 82.0,
            wrap_width: 791.09,
            bottom_reserve: 33.0,
            padding: 8.0,
        }));
        let summary = vec!["合格"; 20].join("\n");
        let pages: Vec<PagePlan> = Paginator::new(&profile, &AdvanceMeasurer::default(), rows(10))
            .with_summary(summary)
            .collect::<Result<_>>()
            .unwrap();

        // 175 + 190 + 240 + 8 leaves no room in 573.68 - 33.
        assert_eq!(pages.len(), 2);
        assert!(pages[0].break_after);
        assert!(pages[0].summary.is_none());
        let placement = pages[1].summary.as_ref().unwrap();
        assert!(placement.pushed);
        assert_eq!(placement.top_offset, 0.0);
        assert_eq!(placement.height, 240.0);
    }

    #[test]
    fn overflow_fuses_the_iterator() {
        let mut profile = profile();
        profile.capacity.full_page = 2.0;
        profile.capacity.first_page.normal = 2.0;
        let tall = "长".repeat(40);
        let rows = vec![Row::new(vec![Cell::text(tall), Cell::Number(1.0)])];
        let measurer = AdvanceMeasurer::default();
        let mut pages = Paginator::new(&profile, &measurer, rows);

        let error = pages.next().unwrap().unwrap_err();
        assert!(matches!(error, LayoutError::LayoutOverflow { row: 0, .. }));
        assert!(pages.next().is_none());
    }
}
