//! Summary block sizing.

use tracing::warn;

use qc_model::{SummaryBlockSpec, TextStyle};

use crate::measure::TextMeasurer;

/// Wrapped size of a summary text.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryFit {
    pub lines: Vec<String>,
    /// Sum of the wrapped heights of every line.
    pub text_height: f32,
    /// Drawn box height.
    pub box_height: f32,
}

impl SummaryFit {
    /// Whether the block fits below `used` points of an `usable_height` page.
    pub fn fits(&self, spec: &SummaryBlockSpec, usable_height: f32, used: f32) -> bool {
        self.text_height + spec.padding <= usable_height - used - spec.bottom_reserve
    }
}

/// Measure `text` line by line at the block's wrap width.
///
/// Each `\n`-separated line is wrapped on its own; an empty line still takes
/// one leading.
pub fn summary_height<M: TextMeasurer + ?Sized>(
    text: &str,
    spec: &SummaryBlockSpec,
    style: &TextStyle,
    measurer: &M,
) -> SummaryFit {
    let lines: Vec<String> = text.split('\n').map(str::to_owned).collect();
    let text_height = lines
        .iter()
        .map(|line| {
            let count = match measurer.line_count(line, spec.wrap_width, style) {
                Ok(count) => count,
                Err(error) => {
                    warn!(%error, "summary line measurement failed; counting one line");
                    1
                }
            };
            count as f32 * style.leading
        })
        .sum();

    SummaryFit {
        lines,
        text_height,
        box_height: spec.min_height.max(text_height),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::AdvanceMeasurer;

    fn spec() -> SummaryBlockSpec {
        SummaryBlockSpec {
            title: "总结:".to_string(),
            min_height: 82.0,
            wrap_width: 90.0,
            bottom_reserve: 33.0,
            padding: 8.0,
        }
    }

    #[test]
    fn blank_lines_take_one_leading() {
        let fit = summary_height("合格\n\n复查", &spec(), &TextStyle::default(), &AdvanceMeasurer::default());
        assert_eq!(fit.lines.len(), 3);
        assert_eq!(fit.text_height, 36.0);
        assert_eq!(fit.box_height, 82.0);
    }

    #[test]
    fn long_lines_wrap_at_the_block_width() {
        // Ten 9pt glyphs per 90pt line: 25 glyphs take three lines.
        let text = "质".repeat(25);
        let fit = summary_height(&text, &spec(), &TextStyle::default(), &AdvanceMeasurer::default());
        assert_eq!(fit.text_height, 36.0);
    }

    #[test]
    fn fit_check_keeps_the_signature_reserve() {
        let fit = SummaryFit {
            lines: vec![String::new()],
            text_height: 40.0,
            box_height: 82.0,
        };
        // 40 + 8 against 100 - 19 - 33 = 48.
        assert!(fit.fits(&spec(), 100.0, 19.0));
        assert!(!fit.fits(&spec(), 100.0, 19.5));
    }
}
