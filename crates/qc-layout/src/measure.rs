//! Text measurement seam.
//!
//! Real font metrics come from the drawing backend; the engine only needs a
//! width for a run of text and, from that, a wrapped line count.

use tracing::warn;
use unicode_width::UnicodeWidthChar;

use qc_model::{LineMetrics, TextStyle};

use crate::error::MeasureError;

/// Wrapped size of one cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WrapMeasurement {
    /// Display lines, always at least one.
    pub line_count: usize,
    /// Drawn height in page units.
    pub height: f32,
}

impl WrapMeasurement {
    pub fn from_lines(lines: usize, metrics: &LineMetrics) -> Self {
        let line_count = lines.max(1);
        Self {
            line_count,
            height: metrics.height_for(line_count),
        }
    }

    /// Line count in single-line units, for capacity decisions.
    pub fn normalized(&self, metrics: &LineMetrics) -> f32 {
        metrics.normalized(self.line_count)
    }
}

/// Measures text for wrapping.
pub trait TextMeasurer {
    /// Advance width of `text` on one line.
    fn text_width(&self, text: &str, style: &TextStyle) -> Result<f32, MeasureError>;

    /// Number of lines `text` occupies when wrapped into `width`.
    ///
    /// Wraps per character (CJK style, no word boundaries) and starts a new
    /// line at every `\n`. Never returns less than one.
    fn line_count(&self, text: &str, width: f32, style: &TextStyle) -> Result<usize, MeasureError> {
        if width.is_nan() || width <= 0.0 {
            return Err(MeasureError::InvalidWidth { width });
        }
        let mut lines = 0usize;
        let mut buf = [0u8; 4];
        for paragraph in text.split('\n') {
            lines += 1;
            let mut used = 0.0f32;
            for ch in paragraph.chars() {
                let advance = self.text_width(ch.encode_utf8(&mut buf), style)?;
                if used > 0.0 && used + advance > width {
                    lines += 1;
                    used = advance;
                } else {
                    used += advance;
                }
            }
        }
        Ok(lines.max(1))
    }
}

impl<M: TextMeasurer + ?Sized> TextMeasurer for &M {
    fn text_width(&self, text: &str, style: &TextStyle) -> Result<f32, MeasureError> {
        (**self).text_width(text, style)
    }

    fn line_count(&self, text: &str, width: f32, style: &TextStyle) -> Result<usize, MeasureError> {
        (**self).line_count(text, width, style)
    }
}

/// Font-free measurer based on terminal cell widths.
///
/// Wide (CJK) glyphs advance one em, narrow glyphs `narrow_em` of an em and
/// zero-width characters nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdvanceMeasurer {
    pub narrow_em: f32,
}

impl Default for AdvanceMeasurer {
    fn default() -> Self {
        Self { narrow_em: 0.55 }
    }
}

impl TextMeasurer for AdvanceMeasurer {
    fn text_width(&self, text: &str, style: &TextStyle) -> Result<f32, MeasureError> {
        if style.font_size.is_nan() || style.font_size <= 0.0 {
            return Err(MeasureError::InvalidStyle {
                font_size: style.font_size,
            });
        }
        let ems: f32 = text
            .chars()
            .map(|ch| match UnicodeWidthChar::width(ch) {
                Some(2) => 1.0,
                Some(1) => self.narrow_em,
                _ => 0.0,
            })
            .sum();
        Ok(ems * style.font_size)
    }
}

/// Measure one cell, degrading failures to a single line.
pub fn measure_cell<M: TextMeasurer + ?Sized>(
    measurer: &M,
    text: &str,
    width: f32,
    style: &TextStyle,
    metrics: &LineMetrics,
) -> WrapMeasurement {
    if text.trim().is_empty() {
        return WrapMeasurement::from_lines(1, metrics);
    }
    match measurer.line_count(text, width, style) {
        Ok(lines) => WrapMeasurement::from_lines(lines, metrics),
        Err(error) => {
            warn!(%error, width, "cell measurement failed; drawing as a single blank line");
            WrapMeasurement::from_lines(1, metrics)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wide_glyphs_take_a_full_em() {
        let measurer = AdvanceMeasurer::default();
        let style = TextStyle::default();
        assert_eq!(measurer.text_width("血糖", &style).unwrap(), 18.0);
        assert!((measurer.text_width("ab", &style).unwrap() - 9.9).abs() < 1e-4);
    }

    #[test]
    fn wraps_per_character_and_on_newlines() {
        let measurer = AdvanceMeasurer::default();
        let style = TextStyle::default();
        // Four wide glyphs of 9pt into 20pt: two per line.
        assert_eq!(measurer.line_count("葡萄糖酶", 20.0, &style).unwrap(), 2);
        assert_eq!(measurer.line_count("a\nb", 100.0, &style).unwrap(), 2);
        assert_eq!(measurer.line_count("", 100.0, &style).unwrap(), 1);
    }

    #[test]
    fn nan_widths_and_sizes_are_rejected() {
        let measurer = AdvanceMeasurer::default();
        let style = TextStyle::default();
        assert!(matches!(
            measurer.line_count("a", f32::NAN, &style),
            Err(MeasureError::InvalidWidth { .. })
        ));
        let bad = TextStyle {
            font_size: f32::NAN,
            ..TextStyle::default()
        };
        assert!(matches!(
            measurer.text_width("a", &bad),
            Err(MeasureError::InvalidStyle { .. })
        ));
    }

    #[test]
    fn failures_degrade_to_one_line() {
        let metrics = LineMetrics::default();
        let style = TextStyle::default();
        let measured = measure_cell(&AdvanceMeasurer::default(), "text", -3.0, &style, &metrics);
        assert_eq!(measured, WrapMeasurement::from_lines(1, &metrics));
        assert_eq!(measured.height, 19.0);
    }
}
