//! Identity header overflow.
//!
//! The first page starts below a header box whose free-text fields each have
//! a width budget. A field that exceeds it continues on a second line, which
//! makes the box taller and the first page's table capacity smaller.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use qc_model::{HeaderField, IdentityHeaderSpec, TextStyle};

use crate::measure::TextMeasurer;

/// One header field, split at its width budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeaderLine {
    pub field: HeaderField,
    pub text: String,
    /// Text carried to the continuation line.
    pub continuation: Option<String>,
}

impl HeaderLine {
    pub fn overflowed(&self) -> bool {
        self.continuation.is_some()
    }
}

/// Resolved size of the identity header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeaderLayout {
    pub height: f32,
    /// A budgeted field overflowed; the first page uses its reduced capacity.
    pub overflowed: bool,
    pub lines: Vec<HeaderLine>,
}

impl HeaderLayout {
    /// A header with no overflowing fields.
    pub fn plain(spec: &IdentityHeaderSpec) -> Self {
        Self {
            height: spec.height,
            overflowed: false,
            lines: Vec::new(),
        }
    }
}

/// Split `text` into the longest prefix no wider than `max_width` and the rest.
///
/// The prefix keeps at least one character so a continuation line always
/// makes progress. Returns `None` for the rest when everything fits.
pub fn split_overflow<M: TextMeasurer + ?Sized>(
    measurer: &M,
    text: &str,
    max_width: f32,
    style: &TextStyle,
) -> (String, Option<String>) {
    let whole = match measurer.text_width(text, style) {
        Ok(width) => width,
        Err(error) => {
            warn!(%error, "header field measurement failed; keeping it on one line");
            return (text.to_owned(), None);
        }
    };
    if whole <= max_width {
        return (text.to_owned(), None);
    }

    let mut used = 0.0f32;
    let mut cut = 0;
    let mut buf = [0u8; 4];
    for (offset, ch) in text.char_indices() {
        let advance = measurer
            .text_width(ch.encode_utf8(&mut buf), style)
            .unwrap_or(0.0);
        if cut > 0 && used + advance > max_width {
            break;
        }
        used += advance;
        cut = offset + ch.len_utf8();
    }

    let (head, rest) = text.split_at(cut);
    let rest = (!rest.is_empty()).then(|| rest.to_owned());
    (head.to_owned(), rest)
}

/// Split every budgeted field and size the header accordingly.
///
/// Fields without a budget in `spec` are kept whole. Only budgets marked
/// `resizes` affect the header height and the first page.
pub fn resolve_identity_header<M: TextMeasurer + ?Sized>(
    fields: &[(HeaderField, String)],
    spec: &IdentityHeaderSpec,
    measurer: &M,
) -> HeaderLayout {
    let style = TextStyle {
        font_size: spec.font_size,
        ..TextStyle::default()
    };
    let mut overflowed = false;
    let lines: Vec<HeaderLine> = fields
        .iter()
        .map(|(field, text)| {
            let budget = spec.budgets.iter().find(|budget| budget.field == *field);
            let (text, continuation) = match budget {
                Some(budget) => {
                    let split = split_overflow(measurer, text, budget.max_width, &style);
                    overflowed |= budget.resizes && split.1.is_some();
                    split
                }
                None => (text.clone(), None),
            };
            HeaderLine {
                field: *field,
                text,
                continuation,
            }
        })
        .collect();

    let height = if overflowed {
        spec.overflow_height
    } else {
        spec.height
    };
    debug!(overflowed, height, "resolved identity header");

    HeaderLayout {
        height,
        overflowed,
        lines,
    }
}

#[cfg(test)]
mod tests {
    use qc_model::HeaderFieldBudget;

    use super::*;
    use crate::measure::AdvanceMeasurer;

    fn spec() -> IdentityHeaderSpec {
        IdentityHeaderSpec {
            budgets: vec![
                HeaderFieldBudget::new(HeaderField::Laboratory, 55.0),
                HeaderFieldBudget::wrap_only(HeaderField::LotAndExpiry, 55.0),
            ],
            ..IdentityHeaderSpec::default()
        }
    }

    #[test]
    fn splits_at_the_longest_fitting_prefix() {
        let style = TextStyle {
            font_size: 11.0,
            ..TextStyle::default()
        };
        // Five 11pt glyphs fit in 55pt, the sixth does not.
        let (head, rest) = split_overflow(&AdvanceMeasurer::default(), "第一人民医院检验科", 55.0, &style);
        assert_eq!(head, "第一人民医");
        assert_eq!(rest.as_deref(), Some("院检验科"));
    }

    #[test]
    fn budgeted_overflow_grows_the_header() {
        let fields = vec![
            (HeaderField::Laboratory, "第一人民医院检验科".to_string()),
            (HeaderField::Instrument, "一个很长很长很长的仪器名称".to_string()),
        ];
        let layout = resolve_identity_header(&fields, &spec(), &AdvanceMeasurer::default());
        assert!(layout.overflowed);
        assert_eq!(layout.height, 195.0);
        assert!(!layout.lines[1].overflowed());
    }

    #[test]
    fn wrap_only_fields_split_without_growing_the_header() {
        let fields = vec![(HeaderField::LotAndExpiry, "批号二零二四零一号".to_string())];
        let layout = resolve_identity_header(&fields, &spec(), &AdvanceMeasurer::default());
        assert!(layout.lines[0].overflowed());
        assert!(!layout.overflowed);
        assert_eq!(layout.height, 175.0);
    }

    #[test]
    fn unbudgeted_fields_never_overflow() {
        let fields = vec![(HeaderField::TimeRange, "2024.01.01 - 2024.12.31".to_string())];
        let layout = resolve_identity_header(&fields, &spec(), &AdvanceMeasurer::default());
        assert_eq!(layout, HeaderLayout {
            height: 175.0,
            overflowed: false,
            lines: vec![HeaderLine {
                field: HeaderField::TimeRange,
                text: "2024.01.01 - 2024.12.31".to_string(),
                continuation: None,
            }],
        });
    }
}
