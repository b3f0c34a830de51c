use serde::{Deserialize, Serialize};

use crate::models::{Annotation, MarkerSpan};

/// Display text produced by a [`MarkerInserter`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkedText {
    pub display_text: String,
    /// Spans over `display_text`, one per inserted marker.
    pub marker_spans: Vec<MarkerSpan>,
}

/// Splices marker glyphs for annotations into the base text.
///
/// Implementations must reference valid annotation indices, express spans
/// in display coordinates and never produce overlapping spans. Spans may
/// come back in any order.
pub trait MarkerInserter {
    fn insert(&self, base_text: &str, annotations: &[Annotation]) -> MarkedText;
}

/// How [`NumberedMarkers`] spells a note number.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerStyle {
    /// `¹²³`
    #[default]
    Superscript,
    /// `[123]`
    Bracketed,
}

impl MarkerStyle {
    pub fn glyph(self, number: usize) -> String {
        match self {
            Self::Superscript => number.to_string().chars().map(superscript_digit).collect(),
            Self::Bracketed => format!("[{number}]"),
        }
    }
}

fn superscript_digit(digit: char) -> char {
    match digit {
        '0' => '⁰',
        '1' => '¹',
        '2' => '²',
        '3' => '³',
        '4' => '⁴',
        '5' => '⁵',
        '6' => '⁶',
        '7' => '⁷',
        '8' => '⁸',
        '9' => '⁹',
        other => other,
    }
}

/// Numbers annotations 1..n in list order and inserts each number at the
/// end of its annotation's base span. Annotations sharing a position keep
/// list order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NumberedMarkers {
    pub style: MarkerStyle,
}

impl NumberedMarkers {
    pub fn new(style: MarkerStyle) -> Self {
        Self { style }
    }
}

impl MarkerInserter for NumberedMarkers {
    fn insert(&self, base_text: &str, annotations: &[Annotation]) -> MarkedText {
        let base_len = base_text.chars().count();

        let mut order: Vec<(usize, usize)> = annotations
            .iter()
            .enumerate()
            .map(|(index, a)| (a.span.end.min(base_len), index))
            .collect();
        order.sort_unstable();

        let mut display_text = String::with_capacity(base_text.len() + 4 * order.len());
        let mut marker_spans = Vec::with_capacity(order.len());
        let mut chars = base_text.chars();
        let mut base_pos = 0;
        let mut display_pos = 0;

        for (at, index) in order {
            display_text.extend(chars.by_ref().take(at - base_pos));
            display_pos += at - base_pos;
            base_pos = at;

            let glyph = self.style.glyph(index + 1);
            let width = glyph.chars().count();
            display_text.push_str(&glyph);
            marker_spans.push(MarkerSpan::new(display_pos, display_pos + width, index));
            display_pos += width;
        }
        display_text.extend(chars);

        MarkedText {
            display_text,
            marker_spans,
        }
    }
}
