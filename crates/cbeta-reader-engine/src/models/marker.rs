use serde::{Deserialize, Serialize};

use super::span::Span;

/// A marker glyph spliced into the display text, pointing at an annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerSpan {
    /// Range over the display text.
    pub span: Span,
    /// Index into the annotation list the marker was produced from.
    pub annotation_index: usize,
}

impl MarkerSpan {
    pub fn new(start: usize, end: usize, annotation_index: usize) -> Self {
        Self {
            span: Span::new(start, end),
            annotation_index,
        }
    }

    pub fn len(&self) -> usize {
        self.span.len()
    }

    pub fn is_empty(&self) -> bool {
        self.span.is_empty()
    }
}
