//! # Rendering
//!
//! Turns CBETA/TEI XML into read-optimized base text plus structurally keyed
//! segments, in one pass over the input.
//!
//! ## Pipeline
//!
//! 1. **Tokenization** (`tokenizer`): one regex pass splits the input into
//!    tag and text tokens. Tags outside the start/end grammar are dropped.
//! 2. **Header suppression**: everything inside `teiHeader` is discarded.
//! 3. **Segmentation** (`segments`): sync tags (`lb`, `pb`, `p[@xml:id]`,
//!    `anchor`, `cb:juan`) close the open segment and open a new one.
//! 4. **Text assembly** (`text`): line and paragraph breaks, entity decoding,
//!    whitespace normalization and word-glue spaces. Every emitted character
//!    remembers its XML source range.
//! 5. **Notes** (`notes`, opt-in): `note` elements become annotations instead
//!    of text.
//!
//! ## Key Invariants
//!
//! - Offsets are `char` counts and are never renumbered after emission; only
//!   trailing whitespace is trimmed at the end of the document
//! - Segments are sorted, non-overlapping, and the first one is `START` at 0;
//!   only empty or whitespace-only input has no segments at all
//! - The source map is non-decreasing, so both offset-map shapes built from it
//!   support binary search

pub mod attributes;
pub mod notes;
mod renderer;
pub mod segments;
pub mod snapshot;
pub mod text;
pub mod tokenizer;

use serde::{Deserialize, Serialize};

use crate::mapping::OffsetMap;
use crate::models::{Annotation, Segment, Span};

/// Knobs for [`render_with`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Lift non-inline `note` elements out of the text into annotations.
    pub collect_notes: bool,
}

/// Output of a render pass. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedDocument {
    base_text: String,
    segments: Vec<Segment>,
    annotations: Vec<Annotation>,
    /// XML source range of every base character.
    sources: Vec<Span>,
}

impl RenderedDocument {
    pub fn base_text(&self) -> &str {
        &self.base_text
    }

    /// Length of the base text in chars.
    pub fn base_len(&self) -> usize {
        self.sources.len()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Notes collected during rendering; empty unless
    /// [`RenderOptions::collect_notes`] was set.
    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn sources(&self) -> &[Span] {
        &self.sources
    }

    /// One XML offset per base character: where its source starts.
    pub fn char_map(&self) -> OffsetMap {
        OffsetMap::CharMap(self.sources.iter().map(|s| s.start).collect())
    }

    /// One XML offset per caret position, end of text included.
    ///
    /// Caret 0 sits where the first character's source starts; caret `k`
    /// sits right after the source of character `k - 1`.
    pub fn position_map(&self) -> OffsetMap {
        let mut values = Vec::with_capacity(self.sources.len() + 1);
        values.push(self.sources.first().map_or(0, |s| s.start));
        values.extend(self.sources.iter().map(|s| s.end));
        OffsetMap::PositionMap(values)
    }
}

/// Renders with default options.
///
/// ```
/// use cbeta_reader_engine::rendering::render;
///
/// let doc = render(r#"<p xml:id="p1">foo<lb n="1"/>bar</p>"#);
/// assert_eq!(doc.base_text(), "foo\nbar");
/// let keys: Vec<_> = doc.segments().iter().map(|s| s.key.as_str()).collect();
/// assert_eq!(keys, ["START", "p|p1", "lb|1"]);
/// ```
pub fn render(xml: &str) -> RenderedDocument {
    render_with(xml, &RenderOptions::default())
}

/// Renders `xml`. Empty or whitespace-only input yields an empty document
/// without any segments.
pub fn render_with(xml: &str, options: &RenderOptions) -> RenderedDocument {
    if xml.trim().is_empty() {
        return RenderedDocument::default();
    }
    renderer::Renderer::new(options).run(xml)
}
