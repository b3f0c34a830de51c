use super::tokenizer::Tag;
use crate::models::{START_KEY, Segment, Span};

/// Separator between the tag name and attribute values in a segment key.
pub const KEY_SEPARATOR: char = '|';

/// Builds the segment key for a sync tag, or `None` when the tag does not
/// open a segment.
///
/// | tag | opens when | key parts |
/// |-----|------------|-----------|
/// | `lb` | always | `n`, `ed` |
/// | `pb` | always | `xml:id` (else `n`), `ed` |
/// | `p` | `xml:id` present | `xml:id` |
/// | `anchor` | `xml:id` or `n` present | `xml:id` (else `n`) |
/// | `cb:juan` | always | `n`, `fun` |
///
/// Only start and empty tags are considered.
pub fn segment_key(tag: &Tag<'_>) -> Option<String> {
    if !tag.opens() {
        return None;
    }

    let name = tag.canonical_name();
    let parts = match name {
        "lb" => vec![tag.attr("n"), tag.attr("ed")],
        "pb" => vec![tag.attr("xml:id").or_else(|| tag.attr("n")), tag.attr("ed")],
        "p" => vec![Some(tag.attr("xml:id")?)],
        "anchor" => vec![Some(tag.attr("xml:id").or_else(|| tag.attr("n"))?)],
        "cb:juan" => vec![tag.attr("n"), tag.attr("fun")],
        _ => return None,
    };

    Some(build_key(name, parts.into_iter().flatten()))
}

/// Joins the tag name and every present part with [`KEY_SEPARATOR`].
pub fn build_key<'a>(name: &str, parts: impl IntoIterator<Item = &'a str>) -> String {
    let mut key = name.to_string();
    for part in parts {
        key.push(KEY_SEPARATOR);
        key.push_str(part);
    }
    key
}

/// Collects segments in document order.
///
/// Exactly one segment is open at any time. Each boundary closes it and
/// opens the next, so segments never overlap; a gap between the two is
/// whitespace emitted by the boundary tag itself.
#[derive(Debug)]
pub struct SegmentBuilder {
    segments: Vec<Segment>,
    open_key: String,
    open_start: usize,
}

impl Default for SegmentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SegmentBuilder {
    /// Starts with the `START` segment open at offset 0.
    pub fn new() -> Self {
        Self {
            segments: Vec::new(),
            open_key: START_KEY.to_string(),
            open_start: 0,
        }
    }

    fn close(&mut self, at: usize) {
        let key = std::mem::take(&mut self.open_key);
        let start = self.open_start.min(at);
        self.segments.push(Segment::new(key, Span::new(start, at)));
    }

    /// Closes the open segment at `close_at` and opens `key` at `open_at`.
    pub fn split(&mut self, close_at: usize, key: String, open_at: usize) {
        self.close(close_at);
        self.open_key = key;
        self.open_start = open_at.max(close_at);
    }

    /// Closes the last segment at `len` and clamps every segment to `len`.
    pub fn finish(mut self, len: usize) -> Vec<Segment> {
        self.close(len);
        for segment in &mut self.segments {
            segment.span = segment.span.clamp_to(len);
        }
        self.segments
    }
}
