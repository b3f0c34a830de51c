use std::collections::HashMap;

use super::{
    markers::MarkerInserter,
    offset_map::OffsetMap,
    search::rightmost_index,
};
use crate::models::{Annotation, MarkerSpan, Segment};
use crate::rendering::RenderedDocument;

/// Radius (in display chars) of the neighbourhood searched when a click
/// misses every marker span.
pub const MARKER_HIT_RADIUS: usize = 10;

/// Which side of a marker a base position resolves to when the marker was
/// inserted exactly there.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MarkerBias {
    /// Before the glyph.
    Before,
    /// After the glyph, where reading resumes.
    #[default]
    After,
}

/// Read-only view of one render pass, with lookups across the base, display
/// and XML coordinate spaces and the segment keys.
///
/// Built once, never mutated afterwards, and therefore safe to share across
/// threads.
#[derive(Debug, Clone)]
pub struct MappedDocument {
    display_text: String,
    display_len: usize,
    segments: Vec<Segment>,
    annotations: Vec<Annotation>,
    /// Sorted by start.
    markers: Vec<MarkerSpan>,
    offset_map: Option<OffsetMap>,
    /// Key -> index of the first segment with that key.
    segment_index: HashMap<String, usize>,
}

impl MappedDocument {
    /// Assembles a document from a render pass and marker insertion.
    ///
    /// `segments` and `annotations` are in base coordinates, `markers` in
    /// display coordinates and may be unsorted. A marker starting inside an
    /// earlier one is dropped.
    pub fn new(
        display_text: String,
        segments: Vec<Segment>,
        annotations: Vec<Annotation>,
        mut markers: Vec<MarkerSpan>,
        offset_map: Option<OffsetMap>,
    ) -> Self {
        if markers.len() > 1 {
            markers.sort_by_key(|m| m.span.start);

            // Offset translation assumes markers never overlap
            let before = markers.len();
            let mut covered = 0;
            markers.retain(|m| {
                let keep = m.span.start >= covered;
                if keep {
                    covered = m.span.end;
                }
                keep
            });
            if markers.len() < before {
                log::warn!(
                    "Dropped {} overlapping marker spans out of {before}",
                    before - markers.len()
                );
            }
        }

        let invalid = markers
            .iter()
            .filter(|m| m.annotation_index >= annotations.len())
            .count();
        if invalid > 0 {
            log::warn!(
                "{invalid} of {} marker spans reference missing annotations ({} available)",
                markers.len(),
                annotations.len()
            );
        }

        let mut segment_index = HashMap::with_capacity(segments.len());
        for (i, segment) in segments.iter().enumerate() {
            segment_index.entry(segment.key.clone()).or_insert(i);
        }

        Self {
            display_len: display_text.chars().count(),
            display_text,
            segments,
            annotations,
            markers,
            offset_map,
            segment_index,
        }
    }

    /// Runs `inserter` over the rendered notes and attaches the caret-accurate
    /// position map.
    pub fn from_rendered(rendered: &RenderedDocument, inserter: &impl MarkerInserter) -> Self {
        let marked = inserter.insert(rendered.base_text(), rendered.annotations());
        Self::new(
            marked.display_text,
            rendered.segments().to_vec(),
            rendered.annotations().to_vec(),
            marked.marker_spans,
            Some(rendered.position_map()),
        )
    }

    pub fn display_text(&self) -> &str {
        &self.display_text
    }

    /// Length of the display text in chars.
    pub fn display_len(&self) -> usize {
        self.display_len
    }

    /// Length of the base text: display length minus every marker.
    pub fn base_len(&self) -> usize {
        let inserted: usize = self.markers.iter().map(MarkerSpan::len).sum();
        self.display_len.saturating_sub(inserted)
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn marker_spans(&self) -> &[MarkerSpan] {
        &self.markers
    }

    pub fn offset_map(&self) -> Option<&OffsetMap> {
        self.offset_map.as_ref()
    }

    /// First segment carrying `key`.
    pub fn segment_by_key(&self, key: &str) -> Option<&Segment> {
        self.segment_index.get(key).map(|&i| &self.segments[i])
    }

    /// The structural unit a base offset falls in: the rightmost segment
    /// starting at or before `offset`, or the first segment when none does.
    pub fn find_segment_at_or_before(&self, offset: usize) -> Option<&Segment> {
        let index = rightmost_index(&self.segments, |s| s.start() <= offset).unwrap_or(0);
        self.segments.get(index)
    }

    fn annotation_for(&self, marker: &MarkerSpan) -> Option<&Annotation> {
        self.annotations.get(marker.annotation_index)
    }

    /// Annotation whose marker sits at display offset `offset`.
    ///
    /// An exact hit wins. Otherwise the nearest marker touching
    /// `[offset - MARKER_HIT_RADIUS, offset + MARKER_HIT_RADIUS]` is taken,
    /// since hit-testing against small glyphs is imprecise. Markers pointing
    /// at missing annotations are never returned.
    pub fn annotation_by_marker_at(&self, offset: usize) -> Option<&Annotation> {
        let exact = rightmost_index(&self.markers, |m| m.span.start <= offset)
            .map(|i| &self.markers[i])
            .filter(|m| m.span.contains(offset))
            .and_then(|m| self.annotation_for(m));
        if exact.is_some() {
            return exact;
        }

        let lo = offset.saturating_sub(MARKER_HIT_RADIUS);
        let hi = offset.saturating_add(MARKER_HIT_RADIUS);
        let last = rightmost_index(&self.markers, |m| m.span.start <= hi)?;
        // Sorted and disjoint, so marker ends only grow: walk back from the
        // last candidate until a marker ends before the window.
        self.markers[..=last]
            .iter()
            .rev()
            .take_while(|m| m.span.touches_window(lo, hi))
            .filter_map(|m| {
                let annotation = self.annotation_for(m)?;
                Some(((m.span.distance_to(offset), m.span.start), annotation))
            })
            .min_by_key(|(key, _)| *key)
            .map(|(_, annotation)| annotation)
    }

    /// Display offset to base offset.
    ///
    /// A caret strictly inside a marker resolves to the base position the
    /// marker was inserted at; carets on either edge of a marker resolve to
    /// that same position. Identity when there are no markers.
    pub fn display_index_to_base_index(&self, display_index: usize) -> usize {
        let display_index = display_index.min(self.display_len);
        let mut inserted = 0;
        for m in &self.markers {
            if m.span.end <= display_index {
                inserted += m.len();
            } else if m.span.start < display_index {
                return m.span.start.saturating_sub(inserted);
            } else {
                break;
            }
        }
        display_index - inserted
    }

    /// Base offset to display offset, the inverse of
    /// [`display_index_to_base_index`](Self::display_index_to_base_index).
    ///
    /// A marker inserted exactly at `base_index` is skipped over for
    /// [`MarkerBias::After`] and left ahead for [`MarkerBias::Before`].
    pub fn base_index_to_display_index(&self, base_index: usize, bias: MarkerBias) -> usize {
        let base_index = base_index.min(self.base_len());
        let mut inserted = 0;
        for m in &self.markers {
            let insertion_point = m.span.start.saturating_sub(inserted);
            let passes = insertion_point < base_index
                || (insertion_point == base_index && bias == MarkerBias::After);
            if !passes {
                break;
            }
            inserted += m.len();
        }
        base_index + inserted
    }

    /// XML offset for a caret at display offset `display_index`; `None`
    /// without an offset map.
    pub fn display_index_to_xml_index(&self, display_index: usize) -> Option<usize> {
        let map = self.offset_map.as_ref()?;
        map.xml_index_for_caret(self.display_index_to_base_index(display_index))
    }

    /// Display offset where the text for XML offset `xml_index` appears,
    /// landing after any marker inserted there.
    pub fn find_rendered_offset_by_xml_index(&self, xml_index: usize) -> Option<usize> {
        self.find_rendered_offset_by_xml_index_with_bias(xml_index, MarkerBias::After)
    }

    pub fn find_rendered_offset_by_xml_index_with_bias(
        &self,
        xml_index: usize,
        bias: MarkerBias,
    ) -> Option<usize> {
        let base_index = self.offset_map.as_ref()?.base_index_for_xml(xml_index)?;
        Some(self.base_index_to_display_index(base_index, bias))
    }
}
