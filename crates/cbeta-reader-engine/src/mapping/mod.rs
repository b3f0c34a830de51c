//! # Mapping
//!
//! Lookups across the three coordinate spaces of a rendered document:
//!
//! - **XML**: `char` offsets into the source file
//! - **Base**: `char` offsets into the rendered text, before markers
//! - **Display**: base text with note markers spliced in
//!
//! ## Modules
//!
//! - `search`: the one binary-search primitive every lookup uses
//! - `offset_map`: base to XML correspondence in its two shapes
//! - `markers`: marker insertion seam and the numbered default
//! - `document`: [`MappedDocument`], the read-only query surface
//!
//! ## Key Invariants
//!
//! - Marker spans are sorted by start and never overlap
//! - Absent data yields `None`; out-of-range offsets are clamped, never
//!   rejected

pub mod document;
pub mod markers;
pub mod offset_map;
pub mod search;

pub use document::{MARKER_HIT_RADIUS, MappedDocument, MarkerBias};
pub use markers::{MarkedText, MarkerInserter, MarkerStyle, NumberedMarkers};
pub use offset_map::{OffsetMap, OffsetMapError};
pub use search::rightmost_index;

use crate::models::Annotation;

/// Hit-testing supplied by whatever draws the display text.
///
/// The engine never knows about pixels or layout; a UI resolves its own
/// pointer coordinates to a display offset and the engine takes it from
/// there.
pub trait PointToOffset {
    type Point;

    /// Display offset under `point`, or `None` when the point is outside the
    /// text.
    fn point_to_offset(&self, point: Self::Point) -> Option<usize>;
}

impl MappedDocument {
    /// Annotation under a pointer position, resolved through `hit_test`.
    pub fn annotation_at_point<H: PointToOffset>(
        &self,
        hit_test: &H,
        point: H::Point,
    ) -> Option<&Annotation> {
        let offset = hit_test.point_to_offset(point)?;
        self.annotation_by_marker_at(offset)
    }
}
