//! # cbeta-reader engine
//!
//! Renders CBETA/TEI XML into read-optimized text and answers offset
//! questions across the XML, base and display coordinate spaces.
//!
//! ## Modules
//!
//! - [`rendering`]: XML to base text, segments, notes and source map
//! - [`mapping`]: marker insertion and the [`MappedDocument`] lookups
//! - [`models`]: spans, segments, annotations, marker spans
//! - [`io`]: corpus file access

pub mod io;
pub mod mapping;
pub mod models;
pub mod rendering;


// Re-export key types for easier usage
pub use io::*;
pub use mapping::{
    MappedDocument, MarkedText, MarkerBias, MarkerInserter, MarkerStyle, NumberedMarkers,
    OffsetMap, OffsetMapError, PointToOffset,
};
pub use models::{Annotation, MarkerSpan, START_KEY, Segment, Span};
pub use rendering::{RenderOptions, RenderedDocument, render, render_with};
