pub mod annotation;
pub mod marker;
pub mod segment;
pub mod span;

pub use annotation::Annotation;
pub use marker::MarkerSpan;
pub use segment::{START_KEY, Segment};
pub use span::Span;
