//! # Snapshot Testing Support
//!
//! Utilities for testing the renderer via snapshot assertions and invariant
//! checks.
//!
//! ## Modules
//!
//! - **`normalize`**: Converts a [`RenderedDocument`](super::RenderedDocument)
//!   into a stable, readable `Snap` for `insta` snapshots
//! - **`invariants`**: Runtime checks for renderer correctness (segments
//!   sorted and non-overlapping, spans in bounds, source map monotone)

pub mod invariants;
pub mod normalize;

pub use invariants::check as invariants;
pub use normalize::{Snap, normalize};
