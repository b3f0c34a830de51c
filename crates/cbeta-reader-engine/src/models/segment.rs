use serde::{Deserialize, Serialize};

use super::span::Span;

/// Key of the segment that is open before any input has been read.
pub const START_KEY: &str = "START";

/// A structurally keyed range over the base text.
///
/// Keys look like `lb|0001a01|T`, `pb|T01.0001.0001a|T`, `p|pT01p0001a0101`
/// or `cb:juan|1|open`. Two tags with the same attributes produce the same
/// key, which is what lets a reader jump to "the same logical line" in the
/// original and the translated pane.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub key: String,
    pub span: Span,
}

impl Segment {
    pub fn new(key: impl Into<String>, span: Span) -> Self {
        Self {
            key: key.into(),
            span,
        }
    }

    pub fn start(&self) -> usize {
        self.span.start
    }

    pub fn end(&self) -> usize {
        self.span.end
    }
}
