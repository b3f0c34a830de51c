use serde::{Deserialize, Serialize};

use super::span::Span;

/// A note attached to the base text.
///
/// `xml_span` locates the source element in the XML so that it can be
/// removed again; `None` means the producer could not tell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    /// Range over the base text. Notes lifted out of the text flow are empty
    /// spans sitting where the note occurred.
    pub span: Span,
    pub text: String,
    pub kind: Option<String>,
    pub resp: Option<String>,
    pub xml_span: Option<Span>,
}

impl Annotation {
    /// An annotation with no kind, responsibility or known XML location.
    pub fn new(span: Span, text: impl Into<String>) -> Self {
        Self {
            span,
            text: text.into(),
            kind: None,
            resp: None,
            xml_span: None,
        }
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn with_resp(mut self, resp: impl Into<String>) -> Self {
        self.resp = Some(resp.into());
        self
    }

    pub fn with_xml_span(mut self, xml_span: Span) -> Self {
        self.xml_span = Some(xml_span);
        self
    }

    /// Whether the source element can be located (and deleted) by span.
    pub fn supports_span_deletion(&self) -> bool {
        self.xml_span.is_some()
    }
}
