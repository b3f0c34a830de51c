use super::{
    text::normalize_text_node,
    tokenizer::{Tag, TagKind},
};
use crate::models::{Annotation, Span};

#[derive(Debug)]
struct OpenNote {
    /// Base offset where the note occurred.
    anchor: usize,
    xml_start: usize,
    kind: Option<String>,
    resp: Option<String>,
    text: String,
    depth: usize,
}

/// Lifts `note` elements out of the text flow into annotations.
///
/// Inline notes (`place="inline"`) are left alone and render as text. While
/// a note is open every tag and text token belongs to it; nested notes only
/// contribute their text.
#[derive(Debug, Default)]
pub struct NoteCollector {
    open: Option<OpenNote>,
    annotations: Vec<Annotation>,
}

impl NoteCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    /// Offers a tag to the collector. Returns `true` when the tag was consumed
    /// and must not reach the renderer.
    pub fn on_tag(&mut self, tag: &Tag<'_>, span: Span, base_offset: usize) -> bool {
        let is_note = tag.local_name() == "note";

        if let Some(note) = &mut self.open {
            if is_note {
                match tag.kind {
                    TagKind::Start => note.depth += 1,
                    TagKind::End => note.depth -= 1,
                    TagKind::Empty => {}
                }
                if note.depth == 0 {
                    self.close(span.end);
                }
            }
            return true;
        }

        if !is_note || tag.kind != TagKind::Start || tag.attr("place") == Some("inline") {
            return false;
        }

        self.open = Some(OpenNote {
            anchor: base_offset,
            xml_start: span.start,
            kind: tag.attr("type").map(str::to_string),
            resp: tag.attr("resp").map(str::to_string),
            text: String::new(),
            depth: 1,
        });
        true
    }

    /// Appends a text token to the open note.
    pub fn on_text(&mut self, raw: &str, span: Span) {
        let Some(note) = &mut self.open else {
            return;
        };
        let node: String = normalize_text_node(raw, span.start)
            .into_iter()
            .map(|(ch, _)| ch)
            .collect();
        let Some(first) = node.chars().next() else {
            return;
        };
        if note
            .text
            .chars()
            .next_back()
            .is_some_and(|last| !last.is_whitespace() && !first.is_whitespace())
        {
            note.text.push(' ');
        }
        note.text.push_str(&node);
    }

    fn close(&mut self, xml_end: usize) {
        let Some(note) = self.open.take() else {
            return;
        };
        self.annotations.push(Annotation {
            span: Span::empty(note.anchor),
            text: note.text,
            kind: note.kind,
            resp: note.resp,
            xml_span: Some(Span::new(note.xml_start, xml_end)),
        });
    }

    /// Closes an unterminated note at `xml_len` and returns all annotations.
    /// Anchors past `base_len` (the trimmed tail) are clamped.
    pub fn finish(mut self, xml_len: usize, base_len: usize) -> Vec<Annotation> {
        self.close(xml_len);
        for annotation in &mut self.annotations {
            annotation.span = annotation.span.clamp_to(base_len);
        }
        self.annotations
    }
}
