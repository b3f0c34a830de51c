use super::{
    RenderOptions, RenderedDocument,
    notes::NoteCollector,
    segments::{SegmentBuilder, segment_key},
    text::{TextBuffer, normalize_text_node},
    tokenizer::{Tag, TagKind, Token, parse_tag, tokenize},
};
use crate::models::Span;

/// Single-pass state machine behind [`super::render_with`].
pub(super) struct Renderer<'o> {
    options: &'o RenderOptions,
    buffer: TextBuffer,
    segments: SegmentBuilder,
    notes: NoteCollector,
    header_depth: usize,
    xml_len: usize,
}

impl<'o> Renderer<'o> {
    pub(super) fn new(options: &'o RenderOptions) -> Self {
        Self {
            options,
            buffer: TextBuffer::new(),
            segments: SegmentBuilder::new(),
            notes: NoteCollector::new(),
            header_depth: 0,
            xml_len: 0,
        }
    }

    pub(super) fn run(mut self, xml: &str) -> RenderedDocument {
        for token in tokenize(xml) {
            match token {
                Token::Tag { raw, span } => self.on_tag(raw, span),
                Token::Text { raw, span } => self.on_text(raw, span),
            }
            self.xml_len = match token {
                Token::Tag { span, .. } | Token::Text { span, .. } => span.end,
            };
        }
        self.finish()
    }

    fn on_tag(&mut self, raw: &str, span: Span) {
        let Some(tag) = parse_tag(raw) else {
            log::trace!("skipping unrecognised markup at {}: {raw:?}", span.start);
            return;
        };

        if tag.local_name() == "teiHeader" {
            match tag.kind {
                TagKind::Start => self.header_depth += 1,
                TagKind::End => self.header_depth = self.header_depth.saturating_sub(1),
                TagKind::Empty => {}
            }
            return;
        }
        if self.header_depth > 0 {
            return;
        }

        if self.options.collect_notes && self.notes.on_tag(&tag, span, self.buffer.len()) {
            return;
        }

        let close_at = self.buffer.len();
        self.apply_text_effect(&tag, span);
        if let Some(key) = segment_key(&tag) {
            self.segments.split(close_at, key, self.buffer.len());
        }
    }

    fn apply_text_effect(&mut self, tag: &Tag<'_>, span: Span) {
        match (tag.canonical_name(), tag.kind) {
            ("lb", TagKind::Start | TagKind::Empty) => self.buffer.line_break(span),
            ("pb", TagKind::Start | TagKind::Empty) | ("p", _) | ("head", _) => {
                self.buffer.paragraph_break(span)
            }
            _ => {}
        }
    }

    fn on_text(&mut self, raw: &str, span: Span) {
        if self.header_depth > 0 {
            return;
        }
        if self.notes.is_open() {
            self.notes.on_text(raw, span);
            return;
        }
        self.buffer.push_text(&normalize_text_node(raw, span.start));
    }

    fn finish(self) -> RenderedDocument {
        let (base_text, sources) = self.buffer.finish();
        let base_len = sources.len();
        let segments = self.segments.finish(base_len);
        let annotations = self.notes.finish(self.xml_len, base_len);

        log::debug!(
            "rendered {} xml chars into {} base chars, {} segments, {} notes",
            self.xml_len,
            base_len,
            segments.len(),
            annotations.len()
        );

        RenderedDocument {
            base_text,
            segments,
            annotations,
            sources,
        }
    }
}
