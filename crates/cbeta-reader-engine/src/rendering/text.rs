use std::sync::OnceLock;

use regex::Regex;

use crate::models::Span;

static ENTITY_REGEX: OnceLock<Regex> = OnceLock::new();

/// A rendered character together with the XML range it came from.
pub type SourcedChar = (char, Span);

/// Horizontal whitespace collapsed inside text nodes.
fn is_horizontal_space(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\u{0B}' | '\u{0C}')
}

/// Decodes entities in a raw text token, keeping track of where each decoded
/// character came from. `origin` is the `char` offset of `raw` in the XML.
///
/// Characters produced by an entity all map to the whole entity. Unknown
/// entities are kept literally.
pub fn decode_with_sources(raw: &str, origin: usize) -> Vec<SourcedChar> {
    let mut out = Vec::with_capacity(raw.len());
    let mut pos = origin;
    let mut last = 0;

    fn push_literal(text: &str, pos: &mut usize, out: &mut Vec<SourcedChar>) {
        for ch in text.chars() {
            out.push((ch, Span::new(*pos, *pos + 1)));
            *pos += 1;
        }
    }

    let entity_regex = ENTITY_REGEX.get_or_init(|| {
        Regex::new(r"&(?:#[0-9]{1,7}|#[xX][0-9A-Fa-f]{1,6}|[A-Za-z][A-Za-z0-9]{1,31});")
            .expect("Invalid entity regex")
    });
    for m in entity_regex.find_iter(raw) {
        push_literal(&raw[last..m.start()], &mut pos, &mut out);
        last = m.end();

        let entity = m.as_str();
        let decoded = html_escape::decode_html_entities(entity);
        if decoded == entity {
            push_literal(entity, &mut pos, &mut out);
            continue;
        }

        // Entities are ASCII, so byte length equals char length.
        let source = Span::new(pos, pos + entity.len());
        out.extend(decoded.chars().map(|ch| (ch, source)));
        pos = source.end;
    }
    push_literal(&raw[last..], &mut pos, &mut out);

    out
}

/// Normalizes one text node: entity decoding, carriage returns stripped,
/// horizontal whitespace runs collapsed to one space, and the node trimmed.
///
/// A collapsed run maps to the whole run in the source.
pub fn normalize_text_node(raw: &str, origin: usize) -> Vec<SourcedChar> {
    let mut out: Vec<SourcedChar> = Vec::new();
    let mut in_run = false;

    for (ch, source) in decode_with_sources(raw, origin) {
        if ch == '\r' {
            continue;
        }
        if is_horizontal_space(ch) {
            match out.last_mut() {
                Some((_, run)) if in_run => *run = run.cover(source),
                _ => out.push((' ', source)),
            }
            in_run = true;
        } else {
            out.push((ch, source));
            in_run = false;
        }
    }

    let start = out
        .iter()
        .position(|(ch, _)| !ch.is_whitespace())
        .unwrap_or(out.len());
    let end = out
        .iter()
        .rposition(|(ch, _)| !ch.is_whitespace())
        .map_or(start, |i| i + 1);
    out.truncate(end);
    out.drain(..start);
    out
}

/// The base text under construction, with one source span per character.
///
/// Offsets handed out by [`TextBuffer::len`] are final: characters are only
/// ever appended, and removal is limited to trailing whitespace.
#[derive(Debug, Default)]
pub struct TextBuffer {
    text: String,
    sources: Vec<Span>,
}

impl TextBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Length in chars.
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    fn last_char(&self) -> Option<char> {
        self.text.chars().next_back()
    }

    fn push(&mut self, ch: char, source: Span) {
        self.text.push(ch);
        self.sources.push(source);
    }

    fn pop(&mut self) -> Option<char> {
        let ch = self.text.pop()?;
        self.sources.pop();
        Some(ch)
    }

    fn trailing_newlines(&self) -> usize {
        self.text.chars().rev().take_while(|&c| c == '\n').count()
    }

    /// Emits one newline unless the buffer is empty or already ends with one.
    pub fn line_break(&mut self, source: Span) {
        match self.last_char() {
            None | Some('\n') => {}
            Some(_) => self.push('\n', source),
        }
    }

    /// Normalizes the tail to a blank-line separator without ever reducing
    /// existing separation. No-op on an empty buffer.
    pub fn paragraph_break(&mut self, source: Span) {
        while matches!(self.last_char(), Some(' ' | '\t' | '\r')) {
            self.pop();
        }
        if self.is_empty() {
            return;
        }
        match self.trailing_newlines() {
            0 => {
                self.push('\n', source);
                self.push('\n', source);
            }
            1 => self.push('\n', source),
            _ => {}
        }
    }

    /// Appends a normalized text node, gluing it to preceding content with a
    /// single space when neither side is whitespace.
    pub fn push_text(&mut self, node: &[SourcedChar]) {
        let Some(&(first, first_source)) = node.first() else {
            return;
        };
        if let Some(last) = self.last_char()
            && !last.is_whitespace()
            && !first.is_whitespace()
        {
            self.push(' ', Span::empty(first_source.start));
        }
        for &(ch, source) in node {
            self.push(ch, source);
        }
    }

    /// Trims trailing whitespace and hands out the text and its sources.
    pub fn finish(mut self) -> (String, Vec<Span>) {
        while self.last_char().is_some_and(char::is_whitespace) {
            self.pop();
        }
        (self.text, self.sources)
    }
}
