use std::sync::OnceLock;

use regex::{Match, Regex};

use super::attributes::Attributes;
use crate::models::Span;

/// Comments first so that a `>` inside a comment does not end the token.
fn tag_regex() -> &'static Regex {
    static TAG_REGEX: OnceLock<Regex> = OnceLock::new();
    TAG_REGEX.get_or_init(|| Regex::new(r"(?s)<!--.*?-->|<[^>]*>").expect("Invalid tag regex"))
}

fn start_tag_regex() -> &'static Regex {
    static START_TAG_REGEX: OnceLock<Regex> = OnceLock::new();
    START_TAG_REGEX.get_or_init(|| {
        Regex::new(r"^<([A-Za-z_][A-Za-z0-9_:.\-]*)((?:\s[^>]*?)?)\s*(/?)>$")
            .expect("Invalid start tag regex")
    })
}

fn end_tag_regex() -> &'static Regex {
    static END_TAG_REGEX: OnceLock<Regex> = OnceLock::new();
    END_TAG_REGEX.get_or_init(|| {
        Regex::new(r"^</([A-Za-z_][A-Za-z0-9_:.\-]*)\s*>$").expect("Invalid end tag regex")
    })
}

/// One token of the input: either everything between `<` and `>` or the text
/// in between. Spans are `char` offsets into the XML source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    Tag { raw: &'a str, span: Span },
    Text { raw: &'a str, span: Span },
}

/// Splits XML into alternating tag and text tokens in a single pass.
///
/// No validation happens here: a stray `<` without a closing `>` stays text,
/// and tags that turn out to be malformed are left for [`parse_tag`] to
/// reject.
pub struct Tokenizer<'a> {
    xml: &'a str,
    byte_pos: usize,
    char_pos: usize,
    next_tag: Option<Match<'a>>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(xml: &'a str) -> Self {
        Self {
            xml,
            byte_pos: 0,
            char_pos: 0,
            next_tag: None,
        }
    }

    fn advance(&mut self, raw: &'a str) -> Span {
        let start = self.char_pos;
        self.byte_pos += raw.len();
        self.char_pos += raw.chars().count();
        Span::new(start, self.char_pos)
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        if self.byte_pos >= self.xml.len() {
            return None;
        }

        let next_tag = match self.next_tag {
            Some(m) if m.start() >= self.byte_pos => Some(m),
            _ => tag_regex().find_at(self.xml, self.byte_pos),
        };
        self.next_tag = next_tag;

        match next_tag {
            Some(m) if m.start() == self.byte_pos => {
                let raw = m.as_str();
                let span = self.advance(raw);
                Some(Token::Tag { raw, span })
            }
            Some(m) => {
                let raw = &self.xml[self.byte_pos..m.start()];
                let span = self.advance(raw);
                Some(Token::Text { raw, span })
            }
            None => {
                let raw = &self.xml[self.byte_pos..];
                let span = self.advance(raw);
                Some(Token::Text { raw, span })
            }
        }
    }
}

/// Convenience: tokenizes the whole input.
pub fn tokenize(xml: &str) -> Tokenizer<'_> {
    Tokenizer::new(xml)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    /// `<name ...>`
    Start,
    /// `<name .../>`
    Empty,
    /// `</name>`
    End,
}

/// A tag token that matched the start/end tag grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag<'a> {
    /// Qualified name as written, e.g. `lb` or `cb:juan`.
    pub name: &'a str,
    pub kind: TagKind,
    pub attributes: Attributes,
}

impl Tag<'_> {
    /// Name after the last `:`.
    pub fn local_name(&self) -> &str {
        self.name.rsplit(':').next().unwrap_or(self.name)
    }

    /// The name used for dispatch and segment keys: CBETA extension elements
    /// keep their `cb:` prefix, everything else is matched on its local name.
    pub fn canonical_name(&self) -> &str {
        if self.name.starts_with("cb:") {
            self.name
        } else {
            self.local_name()
        }
    }

    /// Start and empty tags both open an element.
    pub fn opens(&self) -> bool {
        matches!(self.kind, TagKind::Start | TagKind::Empty)
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name)
    }
}

/// Parses a tag token. Returns `None` for comments, processing instructions,
/// doctype declarations and anything else outside the tag grammar.
pub fn parse_tag(raw: &str) -> Option<Tag<'_>> {
    if let Some(caps) = end_tag_regex().captures(raw) {
        let name = caps.get(1)?.as_str();
        return Some(Tag {
            name,
            kind: TagKind::End,
            attributes: Attributes::default(),
        });
    }

    let caps = start_tag_regex().captures(raw)?;
    let name = caps.get(1)?.as_str();
    let attributes = caps
        .get(2)
        .map(|m| Attributes::parse(m.as_str()))
        .unwrap_or_default();
    let kind = if caps.get(3).is_some_and(|m| !m.as_str().is_empty()) {
        TagKind::Empty
    } else {
        TagKind::Start
    };

    Some(Tag {
        name,
        kind,
        attributes,
    })
}
