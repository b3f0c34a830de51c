use serde::Serialize;

use crate::models::{Annotation, Segment};
use crate::rendering::RenderedDocument;

/// Marks newlines in previews so each entry stays on one line.
const NEWLINE_MARK: char = '⏎';

#[derive(Debug, Serialize)]
pub struct Snap {
    pub base_text: String,
    pub segments: Vec<String>,
    pub notes: Vec<String>,
}

/// Extracts up to `max` chars of `text` starting at char `start`, with
/// "..." appended when truncated.
pub fn preview(text: &str, start: usize, end: usize, max: usize) -> String {
    let len = end.saturating_sub(start);
    let mut s: String = text
        .chars()
        .skip(start)
        .take(len.min(max))
        .map(|c| if c == '\n' { NEWLINE_MARK } else { c })
        .collect();
    if len > max {
        s.push_str("...");
    }
    s
}

fn segment_line(text: &str, s: &Segment) -> String {
    let body = preview(text, s.start(), s.end(), 40);
    if body.is_empty() {
        format!("{} @{}..{}", s.key, s.start(), s.end())
    } else {
        format!("{} @{}..{}: {body}", s.key, s.start(), s.end())
    }
}

fn note_line(a: &Annotation) -> String {
    let kind = a.kind.as_deref().unwrap_or("-");
    let resp = a.resp.as_deref().unwrap_or("-");
    format!("@{} [{kind}/{resp}] {}", a.span.start, a.text)
}

pub fn normalize(doc: &RenderedDocument) -> Snap {
    let text = doc.base_text();
    Snap {
        base_text: text.to_string(),
        segments: doc.segments().iter().map(|s| segment_line(text, s)).collect(),
        notes: doc.annotations().iter().map(note_line).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_short_text_unchanged() {
        assert_eq!(preview("hello", 0, 5, 10), "hello");
    }

    #[test]
    fn preview_truncates_long_text() {
        assert_eq!(preview("hello world", 0, 11, 5), "hello...");
    }

    #[test]
    fn preview_counts_chars() {
        assert_eq!(preview("佛說阿含經", 2, 4, 10), "阿含");
    }

    #[test]
    fn preview_marks_newlines() {
        assert_eq!(preview("a\nb", 0, 3, 10), "a⏎b");
    }
}
