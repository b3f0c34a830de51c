use crate::models::START_KEY;
use crate::rendering::RenderedDocument;

/// Validates renderer output invariants.
///
/// Asserts that:
/// - The first segment is `START` and begins at 0, unless there are no
///   segments and no text at all
/// - Segment starts are non-decreasing and no two segments overlap
/// - All segment and annotation spans are within the base text
/// - There is exactly one source span per base character
/// - Both offset maps are non-decreasing
///
/// # Panics
/// Panics with a descriptive message if any invariant is violated.
pub fn check(doc: &RenderedDocument) {
    let n = doc.base_len();
    assert_eq!(
        doc.base_text().chars().count(),
        n,
        "source map length differs from base text length"
    );

    let segments = doc.segments();
    match segments.first() {
        Some(first) => {
            assert_eq!(first.key, START_KEY, "first segment is not START");
            assert_eq!(first.start(), 0, "first segment does not start at 0");
        }
        None => assert_eq!(n, 0, "text rendered without any segment"),
    }

    for s in segments {
        assert!(
            s.start() <= s.end() && s.end() <= n,
            "segment span out of bounds: {} {:?} (base len: {})",
            s.key,
            s.span,
            n
        );
    }
    for pair in segments.windows(2) {
        assert!(
            pair[0].end() <= pair[1].start(),
            "segments overlap: {} {:?} and {} {:?}",
            pair[0].key,
            pair[0].span,
            pair[1].key,
            pair[1].span
        );
    }

    for a in doc.annotations() {
        assert!(
            a.span.start <= a.span.end && a.span.end <= n,
            "annotation span out of bounds: {:?} (base len: {})",
            a.span,
            n
        );
    }

    for map in [doc.char_map(), doc.position_map()] {
        assert!(
            map.values().windows(2).all(|w| w[0] <= w[1]),
            "offset map is not monotone: {map:?}"
        );
    }
}
