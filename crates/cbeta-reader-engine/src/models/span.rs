use serde::{Deserialize, Serialize};

/// A `char` range `[start, end)` into one of the text coordinate spaces.
///
/// Which space (base text, display text or XML source) is implied by the
/// record holding the span; spans from different spaces must never be mixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Span {
    /// Inclusive start offset.
    pub start: usize,
    /// Exclusive end offset.
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// An empty span sitting at `at`.
    pub fn empty(at: usize) -> Self {
        Self { start: at, end: at }
    }

    /// Returns the length in chars. Uses saturating subtraction for safety.
    #[must_use]
    pub fn len(self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns true if the span is empty (start >= end).
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.len() == 0
    }

    /// Half-open containment: `start <= offset < end`.
    #[must_use]
    pub fn contains(self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }

    /// Whether this span shares at least one position with the closed window
    /// `[lo, hi]`. Empty spans count when their position lies in the window.
    #[must_use]
    pub fn touches_window(self, lo: usize, hi: usize) -> bool {
        self.start <= hi && self.end.max(self.start + 1) > lo
    }

    /// Distance from `offset` to the nearest position of the span, 0 inside.
    #[must_use]
    pub fn distance_to(self, offset: usize) -> usize {
        if offset < self.start {
            self.start - offset
        } else if offset >= self.end {
            (offset + 1).saturating_sub(self.end.max(self.start + 1))
        } else {
            0
        }
    }

    /// Joins two spans into the smallest span covering both.
    #[must_use]
    pub fn cover(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Clamps both ends to `limit`.
    #[must_use]
    pub fn clamp_to(self, limit: usize) -> Span {
        Span {
            start: self.start.min(limit),
            end: self.end.min(limit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn len_saturates_for_inverted_spans() {
        assert_eq!(Span::new(5, 3).len(), 0);
        assert!(Span::new(5, 3).is_empty());
    }

    #[test]
    fn contains_is_half_open() {
        let sp = Span::new(10, 12);
        assert!(!sp.contains(9));
        assert!(sp.contains(10));
        assert!(sp.contains(11));
        assert!(!sp.contains(12));
    }

    #[test]
    fn empty_span_contains_nothing() {
        assert!(!Span::empty(4).contains(4));
    }

    #[test]
    fn touches_window_for_neighbouring_spans() {
        let sp = Span::new(10, 12);
        assert!(sp.touches_window(0, 10));
        assert!(sp.touches_window(11, 20));
        assert!(!sp.touches_window(12, 20));
        assert!(!sp.touches_window(0, 9));
    }

    #[test]
    fn touches_window_for_empty_span() {
        let sp = Span::empty(7);
        assert!(sp.touches_window(7, 7));
        assert!(sp.touches_window(0, 10));
        assert!(!sp.touches_window(8, 10));
    }

    #[test]
    fn distance_to_either_side() {
        let sp = Span::new(10, 12);
        assert_eq!(sp.distance_to(5), 5);
        assert_eq!(sp.distance_to(10), 0);
        assert_eq!(sp.distance_to(11), 0);
        // 12 is one past the last position of the span
        assert_eq!(sp.distance_to(12), 1);
        assert_eq!(sp.distance_to(16), 5);
    }

    #[test]
    fn cover_and_clamp() {
        assert_eq!(Span::new(2, 4).cover(Span::new(3, 9)), Span::new(2, 9));
        assert_eq!(Span::new(2, 9).clamp_to(5), Span::new(2, 5));
        assert_eq!(Span::new(7, 9).clamp_to(5), Span::new(5, 5));
    }
}
