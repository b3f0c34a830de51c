use thiserror::Error;

use super::search::rightmost_index;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OffsetMapError {
    #[error("{shape} needs {expected} entries for a base text of {base_len} chars, got {actual}")]
    LengthMismatch {
        shape: &'static str,
        base_len: usize,
        expected: usize,
        actual: usize,
    },

    #[error("offset map decreases at entry {index}: {previous} > {value}")]
    NotMonotonic {
        index: usize,
        previous: usize,
        value: usize,
    },
}

/// Base-text to XML offset correspondence.
///
/// The two shapes answer different questions about a caret at base
/// position `k`:
/// - `CharMap` knows where each *character* came from (`len == base_len`),
///   so the caret has to borrow the character on its left.
/// - `PositionMap` knows where each *caret position* lands
///   (`len == base_len + 1`) and is used as is.
///
/// Both are non-decreasing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OffsetMap {
    CharMap(Vec<usize>),
    PositionMap(Vec<usize>),
}

impl OffsetMap {
    /// Validated `CharMap` for a base text of `base_len` chars.
    pub fn char_map(values: Vec<usize>, base_len: usize) -> Result<Self, OffsetMapError> {
        check_shape("char map", &values, base_len, base_len)?;
        Ok(Self::CharMap(values))
    }

    /// Validated `PositionMap` for a base text of `base_len` chars.
    pub fn position_map(values: Vec<usize>, base_len: usize) -> Result<Self, OffsetMapError> {
        check_shape("position map", &values, base_len, base_len + 1)?;
        Ok(Self::PositionMap(values))
    }

    /// Compatibility constructor for untagged maps.
    ///
    /// Only an explicit `base_text_length` with `values.len() ==
    /// base_text_length + 1` yields a `PositionMap`; everything else is read
    /// as a `CharMap`. No validation happens here. New producers should tag
    /// the shape themselves.
    pub fn from_legacy(values: Vec<usize>, base_text_length: Option<usize>) -> Self {
        match base_text_length {
            Some(len) if values.len() == len + 1 => Self::PositionMap(values),
            _ => Self::CharMap(values),
        }
    }

    pub fn values(&self) -> &[usize] {
        match self {
            Self::CharMap(v) | Self::PositionMap(v) => v,
        }
    }

    pub fn len(&self) -> usize {
        self.values().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values().is_empty()
    }

    /// XML offset for a caret at base position `caret`, or `None` for an
    /// empty map. Out-of-range carets are clamped.
    pub fn xml_index_for_caret(&self, caret: usize) -> Option<usize> {
        match self {
            Self::PositionMap(v) => {
                let last = v.len().checked_sub(1)?;
                Some(v[caret.min(last)])
            }
            Self::CharMap(v) => {
                let last = v.len().checked_sub(1)?;
                // Left-hand character: resolving to `caret` itself lands one
                // unit past what the reader pointed at.
                let index = caret.saturating_sub(1).min(last);
                Some(v[index])
            }
        }
    }

    /// Rightmost map index whose XML offset is `<= xml_index`; 0 when the
    /// offset precedes every entry. `None` for an empty map.
    pub fn base_index_for_xml(&self, xml_index: usize) -> Option<usize> {
        let values = self.values();
        if values.is_empty() {
            return None;
        }
        Some(rightmost_index(values, |&v| v <= xml_index).unwrap_or(0))
    }
}

fn check_shape(
    shape: &'static str,
    values: &[usize],
    base_len: usize,
    expected: usize,
) -> Result<(), OffsetMapError> {
    if values.len() != expected {
        return Err(OffsetMapError::LengthMismatch {
            shape,
            base_len,
            expected,
            actual: values.len(),
        });
    }
    if let Some(index) = values.windows(2).position(|w| w[0] > w[1]) {
        return Err(OffsetMapError::NotMonotonic {
            index: index + 1,
            previous: values[index],
            value: values[index + 1],
        });
    }
    Ok(())
}
