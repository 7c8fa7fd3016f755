//! Half-open byte-offset interval over a document's text.

use serde::{Deserialize, Serialize};

/// A half-open interval `[begin, end)` of byte offsets into a document's text.
///
/// Spans carry no behavior beyond containment and ordering. Offsets are byte
/// offsets into the owning document's UTF-8 text, so slicing the text by a
/// span is cheap and stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Span {
    pub begin: usize,
    pub end: usize,
}

impl Span {
    /// Create a new span. `begin` must not exceed `end`.
    pub fn new(begin: usize, end: usize) -> Self {
        debug_assert!(begin <= end, "span begin {} exceeds end {}", begin, end);
        Self { begin, end }
    }

    /// Number of bytes covered.
    pub fn len(&self) -> usize {
        self.end - self.begin
    }

    /// True for zero-length spans.
    pub fn is_empty(&self) -> bool {
        self.begin == self.end
    }

    /// Covered-by containment: `inner` lies entirely within `self`.
    ///
    /// Touching boundaries count as contained, so a span covers itself and
    /// covers zero-length spans sitting on either of its endpoints.
    pub fn covers(&self, inner: Span) -> bool {
        self.begin <= inner.begin && inner.end <= self.end
    }

    /// True if the span is well-formed and lies within a text of `text_len` bytes.
    pub fn in_bounds(&self, text_len: usize) -> bool {
        self.begin <= self.end && self.end <= text_len
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}..{})", self.begin, self.end)
    }
}
