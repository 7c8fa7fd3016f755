//! A document: immutable text plus its exclusively-owned annotation store.

use crate::pipeline::Phase;
use crate::span::Span;
use crate::store::AnnotationStore;

/// Owns one text and exactly one [`AnnotationStore`] for its lifetime.
///
/// The document also tracks the pipeline [`Phase`] it is in, which is how
/// stage ordering is enforced. Documents are reusable across a batch: the
/// host resets (or replaces) the text before each run, mirroring the
/// one-document-per-worker model that makes cross-document processing
/// embarrassingly parallel.
pub struct Document {
    text: String,
    store: AnnotationStore,
    phase: Phase,
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("text_len", &self.text.len())
            .field("phase", &self.phase)
            .field("store", &self.store)
            .finish()
    }
}

impl Document {
    /// Create a fresh document in the [`Phase::Empty`] state.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            store: AnnotationStore::new(),
            phase: Phase::Empty,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// The text slice a span covers.
    ///
    /// Returns an empty slice for spans that are out of bounds or not on
    /// character boundaries; such spans never come out of a validated
    /// segmentation.
    pub fn covered_text(&self, span: Span) -> &str {
        self.text.get(span.begin..span.end).unwrap_or("")
    }

    /// The span covering the entire text, `[0, text.len())`.
    pub fn full_span(&self) -> Span {
        Span::new(0, self.text.len())
    }

    pub fn store(&self) -> &AnnotationStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut AnnotationStore {
        &mut self.store
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub(crate) fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    /// Discard all annotations and return to [`Phase::Empty`].
    ///
    /// Nothing survives a reset, so no information leaks between runs.
    pub fn reset(&mut self) {
        self.store.reset();
        self.phase = Phase::Empty;
    }

    /// Replace the text and reset, readying the document for its next run.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::Token;

    #[test]
    fn covered_text_slices_by_span() {
        let doc = Document::from_text("a quick test");
        assert_eq!(doc.covered_text(Span::new(2, 7)), "quick");
        assert_eq!(doc.covered_text(Span::new(0, 12)), "a quick test");
        assert_eq!(doc.covered_text(Span::new(5, 5)), "");
        // out of bounds yields empty rather than panicking
        assert_eq!(doc.covered_text(Span::new(0, 99)), "");
    }

    #[test]
    fn full_span_covers_whole_text() {
        let doc = Document::from_text("abc");
        assert_eq!(doc.full_span(), Span::new(0, 3));
    }

    #[test]
    fn reset_restores_empty_phase_and_store() {
        let mut doc = Document::from_text("abc");
        doc.store_mut().insert(Span::new(0, 3), Token);
        doc.set_phase(Phase::Segmented);

        doc.reset();

        assert_eq!(doc.phase(), Phase::Empty);
        assert!(doc.store().is_empty());
        assert_eq!(doc.text(), "abc");
    }

    #[test]
    fn set_text_replaces_text_and_resets() {
        let mut doc = Document::from_text("first");
        doc.store_mut().insert(Span::new(0, 5), Token);

        doc.set_text("second text");

        assert_eq!(doc.text(), "second text");
        assert_eq!(doc.phase(), Phase::Empty);
        assert!(doc.store().is_empty());
    }
}
