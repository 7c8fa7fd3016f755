//! Marking stage: a unit for every token matching the query word.

use crate::annotation::{Sentence, Token, Unit};
use crate::document::Document;
use crate::pipeline::{Phase, PipelineError, Stage};
use crate::span::Span;

/// Stage that marks tokens equal to the query word as [`Unit`]s.
///
/// Matching is exact string equality, case-sensitive, no normalization.
/// Only tokens wholly covered by a sentence are considered, so units always
/// satisfy the nesting invariant. A token text occurring twice yields two
/// units.
#[derive(Debug, Clone)]
pub struct QueryMarker {
    query_word: String,
}

impl QueryMarker {
    pub fn new(query_word: impl Into<String>) -> Self {
        Self {
            query_word: query_word.into(),
        }
    }

    pub fn query_word(&self) -> &str {
        &self.query_word
    }
}

impl Stage for QueryMarker {
    fn name(&self) -> &'static str {
        "marking"
    }

    fn expects(&self) -> Phase {
        Phase::Segmented
    }

    fn produces(&self) -> Phase {
        Phase::Marked
    }

    fn apply(&self, doc: &mut Document) -> Result<(), PipelineError> {
        // Tokens are never empty-text after segmentation, so an empty query
        // word can never match.
        if self.query_word.is_empty() {
            return Ok(());
        }

        let mut matched: Vec<Span> = Vec::new();
        for (sentence, _) in doc.store().select_all::<Sentence>() {
            for (token, _) in doc.store().select_covered_by::<Token>(sentence) {
                if doc.covered_text(token) == self.query_word {
                    matched.push(token);
                }
            }
        }

        for span in matched {
            doc.store_mut().insert(span, Unit::unscored());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::{SegmentationStage, UnicodeSegmenter};

    fn marked_doc(text: &str, query_word: &str) -> Document {
        let mut doc = Document::from_text(text);
        SegmentationStage::new(UnicodeSegmenter::new())
            .run(&mut doc)
            .unwrap();
        QueryMarker::new(query_word).run(&mut doc).unwrap();
        doc
    }

    fn unit_spans(doc: &Document) -> Vec<Span> {
        doc.store().select_all::<Unit>().map(|(span, _)| span).collect()
    }

    #[test]
    fn one_unit_per_exact_occurrence() {
        let doc = marked_doc("a test here and a test there", "test");
        assert_eq!(unit_spans(&doc), vec![Span::new(2, 6), Span::new(18, 22)]);
    }

    #[test]
    fn units_start_unscored() {
        let doc = marked_doc("a test", "test");
        assert!(doc
            .store()
            .select_all::<Unit>()
            .all(|(_, unit)| unit.score.is_none()));
    }

    #[test]
    fn matching_is_case_sensitive() {
        let doc = marked_doc("Test and test and TEST", "test");
        assert_eq!(unit_spans(&doc).len(), 1);
    }

    #[test]
    fn no_substring_matches() {
        let doc = marked_doc("testing tests attest", "test");
        assert!(unit_spans(&doc).is_empty());
    }

    #[test]
    fn empty_query_never_matches() {
        let doc = marked_doc("some words here", "");
        assert!(unit_spans(&doc).is_empty());
        assert_eq!(doc.phase(), Phase::Marked);
    }

    #[test]
    fn marking_requires_a_segmented_document() {
        let mut doc = Document::from_text("a test");
        let err = QueryMarker::new("test").run(&mut doc).unwrap_err();
        assert_eq!(
            err,
            PipelineError::PhaseOrder {
                stage: "marking",
                expected: Phase::Segmented,
                found: Phase::Empty,
            }
        );
    }
}
