//! Scoring stage: a pluggable, pure scoring function applied to every unit.

use std::sync::Arc;

use crate::annotation::{Token, Unit};
use crate::document::Document;
use crate::pipeline::{Phase, PipelineError, Stage};
use crate::span::Span;

/// Pure scoring function over the query word and a unit's covered token texts.
///
/// Implementations must be deterministic: the same inputs always produce the
/// same score, with no cross-unit state. For single-token units the token
/// text list has one element.
pub trait UnitScorer: Send + Sync {
    fn score(&self, query_word: &str, token_texts: &[&str]) -> f64;
}

/// Reference scorer: the same fixed score for every unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantScorer(pub f64);

impl Default for ConstantScorer {
    fn default() -> Self {
        ConstantScorer(1.0)
    }
}

impl UnitScorer for ConstantScorer {
    fn score(&self, _query_word: &str, _token_texts: &[&str]) -> f64 {
        self.0
    }
}

/// Stage that writes exactly one score into every existing unit.
///
/// Never adds or removes units; only their `score` feature changes.
pub struct ScoringStage {
    query_word: String,
    scorer: Arc<dyn UnitScorer>,
}

impl ScoringStage {
    pub fn new(query_word: impl Into<String>, scorer: Arc<dyn UnitScorer>) -> Self {
        Self {
            query_word: query_word.into(),
            scorer,
        }
    }
}

impl Stage for ScoringStage {
    fn name(&self) -> &'static str {
        "scoring"
    }

    fn expects(&self) -> Phase {
        Phase::Marked
    }

    fn produces(&self) -> Phase {
        Phase::Scored
    }

    fn apply(&self, doc: &mut Document) -> Result<(), PipelineError> {
        let unit_spans: Vec<Span> = doc.store().select_all::<Unit>().map(|(span, _)| span).collect();

        let mut scores = Vec::with_capacity(unit_spans.len());
        for &span in &unit_spans {
            let token_texts: Vec<&str> = doc
                .store()
                .select_covered_by::<Token>(span)
                .map(|(token, _)| doc.covered_text(token))
                .collect();
            scores.push(self.scorer.score(&self.query_word, &token_texts));
        }

        // Buckets preserve insertion order, so the zip stays aligned.
        for ((_, unit), score) in doc.store_mut().select_all_mut::<Unit>().zip(scores) {
            unit.score = Some(score);
        }
        Ok(())
    }
}
