//! Fixed-order pipeline runner and its per-document phase machine.
//!
//! A document moves through `Empty → Segmented → Marked → Scored →
//! Aggregated`, one stage per transition, strictly in sequence. Each stage's
//! preconditions are the previous stage's postconditions; [`Stage::run`]
//! enforces that with the document's [`Phase`] and rejects out-of-order
//! invocation before touching the store.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::aggregator::{AggregationError, AggregationStage};
use crate::annotation::Aggregate;
use crate::document::Document;
use crate::marker::QueryMarker;
use crate::scorer::{ConstantScorer, ScoringStage, UnitScorer};
use crate::segment::{SegmentationError, SegmentationStage, Segmenter, UnicodeSegmenter};

/// Processing state of one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    Empty,
    Segmented,
    Marked,
    Scored,
    Aggregated,
}

/// Any failure that aborts a document's pipeline run.
///
/// No partial result is reported; the runner resets the store before the
/// next run, so a failed document never contaminates a later one.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    /// A stage was invoked on a document in the wrong phase.
    #[error("{stage} stage expects a document in the {expected:?} phase, found {found:?}")]
    PhaseOrder {
        stage: &'static str,
        expected: Phase,
        found: Phase,
    },

    #[error(transparent)]
    Segmentation(#[from] SegmentationError),

    #[error(transparent)]
    Aggregation(#[from] AggregationError),
}

/// One transformation step in the fixed stage order.
///
/// Implementors provide [`apply`](Stage::apply); the default
/// [`run`](Stage::run) wraps it with phase enforcement. A phase mismatch
/// leaves the document untouched.
pub trait Stage: Send + Sync {
    fn name(&self) -> &'static str;

    /// Phase the document must be in before this stage runs.
    fn expects(&self) -> Phase;

    /// Phase the document is in after this stage completes.
    fn produces(&self) -> Phase;

    fn apply(&self, doc: &mut Document) -> Result<(), PipelineError>;

    fn run(&self, doc: &mut Document) -> Result<(), PipelineError> {
        let found = doc.phase();
        let expected = self.expects();
        if found != expected {
            return Err(PipelineError::PhaseOrder {
                stage: self.name(),
                expected,
                found,
            });
        }
        self.apply(doc)?;
        doc.set_phase(self.produces());
        Ok(())
    }
}

/// Configuration for wiring a default [`Pipeline`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Token to mark, compared by exact, case-sensitive equality.
    pub query_word: String,
    /// Score the default constant scorer assigns to every unit.
    pub unit_score: f64,
}

impl PipelineConfig {
    pub fn new(query_word: impl Into<String>) -> Self {
        Self {
            query_word: query_word.into(),
            unit_score: 1.0,
        }
    }

    pub fn with_unit_score(mut self, unit_score: f64) -> Self {
        self.unit_score = unit_score;
        self
    }
}

/// Owns the four stages and runs them in fixed order, one document at a time.
///
/// The pipeline itself is immutable during processing (`&self` throughout);
/// all mutation happens in the document passed to it. Giving each worker its
/// own [`Document`] makes cross-document processing embarrassingly parallel.
pub struct Pipeline {
    segmentation: SegmentationStage,
    marking: QueryMarker,
    scoring: ScoringStage,
    aggregation: AggregationStage,
}

impl Pipeline {
    /// Default-wired pipeline: UAX #29 segmentation and a constant scorer.
    pub fn new(config: PipelineConfig) -> Self {
        let scorer = Arc::new(ConstantScorer(config.unit_score));
        Self::with_collaborators(&config.query_word, UnicodeSegmenter::new(), scorer)
    }

    /// Pipeline with an explicit segmenter and scoring function.
    pub fn with_collaborators(
        query_word: &str,
        segmenter: impl Segmenter + 'static,
        scorer: Arc<dyn UnitScorer>,
    ) -> Self {
        Self {
            segmentation: SegmentationStage::new(segmenter),
            marking: QueryMarker::new(query_word),
            scoring: ScoringStage::new(query_word, scorer),
            aggregation: AggregationStage::new(),
        }
    }

    fn stages(&self) -> [&dyn Stage; 4] {
        [
            &self.segmentation,
            &self.marking,
            &self.scoring,
            &self.aggregation,
        ]
    }

    /// Process one document end to end and extract its score.
    ///
    /// The store is reset unconditionally before the stages run, so state
    /// from an earlier (possibly failed) run never leaks into this one, and
    /// reset again after extraction so no partial state is exposed.
    pub fn process(&self, doc: &mut Document) -> Result<f64, PipelineError> {
        doc.reset();
        for stage in self.stages() {
            stage.run(doc)?;
        }
        let score = extract_score(doc)?;
        doc.reset();
        Ok(score)
    }

    /// Process a fresh document created from `text`.
    pub fn process_text(&self, text: &str) -> Result<f64, PipelineError> {
        let mut doc = Document::from_text(text);
        self.process(&mut doc)
    }
}

/// Read the single aggregate's score out of a fully processed document.
fn extract_score(doc: &Document) -> Result<f64, PipelineError> {
    let mut aggregates = doc.store().select_all::<Aggregate>();
    let (_, aggregate) = aggregates
        .next()
        .ok_or(AggregationError::NoUnits)?;
    if aggregates.next().is_some() {
        return Err(AggregationError::DuplicateAggregate.into());
    }
    Ok(aggregate.score)
}
