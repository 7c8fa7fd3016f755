//! Aggregation stage: one document-spanning mean over all unit scores.

use thiserror::Error;

use crate::annotation::{Aggregate, Unit};
use crate::document::Document;
use crate::pipeline::{Phase, PipelineError, Stage};
use crate::span::Span;

/// Aggregation failure.
///
/// Zero units is a reportable error by policy: the mean of nothing is
/// undefined, and failing beats silently emitting NaN.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AggregationError {
    #[error("no units to aggregate")]
    NoUnits,

    #[error("unit at {span} has no score")]
    UnscoredUnit { span: Span },

    #[error("document already holds an aggregate")]
    DuplicateAggregate,
}

/// Stage that reduces all unit scores into one [`Aggregate`] annotation
/// spanning the entire text.
#[derive(Debug, Clone, Copy, Default)]
pub struct AggregationStage;

impl AggregationStage {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for AggregationStage {
    fn name(&self) -> &'static str {
        "aggregation"
    }

    fn expects(&self) -> Phase {
        Phase::Scored
    }

    fn produces(&self) -> Phase {
        Phase::Aggregated
    }

    fn apply(&self, doc: &mut Document) -> Result<(), PipelineError> {
        if doc.store().count_of::<Aggregate>() > 0 {
            return Err(AggregationError::DuplicateAggregate.into());
        }

        let mut total = 0.0;
        let mut count = 0usize;
        for (span, unit) in doc.store().select_all::<Unit>() {
            total += unit
                .score
                .ok_or(AggregationError::UnscoredUnit { span })?;
            count += 1;
        }
        if count == 0 {
            return Err(AggregationError::NoUnits.into());
        }

        let span = doc.full_span();
        doc.store_mut().insert(
            span,
            Aggregate {
                score: total / count as f64,
            },
        );
        Ok(())
    }
}
