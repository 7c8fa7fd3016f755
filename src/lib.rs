//! Typed span-annotation store with a staged query-scoring pipeline.
//!
//! A [`Document`] owns immutable text and one [`AnnotationStore`]. A
//! [`Pipeline`] runs four stages over it, strictly in order:
//!
//! 1. Segmentation — [`Sentence`] and [`Token`] spans from a [`Segmenter`]
//!    collaborator (UAX #29 by default)
//! 2. Marking — a [`Unit`] for every token exactly equal to the query word
//! 3. Scoring — one score per unit via a pluggable [`UnitScorer`]
//! 4. Aggregation — one document-spanning [`Aggregate`] holding the mean
//!
//! The aggregate's score is the document's result; any stage failure aborts
//! the run with a [`PipelineError`] and no partial result. Each document
//! owns its store exclusively and is reset between runs, so a batch host can
//! process documents in parallel with one [`Document`] per worker.
//!
//! ```
//! use annoscore::{Pipeline, PipelineConfig};
//!
//! let pipeline = Pipeline::new(PipelineConfig::new("test"));
//! let score = pipeline.process_text("This is a test.").unwrap();
//! assert_eq!(score, 1.0);
//! ```

mod aggregator;
mod annotation;
mod display;
mod document;
mod marker;
mod pipeline;
mod scorer;
mod segment;
mod span;
mod store;

pub use aggregator::{AggregationError, AggregationStage};
pub use annotation::{Aggregate, AnnotationKind, Sentence, Token, Unit};
pub use display::StoreDisplay;
pub use document::Document;
pub use marker::QueryMarker;
pub use pipeline::{Phase, Pipeline, PipelineConfig, PipelineError, Stage};
pub use scorer::{ConstantScorer, ScoringStage, UnitScorer};
pub use segment::{
    PresetSegmenter, Segmentation, SegmentationError, SegmentationStage, Segmenter,
    UnicodeSegmenter,
};
pub use span::Span;
pub use store::AnnotationStore;

#[cfg(test)]
mod tests {
    mod pipeline;
}
