//! The closed set of annotation record shapes the pipeline works with.
//!
//! Instead of a runtime type registry with name-based feature lookup, each
//! annotation kind is a distinct Rust type and features are plain fields.
//! Reading a feature that does not exist is a compile error, not a runtime
//! one. The [`AnnotationKind`] marker trait ties the shapes to the store's
//! type-keyed buckets and supplies a stable name for errors and display.

use std::any::Any;
use std::fmt::Debug;

/// Marker trait for the record shapes an [`AnnotationStore`] can hold.
///
/// [`AnnotationStore`]: crate::AnnotationStore
pub trait AnnotationKind: Any + Debug + Send + Sync {
    /// Stable name used in error messages and display output.
    const NAME: &'static str;
}

/// A sentence produced by the segmentation stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sentence;

impl AnnotationKind for Sentence {
    const NAME: &'static str = "Sentence";
}

/// A token produced by the segmentation stage, nested inside a sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token;

impl AnnotationKind for Token {
    const NAME: &'static str = "Token";
}

/// A token marked by the query predicate.
///
/// Created unscored by the marking stage; the scoring stage writes exactly
/// one score into every unit.
#[derive(Clone, Copy, PartialEq)]
pub struct Unit {
    pub score: Option<f64>,
}

impl Unit {
    /// A unit as the marking stage creates it, before scoring.
    pub fn unscored() -> Self {
        Self { score: None }
    }
}

impl Debug for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Compact format for snapshot tests
        match self.score {
            Some(score) => write!(f, "Unit(score: {:.2})", score),
            None => write!(f, "Unit(unscored)"),
        }
    }
}

impl AnnotationKind for Unit {
    const NAME: &'static str = "Unit";
}

/// The single document-spanning annotation holding the mean unit score.
#[derive(Clone, Copy, PartialEq)]
pub struct Aggregate {
    pub score: f64,
}

impl Debug for Aggregate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Aggregate(score: {:.2})", self.score)
    }
}

impl AnnotationKind for Aggregate {
    const NAME: &'static str = "Aggregate";
}
