//! Per-document index of typed, span-tagged records.
//!
//! Records are stored type-erased in buckets keyed by `TypeId`, one bucket
//! per [`AnnotationKind`]. Each bucket preserves insertion order, which keeps
//! every query deterministic without a semantic ordering requirement
//! downstream.

use std::any::{Any, TypeId};
use std::collections::HashMap;

use crate::annotation::AnnotationKind;
use crate::span::Span;

/// Mutable, document-scoped annotation index.
///
/// A store is exclusively owned by one [`Document`] and never shared across
/// concurrent pipeline runs.
///
/// [`Document`]: crate::Document
#[derive(Default)]
pub struct AnnotationStore {
    by_kind: HashMap<TypeId, Vec<(Span, Box<dyn Any + Send + Sync>)>>,
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an annotation. Never rejects a well-formed span; bounds against
    /// the document text are the segmentation boundary's responsibility.
    pub fn insert<T: AnnotationKind>(&mut self, span: Span, value: T) {
        self.by_kind
            .entry(TypeId::of::<T>())
            .or_default()
            .push((span, Box::new(value)));
    }

    /// Every annotation of kind `T`, in insertion order.
    pub fn select_all<T: AnnotationKind>(&self) -> impl Iterator<Item = (Span, &T)> + '_ {
        self.by_kind
            .get(&TypeId::of::<T>())
            .into_iter()
            .flatten()
            .filter_map(|(span, value)| value.downcast_ref::<T>().map(|value| (*span, value)))
    }

    /// Mutable variant of [`select_all`](Self::select_all), in insertion order.
    pub fn select_all_mut<T: AnnotationKind>(
        &mut self,
    ) -> impl Iterator<Item = (Span, &mut T)> + '_ {
        self.by_kind
            .get_mut(&TypeId::of::<T>())
            .into_iter()
            .flatten()
            .filter_map(|(span, value)| {
                let span = *span;
                value.downcast_mut::<T>().map(|value| (span, value))
            })
    }

    /// Annotations of kind `T` whose span is fully contained in `outer`,
    /// in insertion order. Touching boundaries count as contained.
    pub fn select_covered_by<T: AnnotationKind>(
        &self,
        outer: Span,
    ) -> impl Iterator<Item = (Span, &T)> + '_ {
        self.select_all::<T>()
            .filter(move |(span, _)| outer.covers(*span))
    }

    /// Number of annotations of kind `T`.
    pub fn count_of<T: AnnotationKind>(&self) -> usize {
        self.by_kind
            .get(&TypeId::of::<T>())
            .map_or(0, |bucket| bucket.len())
    }

    /// True when the store holds no annotations of any kind.
    pub fn is_empty(&self) -> bool {
        self.by_kind.values().all(|bucket| bucket.is_empty())
    }

    /// Discard all annotations. Keeps no cross-document state.
    pub fn reset(&mut self) {
        self.by_kind.clear();
    }
}

impl std::fmt::Debug for AnnotationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnnotationStore")
            .field("kinds", &self.by_kind.len())
            .field(
                "annotations",
                &self.by_kind.values().map(|bucket| bucket.len()).sum::<usize>(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::{Aggregate, Sentence, Token, Unit};

    #[test]
    fn select_all_preserves_insertion_order() {
        let mut store = AnnotationStore::new();
        store.insert(Span::new(5, 9), Token);
        store.insert(Span::new(0, 4), Token);
        store.insert(Span::new(10, 14), Token);

        let spans: Vec<Span> = store.select_all::<Token>().map(|(span, _)| span).collect();
        assert_eq!(
            spans,
            vec![Span::new(5, 9), Span::new(0, 4), Span::new(10, 14)]
        );
    }

    #[test]
    fn kinds_are_indexed_independently() {
        let mut store = AnnotationStore::new();
        store.insert(Span::new(0, 10), Sentence);
        store.insert(Span::new(0, 4), Token);
        store.insert(Span::new(5, 9), Token);

        assert_eq!(store.count_of::<Sentence>(), 1);
        assert_eq!(store.count_of::<Token>(), 2);
        assert_eq!(store.count_of::<Unit>(), 0);
    }

    #[test]
    fn covered_by_honors_containment_boundaries() {
        let mut store = AnnotationStore::new();
        store.insert(Span::new(0, 4), Token); // touches left boundary
        store.insert(Span::new(6, 10), Token); // touches right boundary
        store.insert(Span::new(0, 10), Token); // equals outer
        store.insert(Span::new(8, 12), Token); // overlaps, not nested
        store.insert(Span::new(12, 14), Token); // disjoint
        store.insert(Span::new(5, 5), Token); // zero-length inside

        let covered: Vec<Span> = store
            .select_covered_by::<Token>(Span::new(0, 10))
            .map(|(span, _)| span)
            .collect();
        assert_eq!(
            covered,
            vec![
                Span::new(0, 4),
                Span::new(6, 10),
                Span::new(0, 10),
                Span::new(5, 5)
            ]
        );
    }

    #[test]
    fn select_all_mut_allows_in_place_feature_writes() {
        let mut store = AnnotationStore::new();
        store.insert(Span::new(0, 4), Unit::unscored());
        store.insert(Span::new(5, 9), Unit::unscored());

        for (_, unit) in store.select_all_mut::<Unit>() {
            unit.score = Some(2.0);
        }

        assert!(store
            .select_all::<Unit>()
            .all(|(_, unit)| unit.score == Some(2.0)));
    }

    #[test]
    fn reset_discards_every_kind() {
        let mut store = AnnotationStore::new();
        store.insert(Span::new(0, 10), Sentence);
        store.insert(Span::new(0, 4), Token);
        store.insert(Span::new(0, 4), Unit::unscored());
        store.insert(Span::new(0, 10), Aggregate { score: 1.0 });

        store.reset();

        assert!(store.is_empty());
        assert_eq!(store.select_all::<Sentence>().count(), 0);
        assert_eq!(store.select_all::<Token>().count(), 0);
        assert_eq!(store.select_all::<Unit>().count(), 0);
        assert_eq!(store.select_all::<Aggregate>().count(), 0);
    }
}
