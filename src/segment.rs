//! Segmentation stage and the segmenter collaborator seam.
//!
//! Segmentation is the boundary to an external collaborator: anything that
//! can split raw text into sentence and token spans satisfying the nesting
//! invariant (tokens never cross sentence boundaries). The stage validates
//! the collaborator's output before indexing any of it, so a misbehaving
//! segmenter fails the document instead of leaving partial annotations.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use unicode_segmentation::UnicodeSegmentation;

use crate::annotation::{Sentence, Token};
use crate::document::Document;
use crate::pipeline::{Phase, PipelineError, Stage};
use crate::span::Span;

/// Sentence and token spans produced by a [`Segmenter`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segmentation {
    pub sentences: Vec<Span>,
    pub tokens: Vec<Span>,
}

/// External collaborator that splits raw text into sentence and token spans.
pub trait Segmenter: Send + Sync {
    fn segment(&self, text: &str) -> Result<Segmentation, SegmentationError>;
}

/// Segmentation failure, either from the collaborator itself or because its
/// output violates the nesting invariant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SegmentationError {
    #[error("segmenter failed: {0}")]
    Collaborator(String),

    #[error("span {span} exceeds text length {text_len}")]
    SpanOutOfBounds { span: Span, text_len: usize },

    #[error("token {span} is not covered by any sentence")]
    TokenOutsideSentence { span: Span },

    #[error("token {span} covers no text")]
    EmptyToken { span: Span },
}

/// Abbreviations whose trailing period must not end a sentence.
static ABBREVIATIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "dr", "mr", "mrs", "ms", "prof", "sr", "jr", // titles
        "inc", "ltd", "corp", "co", "llc", // companies
        "e.g", "i.e", "vs", "etc", "approx", // latin / common
        "u.s", "u.k", "p.m", "a.m", // dotted pairs
        "st", "ave", "blvd", "dept", "fig", // misc
    ]
    .iter()
    .copied()
    .collect()
});

/// UAX #29 segmenter with an abbreviation merge pass over sentence bounds.
///
/// Sentence and word boundaries come from [`unicode_segmentation`]. A
/// sentence bound directly after a known abbreviation ("Dr.", "e.g.") is
/// merged into the following sentence. Word-bound segments that are pure
/// whitespace are dropped, so tokens always cover visible text.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnicodeSegmenter;

impl UnicodeSegmenter {
    pub fn new() -> Self {
        Self
    }

    fn ends_in_abbreviation(sentence: &str) -> bool {
        let trimmed = sentence.trim_end();
        let stem = match trimmed.strip_suffix('.') {
            Some(stem) => stem,
            None => return false,
        };
        let last_word = stem
            .rsplit(|c: char| c.is_whitespace())
            .next()
            .unwrap_or("");
        ABBREVIATIONS.contains(last_word.to_lowercase().as_str())
    }
}

impl Segmenter for UnicodeSegmenter {
    fn segment(&self, text: &str) -> Result<Segmentation, SegmentationError> {
        let mut sentences: Vec<Span> = Vec::new();
        for (start, sentence) in text.split_sentence_bound_indices() {
            let span = Span::new(start, start + sentence.len());
            match sentences.last_mut() {
                Some(prev) if Self::ends_in_abbreviation(&text[prev.begin..prev.end]) => {
                    prev.end = span.end;
                }
                _ => sentences.push(span),
            }
        }

        let mut tokens = Vec::new();
        for sentence in &sentences {
            let slice = &text[sentence.begin..sentence.end];
            for (offset, word) in slice.split_word_bound_indices() {
                if word.chars().all(char::is_whitespace) {
                    continue;
                }
                let begin = sentence.begin + offset;
                tokens.push(Span::new(begin, begin + word.len()));
            }
        }

        Ok(Segmentation { sentences, tokens })
    }
}

/// Segmenter that hands back spans supplied up front.
///
/// For hosts that segment externally and for deterministic tests. The spans
/// still pass through the stage's validation like any collaborator output.
#[derive(Debug, Clone)]
pub struct PresetSegmenter {
    segmentation: Segmentation,
}

impl PresetSegmenter {
    pub fn new(segmentation: Segmentation) -> Self {
        Self { segmentation }
    }
}

impl Segmenter for PresetSegmenter {
    fn segment(&self, _text: &str) -> Result<Segmentation, SegmentationError> {
        Ok(self.segmentation.clone())
    }
}

/// Stage that runs the segmenter collaborator and indexes its output.
pub struct SegmentationStage {
    segmenter: Box<dyn Segmenter>,
}

impl SegmentationStage {
    pub fn new(segmenter: impl Segmenter + 'static) -> Self {
        Self {
            segmenter: Box::new(segmenter),
        }
    }
}

fn validate(text: &str, segmentation: &Segmentation) -> Result<(), SegmentationError> {
    let text_len = text.len();
    for &span in segmentation.sentences.iter().chain(&segmentation.tokens) {
        if !span.in_bounds(text_len) {
            return Err(SegmentationError::SpanOutOfBounds { span, text_len });
        }
    }
    for &token in &segmentation.tokens {
        if token.is_empty() {
            return Err(SegmentationError::EmptyToken { span: token });
        }
        if !segmentation
            .sentences
            .iter()
            .any(|sentence| sentence.covers(token))
        {
            return Err(SegmentationError::TokenOutsideSentence { span: token });
        }
    }
    Ok(())
}

impl Stage for SegmentationStage {
    fn name(&self) -> &'static str {
        "segmentation"
    }

    fn expects(&self) -> Phase {
        Phase::Empty
    }

    fn produces(&self) -> Phase {
        Phase::Segmented
    }

    fn apply(&self, doc: &mut Document) -> Result<(), PipelineError> {
        let segmentation = self.segmenter.segment(doc.text())?;
        validate(doc.text(), &segmentation)?;
        for &span in &segmentation.sentences {
            doc.store_mut().insert(span, Sentence);
        }
        for &span in &segmentation.tokens {
            doc.store_mut().insert(span, Token);
        }
        Ok(())
    }
}
