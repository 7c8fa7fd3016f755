//! Snapshot-friendly rendering of a document's annotations.
//!
//! Renders the text on the first line, then one underline per included
//! annotation:
//!
//! ```text
//! every good test passes
//!            ╰──╯ Unit(score: 1.00)
//! ╰────────────────────╯ Aggregate(score: 1.00)
//! ```
//!
//! Intended for single-line texts in snapshot tests and debugging; newlines
//! in the text would break the column math.

use std::fmt::{self, Write};

use unicode_width::UnicodeWidthStr;

use crate::annotation::AnnotationKind;
use crate::document::Document;
use crate::span::Span;

/// Renders the document text with span underlines for selected kinds.
pub struct StoreDisplay<'a> {
    doc: &'a Document,
    included: Vec<(Span, String)>,
}

impl<'a> StoreDisplay<'a> {
    pub fn new(doc: &'a Document) -> Self {
        Self {
            doc,
            included: Vec::new(),
        }
    }

    /// Include every annotation of kind `T`, in insertion order.
    pub fn include<T: AnnotationKind>(&mut self) {
        for (span, value) in self.doc.store().select_all::<T>() {
            self.included.push((span, format!("{:?}", value)));
        }
    }

    /// Builder form of [`include`](Self::include).
    pub fn with<T: AnnotationKind>(mut self) -> Self {
        self.include::<T>();
        self
    }
}

impl fmt::Display for StoreDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.doc.text();
        f.write_str(text)?;

        for (span, label) in &self.included {
            f.write_char('\n')?;

            let start = UnicodeWidthStr::width(text.get(..span.begin).unwrap_or(""));
            let end = UnicodeWidthStr::width(text.get(..span.end).unwrap_or(""));
            for _ in 0..start {
                f.write_char(' ')?;
            }
            f.write_char('╰')?;
            for _ in (start + 1)..end.saturating_sub(1) {
                f.write_char('─')?;
            }
            if end > start + 1 {
                f.write_char('╯')?;
            }
            write!(f, " {}", label)?;
        }
        Ok(())
    }
}
