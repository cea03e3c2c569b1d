//! Staged byte-range edits over one source buffer.
//!
//! Edits are collected first and applied in a single pass from the
//! highest offset to the lowest, so earlier edits never shift the
//! offsets of later ones. Overlapping edits are rejected at apply
//! time; a failed apply leaves the caller's buffer untouched.

use std::ops::Range;

use log::trace;
use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

#[derive(Debug, Clone, Error, Diagnostic, PartialEq, Eq)]
pub enum RewriteError {
    #[error("edit range {start}..{end} is outside the buffer (len {len})")]
    #[diagnostic(code(crease_rewrite::out_of_bounds))]
    OutOfBounds { start: usize, end: usize, len: usize },

    #[error("edit ranges overlap")]
    #[diagnostic(code(crease_rewrite::overlap))]
    Overlap {
        #[label("this edit")]
        first: SourceSpan,
        #[label("overlaps this one")]
        second: SourceSpan,
    },
}

pub type RewriteResult<T> = Result<T, RewriteError>;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Edit {
    start: usize,
    end: usize,
    text: String,
}

/// An ordered set of non-overlapping byte-range replacements.
///
/// A zero-width edit at offset `p` is an insertion; it may share `p`
/// with the start of a replacement, in which case the inserted text
/// ends up before the replacement text in the output.
#[derive(Debug, Clone, Default)]
pub struct EditSet {
    edits: Vec<Edit>,
}

impl EditSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stages an insertion of `text` at `offset`.
    pub fn insert_before(&mut self, offset: usize, text: impl Into<String>) {
        self.edits.push(Edit {
            start: offset,
            end: offset,
            text: text.into(),
        });
    }

    /// Stages a replacement of `range` with `text`.
    pub fn replace(&mut self, range: Range<usize>, text: impl Into<String>) {
        self.edits.push(Edit {
            start: range.start,
            end: range.end,
            text: text.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    /// Applies the staged edits to `source`, producing a new buffer.
    pub fn apply(&self, source: &str) -> RewriteResult<String> {
        let mut ordered: Vec<&Edit> = self.edits.iter().collect();
        ordered.sort_by_key(|e| (e.start, e.end));

        for edit in &ordered {
            if edit.start > edit.end || edit.end > source.len() {
                return Err(RewriteError::OutOfBounds {
                    start: edit.start,
                    end: edit.end,
                    len: source.len(),
                });
            }
        }
        for pair in ordered.windows(2) {
            if pair[1].start < pair[0].end {
                return Err(RewriteError::Overlap {
                    first: SourceSpan::new(pair[0].start.into(), pair[0].end - pair[0].start),
                    second: SourceSpan::new(pair[1].start.into(), pair[1].end - pair[1].start),
                });
            }
        }

        let mut out = source.to_string();
        for edit in ordered.iter().rev() {
            trace!("applying edit {}..{} (+{} bytes)", edit.start, edit.end, edit.text.len());
            out.replace_range(edit.start..edit.end, &edit.text);
        }
        Ok(out)
    }
}
