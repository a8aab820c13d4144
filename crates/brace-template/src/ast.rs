/*
 * ast.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Fragment types.
//!
//! A compiled template is a flat sequence of [`Fragment`]s. There is no tree:
//! blocks are delimited by a `Conditional`/`Loop` fragment and its matching
//! `End`, and nesting is recovered during evaluation.
//! Each fragment includes the byte span of the text it came from.

use std::fmt;
use std::ops::Range;

/// A half-open byte range into the template source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Number of bytes covered by this span.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Slice the given source text with this span.
    pub fn slice<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }
}

impl From<Span> for Range<usize> {
    fn from(span: Span) -> Self {
        span.start..span.end
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// A classified template instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    /// Literal text to be output as-is.
    Raw { text: String, span: Span },

    /// Variable interpolation: `{{name}}`
    Variable { name: String, span: Span },

    /// Opens a conditional block: `{{if name}}`
    Conditional { name: String, span: Span },

    /// Opens a loop block: `{{foreach name}}`
    Loop { name: String, span: Span },

    /// Closes the innermost open block: `{{end}}`
    End { span: Span },
}

impl Fragment {
    /// Source span of this fragment.
    pub fn span(&self) -> Span {
        match self {
            Fragment::Raw { span, .. }
            | Fragment::Variable { span, .. }
            | Fragment::Conditional { span, .. }
            | Fragment::Loop { span, .. }
            | Fragment::End { span } => *span,
        }
    }

    /// Whether this fragment opens a block that needs a matching `End`.
    pub fn opens_block(&self) -> bool {
        matches!(self, Fragment::Conditional { .. } | Fragment::Loop { .. })
    }

    pub fn is_end(&self) -> bool {
        matches!(self, Fragment::End { .. })
    }

    /// Directive keyword for block openers, used in error messages.
    pub(crate) fn construct(&self) -> &'static str {
        match self {
            Fragment::Conditional { .. } => "if",
            Fragment::Loop { .. } => "foreach",
            Fragment::End { .. } => "end",
            Fragment::Variable { .. } => "variable",
            Fragment::Raw { .. } => "text",
        }
    }
}
