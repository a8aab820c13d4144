/*
 * evaluator.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Template evaluation engine.
//!
//! Fragments are walked left to right by index. Open blocks live on an
//! explicit stack of [`Frame`]s rather than on the call stack, so nesting
//! depth is limited only by memory. A pairing pass computes the matching
//! `End` of every opener up front; false conditionals and empty loops jump
//! straight past their block, and each loop pass jumps back to the start of
//! its body.

use crate::ast::{Fragment, Span};
use crate::context::Context;
use crate::error::{TemplateError, TemplateResult};
use crate::parser::Template;

/// Text rendered for a variable that cannot be resolved.
pub const UNDEFINED: &str = "undefined";

impl Template {
    /// Render this template with the given context.
    ///
    /// # Arguments
    /// * `context` - The value variables are resolved against
    ///
    /// # Returns
    /// The rendered output string.
    pub fn render(&self, context: &Context) -> TemplateResult<String> {
        render(&self.fragments, context)
    }
}

/// Matching `End` positions for the block openers of a fragment sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockPairs {
    /// For each fragment index, the index of the `End` closing it (openers only).
    ends: Vec<Option<usize>>,
    /// An `End` that closes no block opened in the sequence, with its span.
    terminator: Option<(usize, Span)>,
}

impl BlockPairs {
    /// Index of the `End` matching the opener at `index`.
    pub fn end_of(&self, index: usize) -> Option<usize> {
        self.ends.get(index).copied().flatten()
    }

    /// Index of the first `End` that closes no block, if any.
    pub fn terminator(&self) -> Option<usize> {
        self.terminator.map(|(index, _)| index)
    }

    /// Fail if the sequence contains an `End` with no open block.
    pub fn ensure_closed(&self) -> TemplateResult<()> {
        match self.terminator {
            Some((_, span)) => Err(TemplateError::UnmatchedEnd { span }),
            None => Ok(()),
        }
    }
}

/// Pair every block opener with its matching `End`.
///
/// Scanning stops at the first `End` with no open block: it terminates the
/// sequence as a block, and what follows belongs to the caller. An opener
/// left open at that point is an [`TemplateError::UnclosedBlock`].
pub fn pair_blocks(fragments: &[Fragment]) -> TemplateResult<BlockPairs> {
    let mut ends = vec![None; fragments.len()];
    let mut open: Vec<usize> = Vec::new();
    let mut terminator = None;

    for (index, fragment) in fragments.iter().enumerate() {
        if fragment.opens_block() {
            open.push(index);
        } else if fragment.is_end() {
            match open.pop() {
                Some(opener) => ends[opener] = Some(index),
                None => {
                    terminator = Some((index, fragment.span()));
                    break;
                }
            }
        }
    }

    match open.pop() {
        Some(opener) => Err(unclosed(&fragments[opener])),
        None => Ok(BlockPairs { ends, terminator }),
    }
}

/// Evaluate fragments as a block.
///
/// Returns the rendered text and the fragments remaining after the `End`
/// that closes the block. When the sequence has no such `End`, the whole
/// sequence is consumed and the remainder is empty.
pub fn evaluate_block<'f>(
    fragments: &'f [Fragment],
    context: &Context,
) -> TemplateResult<(String, &'f [Fragment])> {
    let pairs = pair_blocks(fragments)?;
    let (limit, rest) = match pairs.terminator() {
        Some(index) => (index, &fragments[index + 1..]),
        None => (fragments.len(), &fragments[fragments.len()..]),
    };
    let text = walk(&fragments[..limit], &pairs, context)?;
    Ok((text, rest))
}

/// Render a complete fragment sequence.
///
/// Unlike [`evaluate_block`], a stray `End` at the top level is an error.
pub fn render(fragments: &[Fragment], context: &Context) -> TemplateResult<String> {
    let pairs = pair_blocks(fragments)?;
    pairs.ensure_closed()?;
    walk(fragments, &pairs, context)
}

/// An open block during evaluation.
enum Frame<'c> {
    Conditional,
    Loop {
        /// Index of the first fragment of the loop body.
        body: usize,
        /// Items not yet visited.
        items: std::slice::Iter<'c, Context>,
        /// Context to restore when the loop finishes.
        outer: &'c Context,
    },
}

fn walk<'c>(
    fragments: &[Fragment],
    pairs: &BlockPairs,
    root: &'c Context,
) -> TemplateResult<String> {
    let mut out = String::new();
    let mut stack: Vec<Frame<'c>> = Vec::new();
    let mut scope = root;
    let mut i = 0;

    while i < fragments.len() {
        match &fragments[i] {
            Fragment::Raw { text, .. } => out.push_str(text),

            Fragment::Variable { name, .. } => render_variable(name, scope, &mut out),

            fragment @ Fragment::Conditional { name, .. } => {
                let end = pairs.end_of(i).ok_or_else(|| unclosed(fragment))?;
                if scope.get(name).is_some_and(Context::is_truthy) {
                    stack.push(Frame::Conditional);
                } else {
                    i = end;
                }
            }

            fragment @ Fragment::Loop { name, .. } => {
                let end = pairs.end_of(i).ok_or_else(|| unclosed(fragment))?;
                let mut items = scope
                    .get(name)
                    .and_then(Context::as_list)
                    .unwrap_or_default()
                    .iter();
                match items.next() {
                    Some(first) => {
                        stack.push(Frame::Loop {
                            body: i + 1,
                            items,
                            outer: scope,
                        });
                        scope = first;
                    }
                    None => i = end,
                }
            }

            Fragment::End { .. } => {
                if let Some(Frame::Loop { body, items, .. }) = stack.last_mut() {
                    if let Some(item) = items.next() {
                        scope = item;
                        i = *body;
                        continue;
                    }
                }
                if let Some(Frame::Loop { outer, .. }) = stack.pop() {
                    scope = outer;
                }
            }
        }
        i += 1;
    }

    Ok(out)
}

/// Render a variable reference.
fn render_variable(name: &str, scope: &Context, out: &mut String) {
    match scope.get(name) {
        Some(Context::String(s)) => out.push_str(s),
        Some(Context::List(_)) => {
            out.push_str(name);
            out.push_str(" is a list");
        }
        Some(Context::Map(_)) => {
            out.push_str(name);
            out.push_str(" is a map");
        }
        None => out.push_str(UNDEFINED),
    }
}

fn unclosed(opener: &Fragment) -> TemplateError {
    let name = match opener {
        Fragment::Conditional { name, .. } | Fragment::Loop { name, .. } => name.clone(),
        _ => String::new(),
    };
    TemplateError::UnclosedBlock {
        construct: opener.construct(),
        name,
        span: opener.span(),
    }
}
