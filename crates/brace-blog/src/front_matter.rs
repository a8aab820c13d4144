/*
 * front_matter.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Front matter extraction.
//!
//! A document may start with a block of `key: value` lines fenced by `---`
//! lines. The first `": "` on a line separates the key from the value, so
//! values may themselves contain `": "`.

use indexmap::IndexMap;
use thiserror::Error;

const FENCE: &str = "---";

/// Ordered front matter fields.
pub type FrontMatter = IndexMap<String, String>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrontMatterError {
    #[error("line {line}: expected 'key: value', found '{text}'")]
    MalformedLine { line: usize, text: String },

    #[error("front matter is never closed with '---'")]
    Unterminated,
}

/// Split a document into its front matter fields and body.
///
/// A document that does not open with a `---` line has no front matter; the
/// whole text is the body. Later duplicates of a key replace earlier ones.
pub fn split_front_matter(text: &str) -> Result<(FrontMatter, &str), FrontMatterError> {
    let mut lines = text.split_inclusive('\n');
    match lines.next() {
        Some(first) if strip_eol(first) == FENCE => {}
        _ => return Ok((FrontMatter::new(), text)),
    }

    let mut fields = FrontMatter::new();
    let mut offset = text.find('\n').map_or(text.len(), |i| i + 1);

    for (index, raw) in lines.enumerate() {
        offset += raw.len();
        let line = strip_eol(raw);

        if line == FENCE {
            return Ok((fields, &text[offset..]));
        }
        if line.trim().is_empty() {
            continue;
        }

        match line.split_once(": ") {
            Some((key, value)) => {
                fields.insert(key.to_string(), value.to_string());
            }
            None => {
                return Err(FrontMatterError::MalformedLine {
                    // +2: one for the opening fence, one for 1-based numbering
                    line: index + 2,
                    text: line.to_string(),
                });
            }
        }
    }

    Err(FrontMatterError::Unterminated)
}

fn strip_eol(line: &str) -> &str {
    line.trim_end_matches('\n').trim_end_matches('\r')
}
