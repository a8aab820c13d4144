/*
 * token.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Template tokenizer.
//!
//! Splits template source into alternating literal and directive tokens in a
//! single left-to-right pass. `{{` opens a directive and `}}` closes it; there
//! is no escape syntax, so the first delimiter seen always switches state.
//! `}}` outside a directive and `{{` inside one are ordinary text.
//!
//! The output always starts with a literal (possibly empty) and alternates
//! from there, so `{{a}}` yields `["", a, ""]`.

use crate::ast::Span;
use crate::error::{TemplateError, TemplateResult};

const OPEN: &[u8] = b"{{";
const CLOSE: &[u8] = b"}}";

/// A raw template token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Text outside any directive.
    Literal { text: String, span: Span },

    /// The content between `{{` and `}}`. The span covers the delimiters.
    Directive { content: String, span: Span },
}

impl Token {
    pub fn span(&self) -> Span {
        match self {
            Token::Literal { span, .. } | Token::Directive { span, .. } => *span,
        }
    }
}

/// Tokenize template source.
///
/// An unterminated directive at the end of input is not an error here: its
/// partial content becomes the final `Directive` token. Use
/// [`tokenize_strict`] to reject it instead.
pub fn tokenize(input: &str) -> Vec<Token> {
    scan(input).tokens
}

/// Tokenize template source, rejecting a `{{` that is never closed.
pub fn tokenize_strict(input: &str) -> TemplateResult<Vec<Token>> {
    let scanned = scan(input);
    match scanned.unterminated {
        Some(open) => Err(TemplateError::UnterminatedDirective {
            span: Span::new(open, open + OPEN.len()),
        }),
        None => Ok(scanned.tokens),
    }
}

enum State {
    Literal { start: usize },
    Directive { open: usize },
}

struct Scanned {
    tokens: Vec<Token>,
    /// Offset of the `{{` of a directive still open at end of input.
    unterminated: Option<usize>,
}

fn scan(input: &str) -> Scanned {
    let bytes = input.as_bytes();
    let mut tokens = Vec::new();
    let mut state = State::Literal { start: 0 };
    let mut i = 0;

    // Delimiters are ASCII, so every index we slice at is a char boundary.
    while i < bytes.len() {
        match state {
            State::Literal { start } if bytes[i..].starts_with(OPEN) => {
                tokens.push(Token::Literal {
                    text: input[start..i].to_string(),
                    span: Span::new(start, i),
                });
                state = State::Directive { open: i };
                i += OPEN.len();
            }
            State::Directive { open } if bytes[i..].starts_with(CLOSE) => {
                let end = i + CLOSE.len();
                tokens.push(Token::Directive {
                    content: input[open + OPEN.len()..i].to_string(),
                    span: Span::new(open, end),
                });
                state = State::Literal { start: end };
                i = end;
            }
            _ => i += 1,
        }
    }

    let unterminated = match state {
        State::Literal { start } => {
            tokens.push(Token::Literal {
                text: input[start..].to_string(),
                span: Span::new(start, input.len()),
            });
            None
        }
        State::Directive { open } => {
            tokens.push(Token::Directive {
                content: input[open + OPEN.len()..].to_string(),
                span: Span::new(open, input.len()),
            });
            Some(open)
        }
    };

    Scanned {
        tokens,
        unterminated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lit(text: &str, start: usize, end: usize) -> Token {
        Token::Literal {
            text: text.to_string(),
            span: Span::new(start, end),
        }
    }

    fn dir(content: &str, start: usize, end: usize) -> Token {
        Token::Directive {
            content: content.to_string(),
            span: Span::new(start, end),
        }
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(tokenize("Hello, world!"), vec![lit("Hello, world!", 0, 13)]);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(tokenize(""), vec![lit("", 0, 0)]);
    }

    #[test]
    fn test_single_directive() {
        assert_eq!(
            tokenize("Hello {{name}}!"),
            vec![lit("Hello ", 0, 6), dir("name", 6, 14), lit("!", 14, 15)]
        );
    }

    #[test]
    fn test_adjacent_directives_alternate_with_empty_literals() {
        assert_eq!(
            tokenize("{{a}}{{b}}"),
            vec![
                lit("", 0, 0),
                dir("a", 0, 5),
                lit("", 5, 5),
                dir("b", 5, 10),
                lit("", 10, 10),
            ]
        );
    }

    #[test]
    fn test_close_delimiter_in_literal_is_text() {
        assert_eq!(tokenize("a }} b"), vec![lit("a }} b", 0, 6)]);
    }

    #[test]
    fn test_open_delimiter_inside_directive_is_content() {
        assert_eq!(
            tokenize("{{a{{b}}c"),
            vec![lit("", 0, 0), dir("a{{b", 0, 8), lit("c", 8, 9)]
        );
    }

    #[test]
    fn test_directive_content_keeps_spaces() {
        assert_eq!(
            tokenize("{{ foreach posts }}"),
            vec![
                lit("", 0, 0),
                dir(" foreach posts ", 0, 19),
                lit("", 19, 19)
            ]
        );
    }

    #[test]
    fn test_unterminated_directive_degrades() {
        assert_eq!(
            tokenize("Hi {{name"),
            vec![lit("Hi ", 0, 3), dir("name", 3, 9)]
        );
    }

    #[test]
    fn test_unterminated_directive_strict() {
        let err = tokenize_strict("Hi {{name").unwrap_err();
        match err {
            TemplateError::UnterminatedDirective { span } => assert_eq!(span, Span::new(3, 5)),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_strict_accepts_balanced_input() {
        assert_eq!(tokenize_strict("{{a}} b").unwrap(), tokenize("{{a}} b"));
    }

    #[test]
    fn test_multibyte_text() {
        assert_eq!(
            tokenize("café {{x}} ünï"),
            vec![lit("café ", 0, 6), dir("x", 6, 11), lit(" ünï", 11, 17)]
        );
    }
}
