/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Error types for template parsing and evaluation.

use crate::ast::Span;
use thiserror::Error;

/// Errors that can occur during template operations.
///
/// Unresolved variables and conditions are never errors: they render as
/// `"undefined"` and false respectively.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// `{{foreach}}` or `{{if}}` without the name it operates on.
    #[error("'{keyword}' directive requires an argument: {{{{{directive}}}}}")]
    MissingArgument {
        keyword: &'static str,
        directive: String,
        span: Span,
    },

    /// A block opener that is never closed by `{{end}}`.
    #[error("'{construct} {name}' block is never closed with {{{{end}}}}")]
    UnclosedBlock {
        construct: &'static str,
        name: String,
        span: Span,
    },

    /// An `{{end}}` with no open block.
    #[error("{{{{end}}}} without a matching 'if' or 'foreach'")]
    UnmatchedEnd { span: Span },

    /// `{{` with no closing `}}` (strict mode only).
    #[error("directive is never terminated with '}}}}'")]
    UnterminatedDirective { span: Span },

    /// I/O error (e.g., reading a template file).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TemplateError {
    /// Source span the error refers to, if any.
    pub fn span(&self) -> Option<Span> {
        match self {
            TemplateError::MissingArgument { span, .. }
            | TemplateError::UnclosedBlock { span, .. }
            | TemplateError::UnmatchedEnd { span }
            | TemplateError::UnterminatedDirective { span } => Some(*span),
            TemplateError::Io(_) => None,
        }
    }
}

/// Result type for template operations.
pub type TemplateResult<T> = Result<T, TemplateError>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_messages() {
        let err = TemplateError::MissingArgument {
            keyword: "foreach",
            directive: "foreach".to_string(),
            span: Span::new(0, 11),
        };
        assert_eq!(
            err.to_string(),
            "'foreach' directive requires an argument: {{foreach}}"
        );

        let err = TemplateError::UnclosedBlock {
            construct: "if",
            name: "draft".to_string(),
            span: Span::new(0, 10),
        };
        assert_eq!(
            err.to_string(),
            "'if draft' block is never closed with {{end}}"
        );

        let err = TemplateError::UnmatchedEnd {
            span: Span::new(1, 8),
        };
        assert_eq!(
            err.to_string(),
            "{{end}} without a matching 'if' or 'foreach'"
        );
        assert_eq!(err.span(), Some(Span::new(1, 8)));
    }

    #[test]
    fn test_io_has_no_span() {
        let err = TemplateError::from(std::io::Error::other("boom"));
        assert!(err.span().is_none());
    }
}
