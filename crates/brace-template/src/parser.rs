/*
 * parser.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Fragment parser.
//!
//! Classifies each token into a [`Fragment`]. Classification is purely
//! syntactic: it never looks at a context, so a compiled [`Template`] can be
//! rendered against any number of contexts.

use crate::ast::Fragment;
use crate::error::{TemplateError, TemplateResult};
use crate::evaluator::pair_blocks;
use crate::token::{Token, tokenize, tokenize_strict};
use std::path::Path;

const DEFAULT_NAME: &str = "<template>";

/// A compiled template ready for evaluation.
#[derive(Debug, Clone)]
pub struct Template {
    /// The fragment sequence.
    pub(crate) fragments: Vec<Fragment>,

    /// Display name used in diagnostics.
    pub(crate) name: String,

    /// Original source (for error reporting).
    pub(crate) source: String,
}

impl Template {
    /// Compile a template from source text.
    ///
    /// Fails if a directive is malformed or if blocks are unbalanced, so a
    /// compiled template always renders.
    pub fn compile(source: &str) -> TemplateResult<Self> {
        Self::compile_with_name(source, DEFAULT_NAME)
    }

    /// Compile a template from source text with a name for error reporting.
    pub fn compile_with_name(source: &str, name: &str) -> TemplateResult<Self> {
        Self::from_tokens(tokenize(source), source, name)
    }

    /// Compile a template, rejecting a `{{` that is never closed.
    pub fn compile_strict(source: &str) -> TemplateResult<Self> {
        Self::from_tokens(tokenize_strict(source)?, source, DEFAULT_NAME)
    }

    /// Read and compile a template file. The path becomes the template name.
    pub fn from_file(path: &Path) -> TemplateResult<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::compile_with_name(&source, &path.to_string_lossy())
    }

    fn from_tokens(tokens: Vec<Token>, source: &str, name: &str) -> TemplateResult<Self> {
        let fragments = parse(&tokens)?;
        pair_blocks(&fragments)?.ensure_closed()?;
        Ok(Template {
            fragments,
            name: name.to_string(),
            source: source.to_string(),
        })
    }

    /// Get the fragments of this template.
    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

/// Classify a token sequence into fragments.
pub fn parse(tokens: &[Token]) -> TemplateResult<Vec<Fragment>> {
    tokens.iter().map(parse_token).collect()
}

fn parse_token(token: &Token) -> TemplateResult<Fragment> {
    match token {
        Token::Literal { text, span } => Ok(Fragment::Raw {
            text: text.clone(),
            span: *span,
        }),
        Token::Directive { content, span } => {
            let span = *span;
            let (word, rest) = match content.split_once(' ') {
                Some((word, rest)) => (word, Some(rest)),
                None => (content.as_str(), None),
            };

            let keyword = match word {
                "foreach" => "foreach",
                "if" => "if",
                _ if content.trim() == "end" => return Ok(Fragment::End { span }),
                _ => {
                    return Ok(Fragment::Variable {
                        name: content.clone(),
                        span,
                    });
                }
            };

            let name = match rest {
                Some(rest) if !rest.is_empty() => rest.to_string(),
                _ => {
                    return Err(TemplateError::MissingArgument {
                        keyword,
                        directive: content.clone(),
                        span,
                    });
                }
            };

            Ok(match keyword {
                "foreach" => Fragment::Loop { name, span },
                _ => Fragment::Conditional { name, span },
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Span;
    use pretty_assertions::assert_eq;

    fn parse_source(source: &str) -> TemplateResult<Vec<Fragment>> {
        parse(&tokenize(source))
    }

    #[test]
    fn test_literal_becomes_raw() {
        assert_eq!(
            parse_source("plain").unwrap(),
            vec![Fragment::Raw {
                text: "plain".to_string(),
                span: Span::new(0, 5)
            }]
        );
    }

    #[test]
    fn test_classify_directives() {
        let fragments = parse_source("{{foreach posts}}{{if draft}}{{title}}{{end}}{{end}}").unwrap();
        let directives: Vec<_> = fragments
            .into_iter()
            .filter(|f| !matches!(f, Fragment::Raw { .. }))
            .collect();

        assert_eq!(
            directives,
            vec![
                Fragment::Loop {
                    name: "posts".to_string(),
                    span: Span::new(0, 17)
                },
                Fragment::Conditional {
                    name: "draft".to_string(),
                    span: Span::new(17, 29)
                },
                Fragment::Variable {
                    name: "title".to_string(),
                    span: Span::new(29, 38)
                },
                Fragment::End {
                    span: Span::new(38, 45)
                },
                Fragment::End {
                    span: Span::new(45, 52)
                },
            ]
        );
    }

    #[test]
    fn test_end_is_trimmed() {
        let fragments = parse_source("{{ end }}").unwrap();
        assert!(fragments[1].is_end());
    }

    #[test]
    fn test_variable_name_is_unsplit() {
        let fragments = parse_source("{{short date}}").unwrap();
        assert_eq!(
            fragments[1],
            Fragment::Variable {
                name: "short date".to_string(),
                span: Span::new(0, 14)
            }
        );
    }

    #[test]
    fn test_only_one_separator_is_stripped() {
        let fragments = parse_source("{{if  x}}").unwrap();
        assert_eq!(
            fragments[1],
            Fragment::Conditional {
                name: " x".to_string(),
                span: Span::new(0, 9)
            }
        );
    }

    #[test]
    fn test_keyword_prefix_is_a_variable() {
        // Only the exact first word counts as a keyword.
        let fragments = parse_source("{{iffy}}{{foreachx y}}").unwrap();
        assert!(matches!(&fragments[1], Fragment::Variable { name, .. } if name == "iffy"));
        assert!(matches!(&fragments[3], Fragment::Variable { name, .. } if name == "foreachx y"));
    }

    #[test]
    fn test_foreach_without_argument() {
        let err = parse_source("a {{foreach}} b").unwrap_err();
        match err {
            TemplateError::MissingArgument {
                keyword,
                directive,
                span,
            } => {
                assert_eq!(keyword, "foreach");
                assert_eq!(directive, "foreach");
                assert_eq!(span, Span::new(2, 13));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_if_with_trailing_space_only() {
        let err = parse_source("{{if }}").unwrap_err();
        assert!(matches!(
            err,
            TemplateError::MissingArgument { keyword: "if", .. }
        ));
    }

    #[test]
    fn test_compile_rejects_unbalanced_blocks() {
        assert!(matches!(
            Template::compile("{{if a}}x"),
            Err(TemplateError::UnclosedBlock { construct: "if", .. })
        ));
        assert!(matches!(
            Template::compile("x{{end}}"),
            Err(TemplateError::UnmatchedEnd { .. })
        ));
    }

    #[test]
    fn test_compile_strict() {
        assert!(Template::compile("a {{b").is_ok());
        assert!(matches!(
            Template::compile_strict("a {{b"),
            Err(TemplateError::UnterminatedDirective { .. })
        ));
    }

    #[test]
    fn test_compile_with_name() {
        let template = Template::compile_with_name("x", "post.html").unwrap();
        assert_eq!(template.name(), "post.html");
        assert_eq!(template.source(), "x");
        assert_eq!(Template::compile("x").unwrap().name(), "<template>");
    }
}
