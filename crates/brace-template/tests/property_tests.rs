/*
 * property_tests.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Property-based tests for the tokenizer and evaluator.
 */

use brace_template::{Context, Template, Token, tokenize};
use proptest::prelude::*;

/// Text that never forms a `{{` or `}}` delimiter.
fn gen_plain_text() -> impl Strategy<Value = String> {
    "[a-z{} <>/=\"\n]{0,40}".prop_filter("no delimiters", |s| {
        !s.contains("{{") && !s.contains("}}")
    })
}

/// A flat map of short string bindings.
fn gen_context() -> impl Strategy<Value = Context> {
    prop::collection::vec(("[a-c]", "[a-z]{0,3}"), 0..4)
        .prop_map(|pairs| pairs.into_iter().collect::<Context>())
}

/// A balanced template over names `a`-`c` with nested blocks.
fn gen_template() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![
        "[a-z ]{0,5}".prop_map(|s| s),
        "[a-c]".prop_map(|name| format!("{{{{{name}}}}}")),
    ];
    leaf.prop_recursive(4, 32, 4, |inner| {
        (
            prop_oneof![Just("if"), Just("foreach")],
            "[a-c]",
            prop::collection::vec(inner, 0..4),
        )
            .prop_map(|(keyword, name, body)| {
                format!("{{{{{keyword} {name}}}}}{}{{{{end}}}}", body.concat())
            })
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Text without delimiters tokenizes to a single literal
    #[test]
    fn test_plain_text_is_one_literal(text in gen_plain_text()) {
        let tokens = tokenize(&text);
        prop_assert_eq!(tokens.len(), 1);
        match &tokens[0] {
            Token::Literal { text: literal, .. } => prop_assert_eq!(literal, &text),
            other => prop_assert!(false, "expected literal, got {:?}", other),
        }
    }

    /// A template without directives renders as its own source
    #[test]
    fn test_plain_text_roundtrip(text in gen_plain_text(), ctx in gen_context()) {
        let template = Template::compile(&text).unwrap();
        prop_assert_eq!(template.render(&ctx).unwrap(), text);
    }

    /// Tokens alternate literal/directive, starting and ending with a literal
    #[test]
    fn test_tokens_alternate(source in gen_template()) {
        let tokens = tokenize(&source);
        prop_assert_eq!(tokens.len() % 2, 1);
        for (i, token) in tokens.iter().enumerate() {
            let is_literal = matches!(token, Token::Literal { .. });
            prop_assert_eq!(is_literal, i % 2 == 0);
        }
    }

    /// Token spans tile the source exactly
    #[test]
    fn test_token_spans_cover_source(source in gen_template()) {
        let tokens = tokenize(&source);
        let mut offset = 0;
        for token in &tokens {
            let span = token.span();
            prop_assert_eq!(span.start, offset);
            offset = span.end;
        }
        prop_assert_eq!(offset, source.len());
    }

    /// Balanced templates always compile, and rendering is idempotent
    #[test]
    fn test_render_idempotent(source in gen_template(), ctx in gen_context()) {
        let template = Template::compile(&source).unwrap();
        let first = template.render(&ctx).unwrap();
        let second = template.render(&ctx).unwrap();
        prop_assert_eq!(first, second);
    }
}
