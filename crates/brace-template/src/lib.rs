/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Brace-delimited text template engine.
//!
//! Templates mix literal text with `{{ }}` directives:
//!
//! - Variable interpolation: `{{name}}`
//! - Conditionals: `{{if name}}...{{end}}`
//! - Loops: `{{foreach name}}...{{end}}`
//!
//! They are rendered against a [`Context`], a tree of strings, ordered lists
//! and ordered maps. There are no nested paths, operators, helpers or
//! partials, and no escape syntax for a literal `{{`.
//!
//! # Architecture
//!
//! Rendering is a one-way pipeline over flat sequences:
//!
//! 1. [`token::tokenize`] splits source into alternating literal and
//!    directive [`Token`]s.
//! 2. [`parser::parse`] classifies each token into a [`Fragment`].
//! 3. [`evaluator::render`] walks the fragments against a context.
//!
//! No tree is built. Blocks are recovered from matching `End` fragments
//! during evaluation, using an explicit stack.
//!
//! # Example
//!
//! ```
//! use brace_template::{Context, Template};
//!
//! let template = Template::compile("Hello, {{name}}!").unwrap();
//! let ctx = Context::map().with("name", "World");
//! assert_eq!(template.render(&ctx).unwrap(), "Hello, World!");
//! ```

pub mod ast;
pub mod context;
pub mod diagnostic;
pub mod error;
pub mod evaluator;
pub mod parser;
pub mod token;

// Re-export main types at crate root
pub use ast::{Fragment, Span};
pub use context::{Context, ContextMap};
pub use diagnostic::render_report;
pub use error::{TemplateError, TemplateResult};
pub use evaluator::{BlockPairs, UNDEFINED, evaluate_block, pair_blocks, render};
pub use parser::{Template, parse};
pub use token::{Token, tokenize, tokenize_strict};
