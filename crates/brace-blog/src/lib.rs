/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Static blog generator built on `brace-template`.
//!
//! Posts are Markdown files with `---` front matter. Each post is turned into
//! a template [`Context`](brace_template::Context) and rendered through
//! `post.html`; the list of all posts is rendered through `index.html`.

pub mod config;
pub mod front_matter;
pub mod markdown;
pub mod post;
pub mod render;
pub mod site;

pub use config::BlogConfig;
pub use post::Post;
pub use render::{RenderOptions, render_template_file};
pub use site::{BuildSummary, build_site};
