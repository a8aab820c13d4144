/*
 * markdown.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Document body rendering.
//!
//! This module provides a trait for converting a post body to HTML, and a
//! comrak-backed implementation with inline math and highlighted code.

use anyhow::Result;
use comrak::Options;
use comrak::options::Plugins;
use comrak::plugins::syntect::SyntectAdapter;
use thiserror::Error;

/// Emitted in place of a body the renderer could not handle.
pub const RENDER_FALLBACK: &str = "<p>This document could not be rendered.</p>\n";

/// Themes bundled with syntect's default theme set.
const BUNDLED_THEMES: &[&str] = &[
    "base16-ocean.dark",
    "base16-eighties.dark",
    "base16-mocha.dark",
    "base16-ocean.light",
    "InspiredGitHub",
    "Solarized (dark)",
    "Solarized (light)",
];

#[derive(Debug, Error)]
pub enum MarkdownError {
    #[error("unknown highlight theme '{name}' (available: {available})")]
    UnknownTheme { name: String, available: String },
}

/// Converts a document body to markup.
pub trait DocumentRenderer: Sync {
    fn render(&self, body: &str) -> Result<String>;
}

/// Markdown renderer backed by comrak.
pub struct ComrakRenderer {
    highlighter: SyntectAdapter,
}

impl ComrakRenderer {
    /// Create a renderer that highlights fenced code with the given theme.
    pub fn new(theme: &str) -> Result<Self, MarkdownError> {
        if !BUNDLED_THEMES.contains(&theme) {
            return Err(MarkdownError::UnknownTheme {
                name: theme.to_string(),
                available: BUNDLED_THEMES.join(", "),
            });
        }
        Ok(Self {
            highlighter: SyntectAdapter::new(Some(theme)),
        })
    }
}

impl DocumentRenderer for ComrakRenderer {
    fn render(&self, body: &str) -> Result<String> {
        let mut options = Options::default();
        options.extension.math_dollars = true;
        options.extension.table = true;
        options.extension.strikethrough = true;
        options.extension.footnotes = true;
        options.render.r#unsafe = true;

        let mut plugins = Plugins::default();
        plugins.render.codefence_syntax_highlighter = Some(&self.highlighter);

        Ok(comrak::markdown_to_html_with_plugins(
            body, &options, &plugins,
        ))
    }
}

/// Render a body, degrading to [`RENDER_FALLBACK`] if the renderer fails.
pub fn render_or_fallback<R: DocumentRenderer + ?Sized>(renderer: &R, body: &str) -> String {
    match renderer.render(body) {
        Ok(html) => html,
        Err(e) => {
            tracing::warn!("Failed to render document body: {e:#}");
            RENDER_FALLBACK.to_string()
        }
    }
}
