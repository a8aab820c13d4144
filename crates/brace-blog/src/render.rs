/*
 * render.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Single-template rendering for the `render` subcommand.

use std::fs;
use std::path::Path;

use anyhow::{Context as _, Result};
use brace_template::{Context, Template, diagnostic::render_report_with_color};

/// Options for [`render_template_file`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    /// Reject a `{{` that is never closed.
    pub strict: bool,
    /// Color the error report for a terminal.
    pub color: bool,
}

/// Read a TOML file into a context. Booleans and numbers become text.
pub fn load_context(path: &Path) -> Result<Context> {
    let text =
        fs::read_to_string(path).with_context(|| format!("Failed to read context {:?}", path))?;
    toml::from_str(&text).with_context(|| format!("Invalid context file {:?}", path))
}

/// Render the template at `template_path` against an optional TOML context.
///
/// Template errors come back as the rendered source report.
pub fn render_template_file(
    template_path: &Path,
    context_path: Option<&Path>,
    options: RenderOptions,
) -> Result<String> {
    let source = fs::read_to_string(template_path)
        .with_context(|| format!("Failed to read template {:?}", template_path))?;

    let ctx = match context_path {
        Some(path) => load_context(path)?,
        None => Context::map(),
    };

    let name = template_path.display().to_string();
    let compiled = if options.strict {
        Template::compile_strict(&source)
    } else {
        Template::compile_with_name(&source, &name)
    };

    compiled.and_then(|t| t.render(&ctx)).map_err(|e| {
        let report = render_report_with_color(&e, &name, &source, options.color);
        anyhow::anyhow!("{report}")
    })
}
