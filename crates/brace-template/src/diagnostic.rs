/*
 * diagnostic.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Visual error reports for template errors.
//!
//! Errors that carry a span are rendered with ariadne, showing the offending
//! directive in its source line. Errors without a span fall back to their
//! plain message.

use crate::error::TemplateError;
use crate::parser::Template;
use ariadne::{Color, Config, Label, Report, ReportKind, Source};

/// Render a template error against the source it was produced from.
///
/// `name` identifies the source in the report header (usually a file path).
pub fn render_report(error: &TemplateError, name: &str, source: &str) -> String {
    render_report_with_color(error, name, source, false)
}

/// Like [`render_report`], optionally with ANSI colors for terminal output.
pub fn render_report_with_color(
    error: &TemplateError,
    name: &str,
    source: &str,
    color: bool,
) -> String {
    let Some(span) = error.span() else {
        return format!("Error: {error}");
    };

    // Unterminated directives can run to the end of input; keep the label
    // inside the source so ariadne has a line to attach it to.
    let end = span.end.min(source.len());
    let start = span.start.min(end);

    let report = Report::build(ReportKind::Error, name, start)
        .with_config(Config::default().with_color(color))
        .with_message(error.to_string())
        .with_label(
            Label::new((name, start..end))
                .with_message(label_message(error))
                .with_color(Color::Red),
        )
        .finish();

    let mut output = Vec::new();
    if report.write((name, Source::from(source)), &mut output).is_err() {
        return format!("Error: {error}");
    }
    String::from_utf8_lossy(&output).into_owned()
}

fn label_message(error: &TemplateError) -> &'static str {
    match error {
        TemplateError::MissingArgument { .. } => "expected a name after the keyword",
        TemplateError::UnclosedBlock { .. } => "block opened here",
        TemplateError::UnmatchedEnd { .. } => "nothing to close",
        TemplateError::UnterminatedDirective { .. } => "directive starts here",
        TemplateError::Io(_) => "",
    }
}

impl Template {
    /// Render an error produced while rendering this template.
    pub fn report(&self, error: &TemplateError) -> String {
        render_report(error, &self.name, &self.source)
    }
}
