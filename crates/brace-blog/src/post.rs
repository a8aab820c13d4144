/*
 * post.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Posts and their template contexts.
//!
//! This module provides functions for:
//! - Building a [`Post`] from a source file (`Post::parse`)
//! - Converting a post to the map a template is rendered against
//!   (`Post::to_context`)
//! - Formatting part numbers as Roman numerals (`to_roman`)

use brace_template::Context;
use chrono::{Datelike, NaiveDate};
use thiserror::Error;

use crate::front_matter::{FrontMatterError, split_front_matter};
use crate::markdown::{DocumentRenderer, render_or_fallback};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PostError {
    #[error(transparent)]
    FrontMatter(#[from] FrontMatterError),

    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("invalid part '{0}', expected a number between 1 and 3999")]
    InvalidPart(String),
}

/// A blog post: front matter fields plus a Markdown body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub slug: String,
    pub title: String,
    pub header: String,
    pub subheader: Option<String>,
    pub part: Option<u32>,
    pub date: NaiveDate,
    pub synopsis: String,
    pub mono_font: Option<String>,
    pub body: String,
}

impl Post {
    /// Parse a post from its source text. The slug is usually the file stem.
    pub fn parse(slug: &str, source: &str) -> Result<Self, PostError> {
        let (mut fields, body) = split_front_matter(source)?;
        let mut required =
            |key: &'static str| fields.shift_remove(key).ok_or(PostError::MissingField(key));

        let title = required("title")?;
        let date_text = required("date")?;
        let synopsis = required("synopsis")?;

        let date = NaiveDate::parse_from_str(&date_text, "%Y-%m-%d")
            .map_err(|_| PostError::InvalidDate(date_text.clone()))?;

        let part = match fields.shift_remove("part") {
            Some(text) => match text.parse::<u32>() {
                Ok(n) if (1..=3999).contains(&n) => Some(n),
                _ => return Err(PostError::InvalidPart(text)),
            },
            None => None,
        };

        Ok(Post {
            slug: slug.to_string(),
            header: fields.shift_remove("header").unwrap_or_else(|| title.clone()),
            title,
            subheader: fields.shift_remove("subheader"),
            part,
            date,
            synopsis,
            mono_font: fields.shift_remove("mono-font"),
            body: body.to_string(),
        })
    }

    /// Site-relative URL of the post, e.g. `/2015/my-post`.
    pub fn url(&self, base_url: &str) -> String {
        format!(
            "{}/{}/{}",
            base_url.trim_end_matches('/'),
            self.date.year(),
            self.slug
        )
    }

    /// `Apr 2, 2015`
    pub fn short_date(&self) -> String {
        self.date.format("%b %-d, %Y").to_string()
    }

    /// `2 April, 2015`
    pub fn long_date(&self) -> String {
        self.date.format("%-d %B, %Y").to_string()
    }

    /// Build the template context for this post.
    ///
    /// `subheader`, `part` and `mono-font` are only bound when the post sets
    /// them, so templates can test for them with `{{if}}`.
    pub fn to_context<R: DocumentRenderer + ?Sized>(&self, base_url: &str, renderer: &R) -> Context {
        let mut ctx = Context::map()
            .with("title", self.title.as_str())
            .with("header", self.header.as_str());
        if let Some(subheader) = &self.subheader {
            ctx.insert("subheader", subheader.as_str());
        }
        if let Some(part) = self.part {
            ctx.insert("part", to_roman(part));
        }
        ctx = ctx
            .with("short-date", self.short_date())
            .with("long-date", self.long_date())
            .with("url", self.url(base_url))
            .with("synopsis", self.synopsis.as_str())
            .with("content", render_or_fallback(renderer, &self.body));
        if let Some(mono_font) = &self.mono_font {
            ctx.insert("mono-font", mono_font.as_str());
        }
        ctx
    }
}

/// Format a number as an uppercase Roman numeral.
///
/// Zero has no numeral and yields an empty string; callers validate the
/// 1 to 3999 range.
pub fn to_roman(mut n: u32) -> String {
    const NUMERALS: &[(u32, &str)] = &[
        (1000, "M"),
        (900, "CM"),
        (500, "D"),
        (400, "CD"),
        (100, "C"),
        (90, "XC"),
        (50, "L"),
        (40, "XL"),
        (10, "X"),
        (9, "IX"),
        (5, "V"),
        (4, "IV"),
        (1, "I"),
    ];

    let mut out = String::new();
    for &(value, numeral) in NUMERALS {
        while n >= value {
            out.push_str(numeral);
            n -= value;
        }
    }
    out
}
