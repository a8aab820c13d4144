/*
 * config.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Site configuration (`brace.toml`).

use std::path::{Path, PathBuf};

use brace_template::{Context, ContextMap};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid configuration in {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct BlogConfig {
    pub site: SiteConfig,
    pub paths: PathsConfig,
    pub markdown: MarkdownConfig,
    /// Extra site-wide template variables.
    pub context: ContextMap,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct SiteConfig {
    pub title: String,
    /// Prefix for post URLs; empty for site-relative URLs.
    pub base_url: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct PathsConfig {
    /// Directory searched for `*.md` posts.
    pub posts: PathBuf,
    /// Directory holding `post.html` and `index.html`.
    pub templates: PathBuf,
    pub output: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct MarkdownConfig {
    pub highlight_theme: String,
}

impl Default for BlogConfig {
    fn default() -> Self {
        Self {
            site: SiteConfig::default(),
            paths: PathsConfig::default(),
            markdown: MarkdownConfig::default(),
            context: ContextMap::new(),
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Blog".to_string(),
            base_url: String::new(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            posts: PathBuf::from("posts"),
            templates: PathBuf::from("templates"),
            output: PathBuf::from("out"),
        }
    }
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            highlight_theme: "InspiredGitHub".to_string(),
        }
    }
}

impl BlogConfig {
    /// Load a config file. Relative paths in it resolve against the file's
    /// directory.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(config.relative_to(path.parent().unwrap_or_else(|| Path::new(""))))
    }

    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Resolve relative paths against `root`.
    pub fn relative_to(mut self, root: &Path) -> Self {
        for path in [
            &mut self.paths.posts,
            &mut self.paths.templates,
            &mut self.paths.output,
        ] {
            if path.is_relative() {
                *path = root.join(&*path);
            }
        }
        self
    }

    /// Variables shared by every page: `site-title` plus the `[context]` table.
    pub fn site_context(&self) -> Context {
        let ctx = Context::map().with("site-title", self.site.title.as_str());
        ctx.overlay(&Context::Map(self.context.clone()))
    }
}
