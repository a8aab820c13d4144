/*
 * site.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Site build: posts directory in, HTML tree out.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use brace_template::{Context, Template, render_report};
use chrono::Datelike;
use rayon::prelude::*;
use tracing::{debug, error, info};
use walkdir::WalkDir;

use crate::config::BlogConfig;
use crate::markdown::ComrakRenderer;
use crate::post::Post;

/// Outcome of a successful build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildSummary {
    /// Number of post pages written (the index is not counted).
    pub posts: usize,
    pub output_dir: PathBuf,
}

/// Build the whole site described by `config`.
pub fn build_site(config: &BlogConfig) -> Result<BuildSummary> {
    let renderer = ComrakRenderer::new(&config.markdown.highlight_theme)?;
    let post_template = load_template(&config.paths.templates.join("post.html"))?;
    let index_template = load_template(&config.paths.templates.join("index.html"))?;

    let mut posts = load_posts(&config.paths.posts)?;
    posts.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.slug.cmp(&b.slug)));
    ensure_unique_urls(&posts, &config.site.base_url)?;
    info!("Found {} posts in {}", posts.len(), config.paths.posts.display());

    let site = config.site_context();
    let output_dir = &config.paths.output;

    // Markdown conversion dominates; do it once per post, in parallel.
    let contexts: Vec<Context> = posts
        .par_iter()
        .map(|post| post.to_context(&config.site.base_url, &renderer))
        .collect();

    posts
        .par_iter()
        .zip(contexts.par_iter())
        .try_for_each(|(post, ctx)| -> Result<()> {
            let page = site.clone().overlay(ctx);
            let html = render_page(&post_template, &page)?;
            let path = post_output_path(output_dir, post);
            write_output(&path, &html)?;
            debug!("Wrote {}", path.display());
            Ok(())
        })?;

    let index = site.with("posts", contexts);
    let html = render_page(&index_template, &index)?;
    let index_path = output_dir.join("index.html");
    write_output(&index_path, &html)?;
    debug!("Wrote {}", index_path.display());

    info!("Built {} posts into {}", posts.len(), output_dir.display());
    Ok(BuildSummary {
        posts: posts.len(),
        output_dir: output_dir.clone(),
    })
}

/// Read and parse every `*.md` file under `dir`, in file name order.
pub fn load_posts(dir: &Path) -> Result<Vec<Post>> {
    let mut posts = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to read posts directory {:?}", dir))?;
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().is_none_or(|ext| ext != "md") {
            continue;
        }

        let slug = path
            .file_stem()
            .and_then(|s| s.to_str())
            .with_context(|| format!("Post file name is not valid UTF-8: {:?}", path))?;
        let source =
            fs::read_to_string(path).with_context(|| format!("Failed to read post {:?}", path))?;
        let post =
            Post::parse(slug, &source).with_context(|| format!("Invalid post {:?}", path))?;
        posts.push(post);
    }
    Ok(posts)
}

/// Read and compile a template, turning compile errors into a source report.
pub fn load_template(path: &Path) -> Result<Template> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read template {:?}", path))?;
    let name = path.display().to_string();
    Template::compile_with_name(&source, &name).map_err(|e| {
        let report = render_report(&e, &name, &source);
        error!("{report}");
        anyhow::anyhow!("{report}")
    })
}

fn render_page(template: &Template, ctx: &Context) -> Result<String> {
    template
        .render(ctx)
        .map_err(|e| anyhow::anyhow!("{}", template.report(&e)))
}

fn ensure_unique_urls(posts: &[Post], base_url: &str) -> Result<()> {
    let mut seen = HashSet::new();
    for post in posts {
        let url = post.url(base_url);
        if !seen.insert(url.clone()) {
            anyhow::bail!("Two posts share the URL {}", url);
        }
    }
    Ok(())
}

fn post_output_path(output_dir: &Path, post: &Post) -> PathBuf {
    output_dir
        .join(post.date.year().to_string())
        .join(&post.slug)
        .join("index.html")
}

fn write_output(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory: {:?}", parent))?;
    }
    fs::write(path, contents).with_context(|| format!("Failed to write output file: {:?}", path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn post(slug: &str, date: (i32, u32, u32)) -> Post {
        Post {
            slug: slug.to_string(),
            title: slug.to_string(),
            header: slug.to_string(),
            subheader: None,
            part: None,
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            synopsis: String::new(),
            mono_font: None,
            body: String::new(),
        }
    }

    #[test]
    fn test_post_output_path() {
        let path = post_output_path(Path::new("out"), &post("hello", (2015, 4, 2)));
        assert_eq!(path, PathBuf::from("out/2015/hello/index.html"));
    }

    #[test]
    fn test_duplicate_urls_rejected() {
        let posts = vec![post("a", (2015, 1, 1)), post("a", (2015, 6, 1))];
        let err = ensure_unique_urls(&posts, "").unwrap_err();
        assert_eq!(err.to_string(), "Two posts share the URL /2015/a");

        let posts = vec![post("a", (2015, 1, 1)), post("a", (2016, 1, 1))];
        assert!(ensure_unique_urls(&posts, "").is_ok());
    }

    /// Collects formatted log output for inspection.
    #[derive(Clone, Default)]
    struct LogBuffer(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_template_error_is_logged() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("post.html");
        fs::write(&path, "<p>{{foreach}}</p>").unwrap();

        let logs = LogBuffer::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        let err = tracing::subscriber::with_default(subscriber, || load_template(&path))
            .unwrap_err();
        assert!(err.to_string().contains("'foreach' directive requires an argument"));

        let logged = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(logged.contains("ERROR"), "{logged}");
        assert!(logged.contains("expected a name after the keyword"), "{logged}");
    }
}
