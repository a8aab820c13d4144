/*
 * main.rs
 * Copyright (c) 2025 Posit, PBC
 */

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use anyhow::Result;
use brace_blog::{BlogConfig, RenderOptions, build_site, render_template_file};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "brace-blog")]
#[command(version)]
#[command(about = "Static blog generator for brace templates")]
struct Cli {
    /// Verbose output (-v for per-file logging)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render every post and the index page
    Build {
        /// Site configuration file
        #[arg(short, long, value_name = "FILE", default_value = "brace.toml")]
        config: PathBuf,
    },

    /// Render a single template to stdout
    Render {
        /// Template file
        #[arg(value_name = "TEMPLATE")]
        template: PathBuf,

        /// TOML file with the variables to render against
        #[arg(short, long, value_name = "FILE")]
        context: Option<PathBuf>,

        /// Reject directives that are never closed with '}}'
        #[arg(long)]
        strict: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let default_filter = if cli.verbose > 0 {
        "brace_blog=debug"
    } else {
        "brace_blog=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Build { config } => build(&config),
        Commands::Render {
            template,
            context,
            strict,
        } => render(&template, context.as_deref(), strict),
    }
}

fn build(config_path: &Path) -> Result<()> {
    let config = if config_path.exists() {
        BlogConfig::load(config_path)?
    } else {
        info!(
            "No configuration at {}, using defaults",
            config_path.display()
        );
        BlogConfig::default()
    };

    let summary = build_site(&config)?;
    eprintln!(
        "Rendered {} posts into {}",
        summary.posts,
        summary.output_dir.display()
    );
    Ok(())
}

fn render(template_path: &Path, context_path: Option<&Path>, strict: bool) -> Result<()> {
    let options = RenderOptions {
        strict,
        color: std::io::stderr().is_terminal(),
    };
    match render_template_file(template_path, context_path, options) {
        Ok(output) => {
            print!("{output}");
            Ok(())
        }
        Err(e) => {
            eprint!("{e:#}");
            std::process::exit(1);
        }
    }
}
