//! OpenAPI Diff CLI
//!
//! Compares two OpenAPI documents and prints the structured diff.
//!
//! Usage:
//!   openapi-diff base.yaml revision.yaml
//!   openapi-diff base.yaml revision.yaml --format yaml --summary
//!   openapi-diff base.json revision.json --filter '^/users' --fail-on-diff

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use openapi_diff::{DiffConfig, OpenApi};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Yaml,
}

#[derive(Parser)]
#[command(name = "openapi-diff")]
#[command(about = "Structured diff between two OpenAPI specifications")]
struct Cli {
    /// Base document (JSON or YAML)
    base: PathBuf,

    /// Revised document (JSON or YAML)
    revision: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "yaml")]
    format: Format,

    /// Print only the summary
    #[arg(long)]
    summary: bool,

    /// Only report paths matching this regular expression
    #[arg(long)]
    filter: Option<String>,

    /// Ignore paths whose path item has an extension matching this regular expression
    #[arg(long)]
    filter_extension: Option<String>,

    /// Compare examples
    #[arg(long)]
    include_examples: bool,

    /// Ignore changes to descriptions
    #[arg(long)]
    exclude_description: bool,

    /// Minimum days between deprecation and sunset
    #[arg(long)]
    deprecation_days: Option<i64>,

    /// Config file layered over the default locations
    #[arg(short, long)]
    config: Option<String>,

    /// Exit with code 2 when the documents differ
    #[arg(long)]
    fail_on_diff: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(true) => std::process::exit(2),
        Ok(false) => {}
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Returns whether the caller should signal a difference through the exit code
fn run(cli: Cli) -> anyhow::Result<bool> {
    let config = overlay(DiffConfig::load_from(cli.config.as_deref())?, &cli);

    let base = OpenApi::load(&cli.base).with_context(|| format!("failed to load {}", cli.base.display()))?;
    let revision =
        OpenApi::load(&cli.revision).with_context(|| format!("failed to load {}", cli.revision.display()))?;

    let diff = openapi_diff::get(&config, &base, &revision)?;
    for skipped in &diff.skipped {
        tracing::warn!(path = %skipped.path, reason = %skipped.reason, "element not compared");
    }

    if cli.summary {
        print(&diff.summary, cli.format)?;
    } else {
        print(&diff, cli.format)?;
    }

    Ok(cli.fail_on_diff && !diff.is_empty())
}

/// Command line flags take precedence over file and environment settings
fn overlay(mut config: DiffConfig, cli: &Cli) -> DiffConfig {
    if cli.filter.is_some() {
        config.path_filter = cli.filter.clone();
    }
    if cli.filter_extension.is_some() {
        config.filter_extension = cli.filter_extension.clone();
    }
    if let Some(days) = cli.deprecation_days {
        config.deprecation_days = days;
    }
    config.include_examples |= cli.include_examples;
    config.exclude_description |= cli.exclude_description;
    config
}

fn print<T: Serialize>(value: &T, format: Format) -> anyhow::Result<()> {
    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(value)?),
        Format::Yaml => print!("{}", serde_yaml::to_string(value)?),
    }
    Ok(())
}
