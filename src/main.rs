//! `license-graph` — resolve the installed dependency graph of a project and
//! group the packages it actually uses by license.
//!
//! # Flow
//! 1. Parse CLI arguments ([`cli`]).
//! 2. Load config ([`config::load_config`]).
//! 3. Load manifests from the package trees ([`manifest`]).
//! 4. Deduplicate, resolve ranges and prune to referenced packages ([`graph`]).
//! 5. Apply homepage/license overrides ([`overrides`]).
//! 6. Group by license and run compliance checks ([`license`]).
//! 7. Render the requested report ([`report`]).
//! 8. Exit `0`, or `1` under `--check` when a license is not in the license table.

mod cli;
mod config;
mod graph;
mod license;
mod manifest;
mod models;
mod overrides;
mod report;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use cli::{Cli, ReportFormat};
use config::load_config;
use graph::{collect_packages, Inventory};
use license::compliance::{find_invalid_packages, has_author};
use license::section::gather_license_sections;
use manifest::ManifestLoader;
use overrides::{apply_overrides, find_unused_overrides};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Resolve the root manifest and the project directory around it
    let manifest = cli
        .manifest
        .canonicalize()
        .unwrap_or_else(|_| cli.manifest.clone());
    let project_path = manifest
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    let config = load_config(&project_path, cli.config.as_deref())?;

    let trees = if cli.trees.is_empty() {
        config.tree_paths(&project_path)
    } else {
        cli.trees.clone()
    };
    let licenses_dir = cli
        .licenses_dir
        .clone()
        .unwrap_or_else(|| config.licenses_path(&project_path));

    // Load, deduplicate, resolve and prune
    let loader = ManifestLoader::new(config.manifest_name.as_str());
    let spinner = start_spinner(cli.quiet, "Resolving package graph")?;
    let collected = collect_packages(&manifest, &trees, &loader);
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    let Inventory {
        mut graph,
        packages,
    } = collected?;

    // Overrides are matched against the pruned set only
    let applied = apply_overrides(&mut graph, &packages, &config.overrides);
    debug!(applied, total = config.overrides.len(), "applied overrides");
    let unused_overrides = find_unused_overrides(&graph, &packages, &config.overrides);
    for entry in unused_overrides.homepage.iter().chain(&unused_overrides.license) {
        warn!(name = %entry.name, version = %entry.version, "override matched no package");
    }

    let sections = gather_license_sections(&graph, &packages, &config.licenses, &licenses_dir)?;
    let invalid = find_invalid_packages(&graph, &packages, &config.licenses, has_author);

    match cli.report {
        ReportFormat::Terminal => {
            let report = report::terminal::Report {
                graph: &graph,
                packages: &packages,
                sections: &sections,
                invalid: &invalid,
                unused_overrides: &unused_overrides,
            };
            report::terminal::render(&report, &manifest, cli.verbose, cli.quiet)?;
        }
        ReportFormat::Json => {
            println!("{}", report::json::render_packages(&graph, &packages)?);
        }
        ReportFormat::Sections => {
            println!("{}", report::json::render_sections(&graph, &sections)?);
        }
    }

    if cli.check && !invalid.license.is_empty() {
        std::process::exit(1);
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("LICENSE_GRAPH_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose {
            "license_graph=debug"
        } else {
            "license_graph=warn"
        })
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn start_spinner(quiet: bool, message: &str) -> Result<Option<ProgressBar>> {
    if quiet {
        return Ok(None);
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(80));
    pb.set_message(message.to_string());
    Ok(Some(pb))
}
