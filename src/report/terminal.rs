use std::path::Path;

use anyhow::Result;
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::graph::PackageGraph;
use crate::license::compliance::InvalidPackages;
use crate::license::section::LicenseSection;
use crate::models::PackageId;
use crate::overrides::{Override, Overrides};

/// Everything the terminal report shows about one run.
pub struct Report<'a> {
    pub graph: &'a PackageGraph,
    pub packages: &'a [PackageId],
    pub sections: &'a [LicenseSection],
    pub invalid: &'a InvalidPackages,
    pub unused_overrides: &'a Overrides,
}

/// Render a colored terminal report.
pub fn render(report: &Report<'_>, manifest: &Path, verbose: bool, quiet: bool) -> Result<()> {
    let total = report.packages.len();
    let unlisted = report.invalid.license.len();
    let no_author = report.invalid.copyright.len();

    if quiet {
        println!(
            "Packages: {}  Licenses: {}  Unlisted: {}  No author: {}  Unused overrides: {}",
            total,
            report.sections.len(),
            colorize_count(unlisted, true),
            colorize_count(no_author, false),
            colorize_count(report.unused_overrides.len(), false),
        );
        return Ok(());
    }

    println!(
        "\n {} v{}",
        "license-graph".bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!(" Manifest: {}\n", manifest.display());

    println!(" ┌────────────────────────────────────────────────────┐");
    println!(" │  {:<49} │", "SUMMARY".bold());
    println!(" │  {:<49} │", format!("Packages           : {total}"));
    println!(
        " │  {:<49} │",
        format!("License sections   : {}", report.sections.len())
    );
    println!(
        " │  {:<49} │",
        format!("{}  Unlisted license : {:>4}", "✗".red(), unlisted)
    );
    println!(
        " │  {:<49} │",
        format!("{}  No author        : {:>4}", "⚠".yellow(), no_author)
    );
    println!(" └────────────────────────────────────────────────────┘\n");

    render_section_table(report);
    println!();

    if verbose {
        for section in report.sections {
            let title = if section.license.is_empty() {
                "(no license)"
            } else {
                section.license.as_str()
            };
            println!(" {} {}\n", "[LICENSE]".cyan().bold(), title.bold());
            render_package_table(report.graph, &section.members);
            println!();
        }
    }

    if unlisted > 0 {
        println!(
            " {} Packages with a license missing from the license table:\n",
            "[ERROR]".red().bold()
        );
        render_package_table(report.graph, &report.invalid.license);
        println!();
    }

    if no_author > 0 && verbose {
        println!(" {} Packages without an author:\n", "[WARN]".yellow().bold());
        render_package_table(report.graph, &report.invalid.copyright);
        println!();
    }

    if !report.unused_overrides.is_empty() {
        println!(
            " {} Overrides that matched no package:\n",
            "[WARN]".yellow().bold()
        );
        render_override_table(report.unused_overrides);
        println!();
    }

    Ok(())
}

fn colorize_count(count: usize, severe: bool) -> ColoredString {
    let text = count.to_string();
    match (count, severe) {
        (0, _) => text.green(),
        (_, true) => text.red(),
        (_, false) => text.yellow(),
    }
}

fn header(titles: &[&str]) -> Vec<Cell> {
    titles
        .iter()
        .map(|title| Cell::new(title).add_attribute(Attribute::Bold))
        .collect()
}

fn new_table(titles: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header(titles));
    table
}

fn render_section_table(report: &Report<'_>) {
    let mut table = new_table(&["License", "Packages", "Text"]);
    for section in report.sections {
        let (text, color) = match section.license_text {
            Some(_) => ("✓", Color::Green),
            None => ("–", Color::DarkGrey),
        };
        let license = if section.license.is_empty() {
            Cell::new("(no license)").fg(Color::Red)
        } else {
            Cell::new(&section.license)
        };
        table.add_row(vec![
            license,
            Cell::new(section.members.len()).set_alignment(CellAlignment::Right),
            Cell::new(text).fg(color).set_alignment(CellAlignment::Center),
        ]);
    }
    println!("{table}");
}

fn render_package_table(graph: &PackageGraph, ids: &[PackageId]) {
    let mut table = new_table(&["Name", "Version", "License", "Author", "Source"]);
    for id in ids {
        let record = &graph[*id];
        table.add_row(vec![
            Cell::new(&record.name),
            Cell::new(&record.version),
            Cell::new(record.license.as_deref().unwrap_or("unknown")),
            Cell::new(record.author_label().unwrap_or("")),
            Cell::new(record.source_url().unwrap_or("")),
        ]);
    }
    println!("{table}");
}

fn render_override_table(overrides: &Overrides) {
    let mut table = new_table(&["Field", "Name", "Version", "New", "Comment"]);
    let rows = overrides
        .homepage
        .iter()
        .map(|o| ("homepage", o))
        .chain(overrides.license.iter().map(|o| ("license", o)));
    for (field, Override { name, version, new, comment }) in rows {
        table.add_row(vec![
            Cell::new(field),
            Cell::new(name),
            Cell::new(version),
            Cell::new(new),
            Cell::new(comment),
        ]);
    }
    println!("{table}");
}
