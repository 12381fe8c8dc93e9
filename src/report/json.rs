use std::path::PathBuf;

use anyhow::Result;
use serde::Serialize;

use crate::graph::PackageGraph;
use crate::license::section::LicenseSection;
use crate::models::PackageId;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PackageSummary<'a> {
    name: &'a str,
    version: &'a str,
    license: Option<&'a str>,
    author: Option<&'a str>,
    source: Option<&'a str>,
    description: Option<&'a str>,
    manifest_paths: &'a [PathBuf],
    dependencies: Vec<String>,
    dev_dependencies: Vec<String>,
    optional_dependencies: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SectionSummary<'a> {
    license: &'a str,
    license_text: Option<&'a str>,
    members: Vec<PackageSummary<'a>>,
}

fn summarize(graph: &PackageGraph, id: PackageId) -> PackageSummary<'_> {
    let record = &graph[id];
    let labels = |ids: &[PackageId]| -> Vec<String> {
        ids.iter().map(|dep| graph[*dep].to_string()).collect()
    };
    PackageSummary {
        name: &record.name,
        version: &record.version,
        license: record.license.as_deref(),
        author: record.author_label(),
        source: record.source_url(),
        description: record.description.as_deref(),
        manifest_paths: &record.manifest_paths,
        dependencies: labels(&record.resolved.dependencies),
        dev_dependencies: labels(&record.resolved.dev_dependencies),
        optional_dependencies: labels(&record.resolved.optional_dependencies),
    }
}

/// Pretty JSON array of the pruned packages, resolved edges as `name@version`.
pub fn render_packages(graph: &PackageGraph, packages: &[PackageId]) -> Result<String> {
    let summaries: Vec<PackageSummary> = packages.iter().map(|id| summarize(graph, *id)).collect();
    Ok(serde_json::to_string_pretty(&summaries)?)
}

/// Pretty JSON array of license sections with their members.
pub fn render_sections(graph: &PackageGraph, sections: &[LicenseSection]) -> Result<String> {
    let summaries: Vec<SectionSummary> = sections
        .iter()
        .map(|section| SectionSummary {
            license: &section.license,
            license_text: section.license_text.as_deref(),
            members: section
                .members
                .iter()
                .map(|id| summarize(graph, *id))
                .collect(),
        })
        .collect();
    Ok(serde_json::to_string_pretty(&summaries)?)
}
