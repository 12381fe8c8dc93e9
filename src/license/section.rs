use std::path::Path;

use anyhow::{Context, Result};

use crate::graph::PackageGraph;
use crate::models::{LicenseEntry, PackageId};

/// Packages sharing one license identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LicenseSection {
    pub license: String,
    pub license_text: Option<String>,
    /// Sorted by package name.
    pub members: Vec<PackageId>,
}

/// Group `packages` by license.
///
/// Packages are stably sorted by license (absent sorts as `""`), consecutive
/// equal licenses share a section and each section's members are sorted by name.
/// Text is loaded once per section from `licenses_dir`.
pub fn gather_license_sections(
    graph: &PackageGraph,
    packages: &[PackageId],
    table: &[LicenseEntry],
    licenses_dir: &Path,
) -> Result<Vec<LicenseSection>> {
    let mut ordered = packages.to_vec();
    ordered.sort_by(|a, b| graph[*a].license_str().cmp(graph[*b].license_str()));

    let mut sections: Vec<LicenseSection> = Vec::new();
    for id in ordered {
        let license = graph[id].license_str();
        match sections.last_mut() {
            Some(section) if section.license == license => section.members.push(id),
            _ => sections.push(LicenseSection {
                license: license.to_string(),
                license_text: read_license_text(license, table, licenses_dir)?,
                members: vec![id],
            }),
        }
    }

    for section in &mut sections {
        section
            .members
            .sort_by(|a, b| graph[*a].name.cmp(&graph[*b].name));
    }

    Ok(sections)
}

/// Text of the first table entry named `license`. A missing entry or file name
/// means no text; a named file that cannot be read is an error.
pub fn read_license_text(
    license: &str,
    table: &[LicenseEntry],
    licenses_dir: &Path,
) -> Result<Option<String>> {
    let Some(file) = table
        .iter()
        .find(|entry| entry.name == license)
        .and_then(|entry| entry.file.as_deref())
    else {
        return Ok(None);
    };

    let path = licenses_dir.join(file);
    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read license text {}", path.display()))?;
    Ok(Some(text))
}
