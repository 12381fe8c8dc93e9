//! Discovery and parsing of installed package manifests.
//!
//! Every file named exactly like the manifest (usually `package.json`) below
//! the tree roots becomes one [`PackageRecord`]. A read or parse failure
//! aborts the whole load; a partial inventory would be a wrong inventory.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde_json::Value;
use tracing::debug;
use walkdir::WalkDir;

use crate::models::{Author, DependencyMap, PackageRecord, Repository};

pub const DEFAULT_MANIFEST_NAME: &str = "package.json";

pub struct ManifestLoader {
    file_name: String,
}

impl ManifestLoader {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
        }
    }

    /// Walk each root in order and collect every file named like the manifest.
    ///
    /// Directory entries are visited sorted by file name so that the pool order,
    /// and therefore dependency resolution, is reproducible.
    pub fn discover(&self, roots: &[PathBuf]) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for root in roots {
            if !root.exists() {
                bail!("package tree does not exist: {}", root.display());
            }

            let walker = WalkDir::new(root).follow_links(true).sort_by_file_name();
            for entry in walker {
                let entry = entry
                    .with_context(|| format!("failed to walk package tree {}", root.display()))?;
                if entry.file_type().is_file() && entry.file_name() == self.file_name.as_str() {
                    files.push(entry.into_path());
                }
            }
        }
        debug!(count = files.len(), "discovered manifests");
        Ok(files)
    }

    /// Load one record per discovered manifest, in discovery order.
    pub fn load_records(&self, roots: &[PathBuf]) -> Result<Vec<PackageRecord>> {
        self.discover(roots)?
            .iter()
            .map(|path| load_manifest(path))
            .collect()
    }
}

impl Default for ManifestLoader {
    fn default() -> Self {
        Self::new(DEFAULT_MANIFEST_NAME)
    }
}

/// Read and parse a single manifest file.
pub fn load_manifest(path: &Path) -> Result<PackageRecord> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read manifest {}", path.display()))?;
    let json: Value = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse manifest {}", path.display()))?;

    let mut record = record_from_json(&json);
    record.manifest_paths = vec![path.to_path_buf()];
    Ok(record)
}

fn record_from_json(json: &Value) -> PackageRecord {
    let mut record = PackageRecord::new(
        string_field(json, "name").unwrap_or_default(),
        string_field(json, "version").unwrap_or_default(),
    );
    record.license = normalize_license(json.get("license"), json.get("licenses"));
    record.homepage = string_field(json, "homepage");
    record.author = json.get("author").and_then(Author::from_value);
    record.description = string_field(json, "description");
    record.repository = json.get("repository").and_then(Repository::from_value);
    record.dependencies = dependency_map(json, "dependencies");
    record.dev_dependencies = dependency_map(json, "devDependencies");
    record.optional_dependencies = dependency_map(json, "optionalDependencies");
    record
}

fn string_field(json: &Value, key: &str) -> Option<String> {
    json.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Ranges that are not strings cannot be matched and are dropped here.
fn dependency_map(json: &Value, key: &str) -> DependencyMap {
    json.get(key)
        .and_then(Value::as_object)
        .map(|entries| {
            entries
                .iter()
                .filter_map(|(name, range)| Some((name.clone(), range.as_str()?.to_string())))
                .collect()
        })
        .unwrap_or_default()
}

/// Fold the legacy `license` object and `licenses` list into one license string.
///
/// A non-empty string `license` wins. Otherwise the `type` of every `licenses`
/// entry is collected, followed by the `type` of a `license` object; one type is
/// returned as is and several become `(A OR B)`.
pub fn normalize_license(license: Option<&Value>, licenses: Option<&Value>) -> Option<String> {
    let declared = license.and_then(Value::as_str);
    if let Some(id) = declared.filter(|id| !id.is_empty()) {
        return Some(id.to_string());
    }

    let mut types: Vec<&str> = licenses
        .and_then(Value::as_array)
        .map(|entries| entries.iter().filter_map(license_type).collect())
        .unwrap_or_default();
    types.extend(license.and_then(license_type));

    match types.as_slice() {
        [] => declared.map(str::to_string),
        [single] => Some(single.to_string()),
        many => Some(format!("({})", many.join(" OR "))),
    }
}

fn license_type(entry: &Value) -> Option<&str> {
    entry
        .get("type")
        .and_then(Value::as_str)
        .filter(|kind| !kind.is_empty())
}
