use std::fmt;
use std::path::PathBuf;

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

/// Declared dependency ranges, keyed by package name, in manifest order.
pub type DependencyMap = IndexMap<String, String>;

/// Handle to a [`PackageRecord`] stored in a [`PackageGraph`](crate::graph::PackageGraph).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackageId(pub usize);

/// Dependency ranges resolved to concrete records of the same graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedDependencies {
    pub dependencies: Vec<PackageId>,
    pub dev_dependencies: Vec<PackageId>,
    pub optional_dependencies: Vec<PackageId>,
}

impl ResolvedDependencies {
    /// All resolved references, regular first, then dev, then optional.
    pub fn iter(&self) -> impl Iterator<Item = PackageId> + '_ {
        self.dependencies
            .iter()
            .chain(&self.dev_dependencies)
            .chain(&self.optional_dependencies)
            .copied()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Author {
    Name(String),
    Person {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        email: Option<String>,
        #[serde(default)]
        url: Option<String>,
    },
}

impl Author {
    pub fn from_value(value: &Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Repository {
    Url(String),
    Detailed {
        #[serde(default, rename = "type")]
        kind: Option<String>,
        #[serde(default)]
        url: Option<String>,
    },
}

impl Repository {
    pub fn from_value(value: &Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            Repository::Url(url) => Some(url),
            Repository::Detailed { url, .. } => url.as_deref(),
        }
    }
}

/// One installed package, identified by `name` + `version`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PackageRecord {
    pub name: String,
    pub version: String,
    /// Every manifest file that described this package, in discovery order.
    pub manifest_paths: Vec<PathBuf>,
    /// A single identifier or a `(A OR B)` disjunction.
    pub license: Option<String>,
    pub homepage: Option<String>,
    pub author: Option<Author>,
    pub description: Option<String>,
    pub repository: Option<Repository>,
    pub dependencies: DependencyMap,
    pub dev_dependencies: DependencyMap,
    pub optional_dependencies: DependencyMap,
    pub resolved: ResolvedDependencies,
}

impl PackageRecord {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            ..Self::default()
        }
    }

    /// License used for sorting and grouping; absent licenses compare as `""`.
    pub fn license_str(&self) -> &str {
        self.license.as_deref().unwrap_or("")
    }

    /// Homepage, falling back to the repository URL.
    pub fn source_url(&self) -> Option<&str> {
        self.homepage
            .as_deref()
            .or_else(|| self.repository.as_ref().and_then(Repository::url))
    }

    /// Author email when the author is a person record, else the plain author string.
    pub fn author_label(&self) -> Option<&str> {
        match self.author.as_ref()? {
            Author::Name(name) => Some(name),
            Author::Person { email, .. } => email.as_deref(),
        }
    }
}

impl fmt::Display for PackageRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.version)
    }
}

/// A row of the license table: an identifier and, optionally, the file holding its text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LicenseEntry {
    pub name: String,
    #[serde(default)]
    pub file: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_author_label_prefers_email() {
        let mut record = PackageRecord::new("a", "1.0.0");
        record.author = Author::from_value(&json!({ "name": "Jane", "email": "jane@example.com" }));
        assert_eq!(record.author_label(), Some("jane@example.com"));

        record.author = Author::from_value(&json!({ "name": "Jane" }));
        assert_eq!(record.author_label(), None);

        record.author = Author::from_value(&json!("Jane <jane@example.com>"));
        assert_eq!(record.author_label(), Some("Jane <jane@example.com>"));
    }

    #[test]
    fn test_source_url_falls_back_to_repository() {
        let mut record = PackageRecord::new("a", "1.0.0");
        record.repository = Repository::from_value(&json!({
            "type": "git",
            "url": "git+https://github.com/a/a.git"
        }));
        assert_eq!(record.source_url(), Some("git+https://github.com/a/a.git"));

        record.homepage = Some("https://a.dev".to_string());
        assert_eq!(record.source_url(), Some("https://a.dev"));
    }

    #[test]
    fn test_resolved_iter_order() {
        let resolved = ResolvedDependencies {
            dependencies: vec![PackageId(2)],
            dev_dependencies: vec![PackageId(0)],
            optional_dependencies: vec![PackageId(1)],
        };
        let ids: Vec<PackageId> = resolved.iter().collect();
        assert_eq!(ids, vec![PackageId(2), PackageId(0), PackageId(1)]);
    }
}
