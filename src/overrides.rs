//! Manual corrections for packages whose manifests carry a wrong or missing
//! homepage or license, keyed by exact `name` + `version`.

use serde::Deserialize;
use tracing::debug;

use crate::graph::PackageGraph;
use crate::models::PackageId;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Override {
    pub name: String,
    pub version: String,
    /// Replacement value for the overridden field.
    pub new: String,
    #[serde(default)]
    pub comment: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Overrides {
    #[serde(default)]
    pub homepage: Vec<Override>,
    #[serde(default)]
    pub license: Vec<Override>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OverrideField {
    Homepage,
    License,
}

impl Overrides {
    pub fn is_empty(&self) -> bool {
        self.homepage.is_empty() && self.license.is_empty()
    }

    pub fn len(&self) -> usize {
        self.homepage.len() + self.license.len()
    }

    /// Homepage overrides first, then license overrides.
    fn entries(&self) -> impl Iterator<Item = (OverrideField, &Override)> {
        self.homepage
            .iter()
            .map(|o| (OverrideField::Homepage, o))
            .chain(self.license.iter().map(|o| (OverrideField::License, o)))
    }

    fn push(&mut self, field: OverrideField, entry: Override) {
        match field {
            OverrideField::Homepage => self.homepage.push(entry),
            OverrideField::License => self.license.push(entry),
        }
    }
}

/// First of `packages` with the override's exact name and version.
fn find_target(graph: &PackageGraph, packages: &[PackageId], entry: &Override) -> Option<PackageId> {
    packages.iter().copied().find(|id| {
        let record = &graph[*id];
        record.name == entry.name && record.version == entry.version
    })
}

/// Replace the homepage or license of matching packages. Returns how many
/// overrides found a package.
pub fn apply_overrides(graph: &mut PackageGraph, packages: &[PackageId], overrides: &Overrides) -> usize {
    let mut applied = 0;
    for (field, entry) in overrides.entries() {
        let Some(id) = find_target(graph, packages, entry) else {
            continue;
        };
        let record = &mut graph[id];
        debug!(package = %record, field = ?field, new = %entry.new, "applying override");
        match field {
            OverrideField::Homepage => record.homepage = Some(entry.new.clone()),
            OverrideField::License => record.license = Some(entry.new.clone()),
        }
        applied += 1;
    }
    applied
}

/// Overrides that match none of `packages`, usually left over after an upgrade.
pub fn find_unused_overrides(graph: &PackageGraph, packages: &[PackageId], overrides: &Overrides) -> Overrides {
    let mut unused = Overrides::default();
    for (field, entry) in overrides.entries() {
        if find_target(graph, packages, entry).is_none() {
            unused.push(field, entry.clone());
        }
    }
    unused
}
