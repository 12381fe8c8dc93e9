//! The package graph: an arena of [`PackageRecord`]s addressed by [`PackageId`].
//!
//! - [`dedup`] — collapses manifests describing the same `name@version`.
//! - [`resolver`] — turns declared ranges into [`PackageId`] references.
//! - [`pruner`] — drops records nothing refers to.

pub mod dedup;
pub mod pruner;
pub mod resolver;

use std::ops::{Index, IndexMut};
use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::info;

use crate::manifest::{self, ManifestLoader};
use crate::models::{PackageId, PackageRecord};

/// Owns every candidate record plus the root record, which is always last.
#[derive(Debug, Clone)]
pub struct PackageGraph {
    records: Vec<PackageRecord>,
    root: PackageId,
}

impl PackageGraph {
    /// Build the pool from deduplicated candidates and append `root`.
    pub fn new(mut records: Vec<PackageRecord>, root: PackageRecord) -> Self {
        records.push(root);
        let root = PackageId(records.len() - 1);
        Self { records, root }
    }

    pub fn root(&self) -> PackageId {
        self.root
    }

    /// Number of records, root included.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn ids(&self) -> impl Iterator<Item = PackageId> {
        (0..self.records.len()).map(PackageId)
    }

    /// Records in pool order, root last.
    pub fn iter(&self) -> impl Iterator<Item = (PackageId, &PackageRecord)> {
        self.records
            .iter()
            .enumerate()
            .map(|(index, record)| (PackageId(index), record))
    }
}

impl Index<PackageId> for PackageGraph {
    type Output = PackageRecord;

    fn index(&self, id: PackageId) -> &PackageRecord {
        &self.records[id.0]
    }
}

impl IndexMut<PackageId> for PackageGraph {
    fn index_mut(&mut self, id: PackageId) -> &mut PackageRecord {
        &mut self.records[id.0]
    }
}

/// A resolved graph and the records kept after pruning (root excluded).
#[derive(Debug, Clone)]
pub struct Inventory {
    pub graph: PackageGraph,
    pub packages: Vec<PackageId>,
}

/// Load, deduplicate, resolve and prune the installed packages under `trees`,
/// using the manifest at `root_manifest` as the entry point.
pub fn collect_packages(
    root_manifest: &Path,
    trees: &[PathBuf],
    loader: &ManifestLoader,
) -> Result<Inventory> {
    let records = loader.load_records(trees)?;
    let loaded = records.len();
    let records = dedup::group_same_packages(records);
    let unique = records.len();

    let root = manifest::load_manifest(root_manifest)?;
    let mut graph = PackageGraph::new(records, root);
    resolver::resolve(&mut graph);

    let packages = pruner::referenced_packages(&graph);
    info!(
        loaded,
        unique,
        referenced = packages.len(),
        "collected package inventory"
    );
    Ok(Inventory { graph, packages })
}
