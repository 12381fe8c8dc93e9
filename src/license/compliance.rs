use crate::graph::PackageGraph;
use crate::models::{LicenseEntry, PackageId, PackageRecord};

/// Packages that need a human look before the report is shipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvalidPackages {
    /// License absent or not listed in the license table.
    pub license: Vec<PackageId>,
    /// Rejected by the copyright check.
    pub copyright: Vec<PackageId>,
}

pub fn find_invalid_packages<F>(
    graph: &PackageGraph,
    packages: &[PackageId],
    allowed: &[LicenseEntry],
    evaluate_copyright: F,
) -> InvalidPackages
where
    F: Fn(&PackageRecord) -> bool,
{
    let mut invalid = InvalidPackages::default();
    for &id in packages {
        let record = &graph[id];
        let listed = record
            .license
            .as_deref()
            .is_some_and(|license| allowed.iter().any(|entry| entry.name == license));
        if !listed {
            invalid.license.push(id);
        }
        if !evaluate_copyright(record) {
            invalid.copyright.push(id);
        }
    }
    invalid
}

/// Default copyright check: someone has to be named as the author.
pub fn has_author(record: &PackageRecord) -> bool {
    record
        .author_label()
        .is_some_and(|author| !author.trim().is_empty())
}
