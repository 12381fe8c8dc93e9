//! Dependency resolution with npm range semantics (`||`, hyphen ranges,
//! x-ranges, `~`, `^` and the prerelease rule), as implemented by
//! [`nodejs_semver`].

use std::collections::HashMap;

use nodejs_semver::{Range, Version};
use tracing::{debug, trace};

use crate::graph::PackageGraph;
use crate::models::{DependencyMap, PackageId, ResolvedDependencies};

/// Installed version of a record; a leading `v` is tolerated, anything else
/// unparsable never satisfies a range.
fn parse_version(raw: &str) -> Option<Version> {
    let raw = raw.trim();
    Version::parse(raw.strip_prefix('v').unwrap_or(raw)).ok()
}

/// Candidates grouped by name, each list in pool order.
struct CandidatePool {
    by_name: HashMap<String, Vec<(PackageId, Option<Version>)>>,
}

impl CandidatePool {
    fn new(graph: &PackageGraph) -> Self {
        let mut by_name: HashMap<String, Vec<(PackageId, Option<Version>)>> = HashMap::new();
        for (id, record) in graph.iter() {
            by_name
                .entry(record.name.clone())
                .or_default()
                .push((id, parse_version(&record.version)));
        }
        Self { by_name }
    }

    /// First candidate in pool order whose version satisfies `range`.
    ///
    /// Dist-tags, git URLs and `file:` specs do not parse as ranges and never match.
    fn find(&self, name: &str, range: &str) -> Option<PackageId> {
        let parsed = match Range::parse(range) {
            Ok(parsed) => parsed,
            Err(err) => {
                debug!(package = name, range, error = %err, "skipping unparsable range");
                return None;
            }
        };

        let found = self.by_name.get(name).and_then(|candidates| {
            candidates.iter().find_map(|(id, version)| {
                version
                    .as_ref()
                    .filter(|version| version.satisfies(&parsed))
                    .map(|_| *id)
            })
        });
        if found.is_none() {
            debug!(package = name, range, "no installed version satisfies range");
        }
        found
    }

    fn resolve_map(&self, declared: &DependencyMap) -> Vec<PackageId> {
        declared
            .iter()
            .filter_map(|(name, range)| self.find(name, range))
            .collect()
    }
}

/// Resolve the declared ranges of every record, root included, against the pool.
///
/// Each `(name, range)` entry maps to the first record in pool order with that
/// exact name and a satisfying version; entries with no match are dropped.
/// Re-running on the same graph produces the same lists.
pub fn resolve(graph: &mut PackageGraph) {
    let pool = CandidatePool::new(graph);

    let resolved: Vec<(PackageId, ResolvedDependencies)> = graph
        .iter()
        .map(|(id, record)| {
            let deps = ResolvedDependencies {
                dependencies: pool.resolve_map(&record.dependencies),
                dev_dependencies: pool.resolve_map(&record.dev_dependencies),
                optional_dependencies: pool.resolve_map(&record.optional_dependencies),
            };
            trace!(package = %record, edges = deps.iter().count(), "resolved dependencies");
            (id, deps)
        })
        .collect();

    for (id, deps) in resolved {
        graph[id].resolved = deps;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PackageRecord;

    fn package(name: &str, version: &str, deps: &[(&str, &str)]) -> PackageRecord {
        let mut record = PackageRecord::new(name, version);
        record.dependencies = deps
            .iter()
            .map(|(n, r)| (n.to_string(), r.to_string()))
            .collect();
        record
    }

    fn names(graph: &PackageGraph, ids: &[PackageId]) -> Vec<String> {
        ids.iter().map(|id| graph[*id].to_string()).collect()
    }

    #[test]
    fn test_caret_picks_compatible_version() {
        let mut graph = PackageGraph::new(
            vec![package("a", "2.0.0", &[]), package("a", "1.2.0", &[])],
            package("app", "1.0.0", &[("a", "^1.0.0")]),
        );
        resolve(&mut graph);

        let root = graph.root();
        assert_eq!(names(&graph, &graph[root].resolved.dependencies), vec!["a@1.2.0"]);
    }

    #[test]
    fn test_first_in_pool_order_wins() {
        let mut graph = PackageGraph::new(
            vec![package("a", "1.1.0", &[]), package("a", "1.9.0", &[])],
            package("app", "1.0.0", &[("a", "^1.0.0")]),
        );
        resolve(&mut graph);

        let root = graph.root();
        assert_eq!(graph[root].resolved.dependencies, vec![PackageId(0)]);
    }

    #[test]
    fn test_unsatisfiable_entries_are_dropped() {
        let mut graph = PackageGraph::new(
            vec![package("a", "1.0.0", &[]), package("b", "1.0.0", &[])],
            package(
                "app",
                "1.0.0",
                &[("a", "^2.0.0"), ("missing", "*"), ("b", "latest"), ("B", "1.0.0")],
            ),
        );
        resolve(&mut graph);

        assert!(graph[graph.root()].resolved.dependencies.is_empty());
    }

    #[test]
    fn test_resolves_all_three_maps_in_declaration_order() {
        let mut root = package("app", "1.0.0", &[("z", "*"), ("a", "*")]);
        root.dev_dependencies.insert("dev".to_string(), "~0.1.0".to_string());
        root.optional_dependencies.insert("opt".to_string(), ">=3".to_string());

        let mut graph = PackageGraph::new(
            vec![
                package("a", "1.0.0", &[]),
                package("z", "1.0.0", &[]),
                package("dev", "0.1.4", &[]),
                package("opt", "3.0.1", &[]),
            ],
            root,
        );
        resolve(&mut graph);

        let resolved = &graph[graph.root()].resolved;
        assert_eq!(names(&graph, &resolved.dependencies), vec!["z@1.0.0", "a@1.0.0"]);
        assert_eq!(names(&graph, &resolved.dev_dependencies), vec!["dev@0.1.4"]);
        assert_eq!(names(&graph, &resolved.optional_dependencies), vec!["opt@3.0.1"]);
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let mut graph = PackageGraph::new(
            vec![
                package("a", "1.0.0", &[("b", "^1.0.0")]),
                package("b", "1.4.0", &[("a", "1.x")]),
                package("b", "1.5.0", &[]),
            ],
            package("app", "1.0.0", &[("a", "^1.0.0")]),
        );
        resolve(&mut graph);
        let first: Vec<ResolvedDependencies> =
            graph.iter().map(|(_, r)| r.resolved.clone()).collect();

        resolve(&mut graph);
        let second: Vec<ResolvedDependencies> =
            graph.iter().map(|(_, r)| r.resolved.clone()).collect();

        assert_eq!(first, second);
        assert_eq!(graph[PackageId(1)].resolved.dependencies, vec![PackageId(0)]);
    }

    #[test]
    fn test_root_is_a_resolution_target() {
        let mut graph = PackageGraph::new(
            vec![package("plugin", "1.0.0", &[("app", "^1.0.0")])],
            package("app", "1.2.0", &[]),
        );
        resolve(&mut graph);
        assert_eq!(graph[PackageId(0)].resolved.dependencies, vec![graph.root()]);
    }

    /// Versions, in input order, that satisfy `range` when installed alone.
    fn satisfied_by(range: &str, versions: &[&str]) -> Vec<String> {
        versions
            .iter()
            .filter(|version| {
                let graph =
                    PackageGraph::new(vec![package("a", version, &[])], package("app", "1.0.0", &[]));
                CandidatePool::new(&graph).find("a", range).is_some()
            })
            .map(|version| version.to_string())
            .collect()
    }

    #[test]
    fn test_npm_range_forms() {
        let versions = ["0.9.9", "1.0.0", "1.2.3", "1.2.9", "1.3.0", "2.0.0", "2.3.4", "3.0.0"];
        assert_eq!(satisfied_by("1.2.3", &versions), vec!["1.2.3"]);
        assert_eq!(satisfied_by("^1.2.3", &versions), vec!["1.2.3", "1.2.9", "1.3.0"]);
        assert_eq!(satisfied_by("~1.2.3", &versions), vec!["1.2.3", "1.2.9"]);
        assert_eq!(satisfied_by("1.x", &versions), vec!["1.0.0", "1.2.3", "1.2.9", "1.3.0"]);
        assert_eq!(
            satisfied_by("1.2.3 - 2.3.4", &versions),
            vec!["1.2.3", "1.2.9", "1.3.0", "2.0.0", "2.3.4"]
        );
        assert_eq!(satisfied_by(">=1.2.7 <1.3.0", &versions), vec!["1.2.9"]);
        assert_eq!(satisfied_by("1.0.0 || >=3.0.0", &versions), vec!["1.0.0", "3.0.0"]);
        assert_eq!(satisfied_by("*", &versions).len(), versions.len());
    }

    #[test]
    fn test_zero_major_caret() {
        let versions = ["0.2.2", "0.2.3", "0.2.9", "0.3.0"];
        assert_eq!(satisfied_by("^0.2.3", &versions), vec!["0.2.3", "0.2.9"]);
    }

    #[test]
    fn test_wildcard_minor_ignores_trailing_prerelease() {
        assert_eq!(satisfied_by("1.x.3-beta", &["0.9.0", "1.5.0", "2.0.0"]), vec!["1.5.0"]);
    }

    #[test]
    fn test_prerelease_needs_matching_tuple() {
        let versions = ["1.2.3-beta.4", "1.2.4", "1.2.4-beta.1"];
        assert_eq!(satisfied_by("^1.2.3-beta.2", &versions), vec!["1.2.3-beta.4", "1.2.4"]);
        assert!(satisfied_by("*", &["1.0.0-alpha"]).is_empty());
    }

    #[test]
    fn test_unparsable_versions_and_specs_never_match() {
        assert!(satisfied_by("*", &["not-a-version", ""]).is_empty());
        for spec in ["latest", "git+https://x/y.git", "file:../foo"] {
            assert!(satisfied_by(spec, &["1.0.0"]).is_empty(), "{spec} should not match");
        }
        assert_eq!(satisfied_by("^1.0.0", &["v1.4.0"]), vec!["v1.4.0"]);
    }
}
