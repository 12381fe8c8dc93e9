use crate::graph::PackageGraph;
use crate::models::PackageId;

/// Records referenced by any other record of the whole pool, in pool order.
///
/// Not a walk from the root: a record is kept when any other record of the
/// original pool, kept or not, lists it in one of its three resolved lists.
/// Self references do not count. The root seeds the test but is never part of
/// the result.
pub fn referenced_packages(graph: &PackageGraph) -> Vec<PackageId> {
    let mut referenced = vec![false; graph.len()];
    for (id, record) in graph.iter() {
        for dep in record.resolved.iter().filter(|dep| *dep != id) {
            referenced[dep.0] = true;
        }
    }

    let root = graph.root();
    graph
        .ids()
        .filter(|id| *id != root && referenced[id.0])
        .collect()
}
