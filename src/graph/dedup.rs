use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::models::PackageRecord;

/// Merge records with the same `name` and `version` into the first one seen.
///
/// Output keeps first-occurrence order. The survivor's `manifest_paths` is the
/// concatenation of every merged record's paths in encounter order. Versions are
/// compared as plain strings, so `1.0.0` and `1.0.0-0` stay distinct.
pub fn group_same_packages(records: Vec<PackageRecord>) -> Vec<PackageRecord> {
    let mut uniques: Vec<PackageRecord> = Vec::with_capacity(records.len());
    let mut positions: HashMap<(String, String), usize> = HashMap::new();

    for record in records {
        match positions.entry((record.name.clone(), record.version.clone())) {
            Entry::Occupied(existing) => {
                uniques[*existing.get()]
                    .manifest_paths
                    .extend(record.manifest_paths);
            }
            Entry::Vacant(slot) => {
                slot.insert(uniques.len());
                uniques.push(record);
            }
        }
    }

    uniques
}
