//! License grouping and compliance checks over the pruned package set.
//!
//! - [`section`] — buckets packages by license identifier and attaches license text.
//! - [`compliance`] — flags packages with unlisted licenses or no copyright holder.

pub mod compliance;
pub mod section;
