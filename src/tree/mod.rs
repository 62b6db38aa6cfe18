//! Change detection between a source tree and a destination tree.
//!
//! Each root is walked into a [`TreeSnapshot`] of files keyed by
//! [`RelativeEntry`]; the two snapshots are then compared entry by entry,
//! path first and bytes second.

mod comparator;
mod relative_entry;
mod snapshot;

pub use comparator::{CompareError, Mismatch, Side, TreeComparator, Verdict};
pub use relative_entry::{CANONICAL_SEPARATOR, RelativeEntry};
pub use snapshot::{SnapshotEntry, SnapshotError, TreeSnapshot};
