//! Change detection and full-replace mirroring between two directory trees.
//!
//! [`TreeComparator`] answers whether a destination tree holds exactly the
//! files of a source tree, byte for byte. [`TreeMirror`] deletes the
//! destination and copies the source over it. The two share nothing but the
//! root paths they are given; callers typically compare first and only sync
//! on a difference.
//!
//! Comparison only looks at files. Empty directories are not part of a
//! tree's identity, so a destination that lacks an empty directory present
//! in the source still compares identical.

pub mod application;
pub mod cli;
pub mod config;
pub mod ext;
pub mod mirror;
pub mod tree;

pub use mirror::{SyncError, SyncReport, TreeMirror};
pub use tree::{CompareError, Mismatch, RelativeEntry, TreeComparator, TreeSnapshot, Verdict};
