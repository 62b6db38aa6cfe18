//! Full-replace mirroring of a source tree onto a destination tree.

mod mirror;

pub use mirror::{SyncError, SyncReport, TreeMirror};
