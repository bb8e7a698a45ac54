//! Directory backends.
//!
//! Two implementations of [`crate::Directory`] ship with this crate:
//!
//! - [`memory::MemoryDirectory`] - in-memory organization for tests and
//!   simulated runs, with failure injection and a mutation log
//! - [`snapshot::SnapshotDirectory`] - JSON-file-backed organization for
//!   planning against an exported audit snapshot

pub mod memory;
pub mod snapshot;
