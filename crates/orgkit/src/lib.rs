//! # orgkit
//!
//! Typed surface for an organization's account/OU directory service.
//!
//! This crate provides:
//! - Identifiers and flat records for accounts and organizational units
//! - The [`Directory`] trait abstracting the directory service
//! - Error taxonomy with retry categories
//! - Retry with exponential backoff for transient failures
//! - In-memory and snapshot-file backends
//!
//! ## Example
//!
//! ```
//! use orgkit::{Directory, MemoryDirectory};
//!
//! let dir = MemoryDirectory::new();
//! let root = dir.root()?;
//! let apps = dir.create_ou(&root, "Apps")?;
//! assert_eq!(dir.list_ous(&root)?.len(), 1);
//! assert_eq!(apps.name, "Apps");
//! # Ok::<(), orgkit::Error>(())
//! ```
//!
//! ## Retry Logic
//!
//! Rate-limiting and network errors are transient; wrap directory calls in
//! [`retry::with_retry`] to retry them with exponential backoff. Permanent
//! errors (not found, permission denied, non-empty OU) fail immediately.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod backend;
pub mod directory;
pub mod error;
pub mod retry;
pub mod types;

pub use backend::memory::MemoryDirectory;
pub use backend::snapshot::{Snapshot, SnapshotDirectory};
pub use directory::Directory;
pub use error::{Error, ErrorCategory, Result};
pub use types::{AccountId, AccountRecord, AccountStatus, OuId, OuRecord, RetryConfig};
