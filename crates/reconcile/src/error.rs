//! Error types for reconciliation cycles.
//!
//! Errors found while reading, parsing, or validating abort the whole cycle
//! before any mutation; errors during execution are scoped to the failing
//! step and live in the execution report, not here.

use crate::path::OuPath;
use orgkit::AccountId;
use std::path::PathBuf;
use thiserror::Error;

/// Structural invariant violation in a topology.
///
/// Both the live and the desired topology must be valid trees before the
/// diff engine may consume them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Two siblings carry the same name
    #[error("duplicate organizational unit name {name:?} under {parent}")]
    DuplicateSiblingName { parent: OuPath, name: String },

    /// An OU is not reachable from the root
    #[error("organizational unit {ou} is detached from the root")]
    OrphanOu { ou: String },

    /// The parent chain loops
    #[error("cycle detected through organizational unit {ou}")]
    Cycle { ou: String },

    /// An account references a parent OU that does not exist
    #[error("account {account} references missing parent {parent}")]
    MissingAccountParent { account: AccountId, parent: String },

    /// The same account id appears twice
    #[error("duplicate account {account}")]
    DuplicateAccount { account: AccountId },

    /// Two accounts share a contact email
    #[error("duplicate contact email {email:?} on {first} and {second}")]
    DuplicateEmail {
        email: String,
        first: AccountId,
        second: AccountId,
    },
}

/// Desired-state source malformed. Detected before any live call is made.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The document is not valid TOML
    #[error("invalid desired-state document: {0}")]
    Toml(#[from] toml::de::Error),

    /// A path string could not be parsed
    #[error("invalid organizational unit path {path:?}: {reason}")]
    InvalidPath { path: String, reason: String },

    /// The same OU path is declared twice
    #[error("duplicate organizational unit entry {path}")]
    DuplicateOu { path: OuPath },

    /// The source file could not be read
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that abort a reconciliation cycle.
#[derive(Debug, Error)]
pub enum Error {
    /// A topology violates a structural invariant
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The desired-state source is malformed
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The directory service failed beyond retry
    #[error("directory service: {0}")]
    Directory(#[from] orgkit::Error),

    /// Another cycle currently holds the lease
    #[error("another reconciliation cycle is in progress (lease at {})", path.display())]
    CycleInProgress { path: PathBuf },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for reconciliation operations.
pub type Result<T> = std::result::Result<T, Error>;
