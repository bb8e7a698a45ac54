//! Snapshot-file directory backend.
//!
//! A [`SnapshotDirectory`] serves an organization exported to a JSON file,
//! typically produced by an audit of the real directory. Reads are served
//! from memory; every successful mutation is written back to the file, so
//! an applied plan can be inspected (and re-diffed) offline.

use crate::directory::Directory;
use crate::error::{Error, Result};
use crate::types::{AccountId, AccountRecord, OuId, OuRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use super::memory::MemoryDirectory;

/// Serialized form of an exported organization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    /// Identifier of the organization root
    pub root: OuId,
    /// All organizational units, flat, with parent attribution
    #[serde(default)]
    pub ous: Vec<OuRecord>,
    /// All accounts, flat, with parent attribution
    #[serde(default)]
    pub accounts: Vec<AccountRecord>,
    /// When the snapshot was taken or last written
    #[serde(default)]
    pub taken_at: Option<DateTime<Utc>>,
}

/// JSON-file-backed implementation of [`Directory`].
#[derive(Debug)]
pub struct SnapshotDirectory {
    path: PathBuf,
    inner: MemoryDirectory,
}

impl SnapshotDirectory {
    /// Open an exported snapshot file.
    pub fn open(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Other(format!("could not read snapshot {}: {}", path.display(), e))
        })?;
        let snapshot: Snapshot = serde_json::from_str(&content)?;
        Ok(Self {
            path: path.to_path_buf(),
            inner: MemoryDirectory::from_parts(snapshot.root, snapshot.ous, snapshot.accounts),
        })
    }

    /// Write a snapshot to a file, creating parent directories as needed.
    pub fn write_snapshot(path: &Path, snapshot: &Snapshot) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(snapshot)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The current organization as a [`Snapshot`].
    pub fn snapshot(&self) -> Snapshot {
        let (root, ous, accounts) = self.inner.dump();
        Snapshot {
            root,
            ous,
            accounts,
            taken_at: Some(Utc::now()),
        }
    }

    fn persist(&self) -> Result<()> {
        Self::write_snapshot(&self.path, &self.snapshot())
    }
}

impl Directory for SnapshotDirectory {
    fn root(&self) -> Result<OuId> {
        self.inner.root()
    }

    fn list_ous(&self, parent: &OuId) -> Result<Vec<OuRecord>> {
        self.inner.list_ous(parent)
    }

    fn list_accounts(&self, parent: &OuId) -> Result<Vec<AccountRecord>> {
        self.inner.list_accounts(parent)
    }

    fn find_ou(&self, id: &OuId) -> Result<Option<OuRecord>> {
        self.inner.find_ou(id)
    }

    fn find_account(&self, id: &AccountId) -> Result<Option<AccountRecord>> {
        self.inner.find_account(id)
    }

    fn create_ou(&self, parent: &OuId, name: &str) -> Result<OuRecord> {
        let record = self.inner.create_ou(parent, name)?;
        self.persist()?;
        Ok(record)
    }

    fn rename_ou(&self, id: &OuId, name: &str) -> Result<OuRecord> {
        let record = self.inner.rename_ou(id, name)?;
        self.persist()?;
        Ok(record)
    }

    fn move_account(&self, account: &AccountId, from: &OuId, to: &OuId) -> Result<()> {
        self.inner.move_account(account, from, to)?;
        self.persist()
    }

    fn delete_ou(&self, id: &OuId) -> Result<()> {
        self.inner.delete_ou(id)?;
        self.persist()
    }
}
