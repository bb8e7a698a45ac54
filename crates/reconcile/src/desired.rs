//! Desired-state loader.
//!
//! Parses a declarative TOML description of the target topology into the
//! same [`Topology`] shape the live reader produces. Desired nodes carry no
//! directory identifier; identifiers are assigned at creation time.
//!
//! ```toml
//! [[ou]]
//! path = "Apps/CAMPPS/Production"
//!
//! [[ou]]
//! path = "Security"
//!
//! [[account]]
//! id = "111111111111"
//! name = "campps-prod"
//! email = "aws+campps-prod@example.com"
//! parent = "Apps/CAMPPS/Production"
//! ```
//!
//! Intermediate path segments are implied (`Apps` and `Apps/CAMPPS` above);
//! an account's `parent` must resolve to a declared OU or the root.

use crate::error::{Error, ParseError, Result, ValidationError};
use crate::path::OuPath;
use crate::topology::{Account, Topology};
use orgkit::{AccountId, AccountStatus};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct DesiredDoc {
    #[serde(default)]
    ou: Vec<OuEntry>,
    #[serde(default)]
    account: Vec<AccountEntry>,
}

#[derive(Debug, Deserialize)]
struct OuEntry {
    path: String,
}

#[derive(Debug, Deserialize)]
struct AccountEntry {
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
    /// OU path; omitted means directly under the root
    #[serde(default)]
    parent: Option<String>,
}

/// Parse a desired-state document.
pub fn parse(source: &str) -> Result<Topology> {
    let doc: DesiredDoc = toml::from_str(source).map_err(ParseError::from)?;

    let mut topo = Topology::new(None);
    let mut declared: BTreeSet<OuPath> = BTreeSet::new();

    for entry in &doc.ou {
        let path = OuPath::parse(&entry.path)?;
        if path.is_root() {
            return Err(ParseError::InvalidPath {
                path: entry.path.clone(),
                reason: "the root is implicit and cannot be declared".to_string(),
            }
            .into());
        }
        if !declared.insert(path.clone()) {
            return Err(ParseError::DuplicateOu { path }.into());
        }
        topo.ensure_path(&path)?;
    }

    for entry in &doc.account {
        let parent_path = match &entry.parent {
            Some(p) => OuPath::parse(p)?,
            None => OuPath::root(),
        };
        let parent = topo.lookup(&parent_path).ok_or_else(|| {
            ValidationError::MissingAccountParent {
                account: AccountId::new(entry.id.clone()),
                parent: parent_path.to_string(),
            }
        })?;
        topo.add_account(Account {
            id: AccountId::new(entry.id.clone()),
            name: entry.name.clone().unwrap_or_else(|| entry.id.clone()),
            email: entry.email.clone(),
            status: AccountStatus::Active,
            parent,
        })?;
    }

    topo.validate()?;
    log::debug!(
        "desired topology: {} OUs, {} accounts",
        topo.ou_count(),
        topo.account_count()
    );
    Ok(topo)
}

/// Load and parse a desired-state file.
pub fn load(path: &Path) -> Result<Topology> {
    let content = fs::read_to_string(path).map_err(|source| {
        Error::Parse(ParseError::Read {
            path: path.to_path_buf(),
            source,
        })
    })?;
    parse(&content)
}
