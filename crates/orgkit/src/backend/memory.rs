//! In-memory directory backend.
//!
//! Holds a full organization in memory with deterministic OU identifiers.
//! Used by tests and simulated runs; also the storage engine behind the
//! snapshot backend. Supports failure injection (the next call returns the
//! injected error) and records every mutating call, so tests can assert
//! that a dry run issued none.

use crate::directory::Directory;
use crate::error::{Error, Result};
use crate::types::{AccountId, AccountRecord, AccountStatus, OuId, OuRecord};
use std::collections::{BTreeMap, VecDeque};
use std::sync::Mutex;

#[derive(Debug)]
struct State {
    root: OuId,
    next_ou: u64,
    ous: BTreeMap<OuId, OuRecord>,
    accounts: BTreeMap<AccountId, AccountRecord>,
    injected: VecDeque<Error>,
    mutations: Vec<String>,
}

/// In-memory implementation of [`Directory`].
#[derive(Debug)]
pub struct MemoryDirectory {
    state: Mutex<State>,
}

impl MemoryDirectory {
    /// Create an empty organization with just a root.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                root: OuId::new("r-0001"),
                next_ou: 1,
                ous: BTreeMap::new(),
                accounts: BTreeMap::new(),
                injected: VecDeque::new(),
                mutations: Vec::new(),
            }),
        }
    }

    /// Rebuild an organization from previously dumped parts.
    pub fn from_parts(root: OuId, ous: Vec<OuRecord>, accounts: Vec<AccountRecord>) -> Self {
        let ous: BTreeMap<OuId, OuRecord> = ous.into_iter().map(|ou| (ou.id.clone(), ou)).collect();
        let accounts = accounts.into_iter().map(|a| (a.id.clone(), a)).collect();
        Self {
            state: Mutex::new(State {
                root,
                next_ou: ous.len() as u64 + 1,
                ous,
                accounts,
                injected: VecDeque::new(),
                mutations: Vec::new(),
            }),
        }
    }

    /// Dump the organization as flat parts, for persistence.
    pub fn dump(&self) -> (OuId, Vec<OuRecord>, Vec<AccountRecord>) {
        let state = self.state.lock().unwrap();
        (
            state.root.clone(),
            state.ous.values().cloned().collect(),
            state.accounts.values().cloned().collect(),
        )
    }

    /// Seed an OU without recording a mutation. Test/setup helper.
    pub fn seed_ou(&self, parent: &OuId, name: &str) -> OuId {
        let mut state = self.state.lock().unwrap();
        let id = state.fresh_ou_id();
        state.ous.insert(
            id.clone(),
            OuRecord {
                id: id.clone(),
                name: name.to_string(),
                parent: Some(parent.clone()),
            },
        );
        id
    }

    /// Seed an account without recording a mutation. Test/setup helper.
    pub fn seed_account(
        &self,
        parent: &OuId,
        id: &str,
        name: &str,
        email: &str,
        status: AccountStatus,
    ) -> AccountId {
        let mut state = self.state.lock().unwrap();
        let account = AccountId::new(id);
        state.accounts.insert(
            account.clone(),
            AccountRecord {
                id: account.clone(),
                name: name.to_string(),
                email: email.to_string(),
                status,
                parent: parent.clone(),
            },
        );
        account
    }

    /// Queue an error to be returned by the next directory call.
    pub fn inject_failure(&self, err: Error) {
        self.state.lock().unwrap().injected.push_back(err);
    }

    /// Mutating calls issued so far, in order.
    pub fn mutations(&self) -> Vec<String> {
        self.state.lock().unwrap().mutations.clone()
    }

    fn take_injected(state: &mut State) -> Result<()> {
        match state.injected.pop_front() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl Default for MemoryDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl State {
    fn fresh_ou_id(&mut self) -> OuId {
        loop {
            let id = OuId::new(format!("ou-{:04}", self.next_ou));
            self.next_ou += 1;
            if !self.ous.contains_key(&id) {
                return id;
            }
        }
    }

    fn parent_exists(&self, parent: &OuId) -> bool {
        *parent == self.root || self.ous.contains_key(parent)
    }

    fn sibling_named(&self, parent: &OuId, name: &str) -> Option<&OuRecord> {
        self.ous
            .values()
            .find(|ou| ou.parent.as_ref() == Some(parent) && ou.name == name)
    }
}

impl Directory for MemoryDirectory {
    fn root(&self) -> Result<OuId> {
        let mut state = self.state.lock().unwrap();
        Self::take_injected(&mut state)?;
        Ok(state.root.clone())
    }

    fn list_ous(&self, parent: &OuId) -> Result<Vec<OuRecord>> {
        let mut state = self.state.lock().unwrap();
        Self::take_injected(&mut state)?;
        if !state.parent_exists(parent) {
            return Err(Error::NotFound {
                entity: parent.to_string(),
            });
        }
        Ok(state
            .ous
            .values()
            .filter(|ou| ou.parent.as_ref() == Some(parent))
            .cloned()
            .collect())
    }

    fn list_accounts(&self, parent: &OuId) -> Result<Vec<AccountRecord>> {
        let mut state = self.state.lock().unwrap();
        Self::take_injected(&mut state)?;
        if !state.parent_exists(parent) {
            return Err(Error::NotFound {
                entity: parent.to_string(),
            });
        }
        Ok(state
            .accounts
            .values()
            .filter(|a| a.parent == *parent)
            .cloned()
            .collect())
    }

    fn find_ou(&self, id: &OuId) -> Result<Option<OuRecord>> {
        let mut state = self.state.lock().unwrap();
        Self::take_injected(&mut state)?;
        Ok(state.ous.get(id).cloned())
    }

    fn find_account(&self, id: &AccountId) -> Result<Option<AccountRecord>> {
        let mut state = self.state.lock().unwrap();
        Self::take_injected(&mut state)?;
        Ok(state.accounts.get(id).cloned())
    }

    fn create_ou(&self, parent: &OuId, name: &str) -> Result<OuRecord> {
        let mut state = self.state.lock().unwrap();
        Self::take_injected(&mut state)?;
        if !state.parent_exists(parent) {
            return Err(Error::NotFound {
                entity: parent.to_string(),
            });
        }
        if state.sibling_named(parent, name).is_some() {
            return Err(Error::AlreadyExists {
                name: name.to_string(),
            });
        }
        let id = state.fresh_ou_id();
        let record = OuRecord {
            id: id.clone(),
            name: name.to_string(),
            parent: Some(parent.clone()),
        };
        state.ous.insert(id, record.clone());
        state
            .mutations
            .push(format!("create_ou {} {}", parent, name));
        Ok(record)
    }

    fn rename_ou(&self, id: &OuId, name: &str) -> Result<OuRecord> {
        let mut state = self.state.lock().unwrap();
        Self::take_injected(&mut state)?;
        let parent = match state.ous.get(id) {
            Some(ou) => ou.parent.clone(),
            None => {
                return Err(Error::NotFound {
                    entity: id.to_string(),
                });
            }
        };
        if let Some(ref parent) = parent
            && let Some(sibling) = state.sibling_named(parent, name)
            && sibling.id != *id
        {
            return Err(Error::AlreadyExists {
                name: name.to_string(),
            });
        }
        let record = match state.ous.get_mut(id) {
            Some(record) => {
                record.name = name.to_string();
                record.clone()
            }
            None => {
                return Err(Error::NotFound {
                    entity: id.to_string(),
                });
            }
        };
        state.mutations.push(format!("rename_ou {} {}", id, name));
        Ok(record)
    }

    fn move_account(&self, account: &AccountId, from: &OuId, to: &OuId) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        Self::take_injected(&mut state)?;
        if !state.parent_exists(to) {
            return Err(Error::NotFound {
                entity: to.to_string(),
            });
        }
        let current = match state.accounts.get(account) {
            Some(a) => a.parent.clone(),
            None => {
                return Err(Error::NotFound {
                    entity: account.to_string(),
                });
            }
        };
        if current != *from {
            return Err(Error::Conflict {
                message: format!(
                    "account {} is under {}, not {}",
                    account, current, from
                ),
            });
        }
        if let Some(record) = state.accounts.get_mut(account) {
            record.parent = to.clone();
        }
        state
            .mutations
            .push(format!("move_account {} {} {}", account, from, to));
        Ok(())
    }

    fn delete_ou(&self, id: &OuId) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        Self::take_injected(&mut state)?;
        if !state.ous.contains_key(id) {
            return Err(Error::NotFound {
                entity: id.to_string(),
            });
        }
        let has_children = state.ous.values().any(|ou| ou.parent.as_ref() == Some(id));
        let has_accounts = state.accounts.values().any(|a| a.parent == *id);
        if has_children || has_accounts {
            return Err(Error::NotEmpty {
                entity: id.to_string(),
            });
        }
        state.ous.remove(id);
        state.mutations.push(format!("delete_ou {}", id));
        Ok(())
    }
}
