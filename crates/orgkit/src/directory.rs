//! Directory abstraction for account/OU operations.
//!
//! The [`Directory`] trait defines the interface to the organization's
//! account directory, allowing for different implementations (in-memory for
//! tests and simulation, snapshot files for offline planning, real cloud
//! bindings out of tree).

use crate::error::Result;
use crate::types::{AccountId, AccountRecord, OuId, OuRecord};

/// Directory trait for account/OU operations.
///
/// Every call is individually atomic on the service side and safe to retry:
/// implementations must not leave a call half-applied. Listing calls are
/// read-only; the four mutating calls (`create_ou`, `rename_ou`,
/// `move_account`, `delete_ou`) are the only ways this crate changes the
/// organization.
pub trait Directory: Send + Sync {
    /// Identifier of the organization root.
    fn root(&self) -> Result<OuId>;

    /// List the OUs directly under a parent.
    fn list_ous(&self, parent: &OuId) -> Result<Vec<OuRecord>>;

    /// List the accounts directly under a parent.
    fn list_accounts(&self, parent: &OuId) -> Result<Vec<AccountRecord>>;

    /// Look up a single OU by identifier.
    fn find_ou(&self, id: &OuId) -> Result<Option<OuRecord>>;

    /// Look up a single account by identifier.
    fn find_account(&self, id: &AccountId) -> Result<Option<AccountRecord>>;

    /// Create an OU under a parent. Fails if a sibling already carries
    /// the name.
    fn create_ou(&self, parent: &OuId, name: &str) -> Result<OuRecord>;

    /// Rename an OU. Fails on a sibling name collision.
    fn rename_ou(&self, id: &OuId, name: &str) -> Result<OuRecord>;

    /// Move an account between parents. `from` must be the account's
    /// current parent.
    fn move_account(&self, account: &AccountId, from: &OuId, to: &OuId) -> Result<()>;

    /// Delete an OU. Only legal when it has no child OUs and no accounts.
    fn delete_ou(&self, id: &OuId) -> Result<()>;

    /// Find the child OU of `parent` carrying `name`, if any.
    fn child_named(&self, parent: &OuId, name: &str) -> Result<Option<OuRecord>> {
        Ok(self.list_ous(parent)?.into_iter().find(|ou| ou.name == name))
    }
}
