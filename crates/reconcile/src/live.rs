//! Live-state reader.
//!
//! Projects the current directory contents into a [`Topology`] by recursive
//! descent from the organization root. Every service call is retried with
//! exponential backoff; a read that still fails aborts the planning cycle -
//! a partially populated topology is never returned.

use crate::error::{Result, ValidationError};
use crate::topology::Topology;
use orgkit::retry::{LogCallback, with_retry};
use orgkit::{AccountRecord, Directory, OuId, OuRecord, RetryConfig};
use std::collections::{BTreeSet, VecDeque};

/// Options for a live read.
#[derive(Debug, Clone, Default)]
pub struct ReadOptions {
    /// Retry policy for individual directory calls
    pub retry: RetryConfig,
}

/// Enumerate the live organization and assemble a validated topology.
pub fn read(dir: &dyn Directory, opts: &ReadOptions) -> Result<Topology> {
    let retry = &opts.retry;
    let root = with_retry(retry, Some(&LogCallback), || dir.root())?;

    let mut ous: Vec<OuRecord> = Vec::new();
    let mut accounts: Vec<AccountRecord> = Vec::new();

    // Recursive descent; the visited set guards against a service that
    // reports cyclic parent links.
    let mut visited: BTreeSet<OuId> = BTreeSet::new();
    visited.insert(root.clone());
    let mut queue = VecDeque::from([root.clone()]);
    while let Some(parent) = queue.pop_front() {
        let children = with_retry(retry, Some(&LogCallback), || dir.list_ous(&parent))?;
        for child in children {
            if !visited.insert(child.id.clone()) {
                return Err(ValidationError::Cycle {
                    ou: format!("{} ({})", child.name, child.id),
                }
                .into());
            }
            queue.push_back(child.id.clone());
            ous.push(child);
        }
        let members = with_retry(retry, Some(&LogCallback), || dir.list_accounts(&parent))?;
        accounts.extend(members);
    }

    log::debug!(
        "live topology: {} OUs, {} accounts",
        ous.len(),
        accounts.len()
    );
    Ok(Topology::from_records(root, ous, accounts)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::OuPath;
    use orgkit::{AccountId, AccountStatus, Error, MemoryDirectory};
    use std::time::Duration;

    fn fast_options() -> ReadOptions {
        ReadOptions {
            retry: RetryConfig {
                max_attempts: 3,
                base_delay: Duration::from_millis(1),
                backoff_factor: 1.0,
                max_delay: Duration::from_millis(5),
            },
        }
    }

    #[test]
    fn test_read_projects_full_tree() {
        let dir = MemoryDirectory::new();
        let root = dir.root().unwrap();
        let apps = dir.seed_ou(&root, "Apps");
        let campps = dir.seed_ou(&apps, "CAMPPS");
        dir.seed_ou(&root, "Core");
        dir.seed_account(
            &campps,
            "111111111111",
            "campps-prod",
            "aws+campps-prod@example.com",
            AccountStatus::Active,
        );

        let topo = read(&dir, &fast_options()).unwrap();
        assert_eq!(topo.ou_count(), 3);
        assert_eq!(topo.account_count(), 1);
        assert_eq!(topo.root_ou_id(), Some(&root));

        let node = topo.lookup(&OuPath::parse("Apps/CAMPPS").unwrap()).unwrap();
        assert_eq!(topo.node(node).id, Some(campps));
        let account = topo.account(&AccountId::new("111111111111")).unwrap();
        assert_eq!(account.status, AccountStatus::Active);
        assert_eq!(topo.path_of(account.parent).to_string(), "Apps/CAMPPS");
    }

    #[test]
    fn test_transient_failures_are_retried() {
        let dir = MemoryDirectory::new();
        let root = dir.root().unwrap();
        dir.seed_ou(&root, "Apps");

        dir.inject_failure(Error::RateLimited {
            message: "throttled".into(),
        });
        dir.inject_failure(Error::Network {
            message: "reset".into(),
        });

        let topo = read(&dir, &fast_options()).unwrap();
        assert_eq!(topo.ou_count(), 1);
    }

    #[test]
    fn test_exhausted_retries_abort_the_read() {
        let dir = MemoryDirectory::new();
        for _ in 0..3 {
            dir.inject_failure(Error::Network {
                message: "down".into(),
            });
        }
        assert!(read(&dir, &fast_options()).is_err());
    }

    #[test]
    fn test_permanent_failure_aborts_immediately() {
        let dir = MemoryDirectory::new();
        dir.inject_failure(Error::Permission {
            message: "denied".into(),
        });
        assert!(read(&dir, &fast_options()).is_err());
    }
}
