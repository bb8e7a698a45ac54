//! Safety guard: pre-flight checks that veto or annotate a plan.
//!
//! The guard inspects a plan against a *re-fetched* live topology, so drift
//! between diff time and execution time is caught here. Blocked steps are
//! never executed; the executor treats them like skips for dependency
//! purposes but reports them distinctly.
//!
//! A step whose postcondition already holds is left alone - the executor
//! will skip it idempotently - so re-annotating a fully applied plan blocks
//! nothing.

use crate::path::OuPath;
use crate::plan::{BlockReason, EditStep, Plan, StepStatus};
use crate::topology::Topology;
use orgkit::AccountId;
use std::collections::{BTreeMap, BTreeSet};

/// Options for a guard pass.
#[derive(Debug, Clone, Default)]
pub struct GuardOptions {
    /// Allow moving suspended accounts (a "resolve-suspension" run)
    pub resolve_suspensions: bool,
}

/// Annotate a plan against a freshly read live topology.
pub fn annotate(mut plan: Plan, live: &Topology, opts: &GuardOptions) -> Plan {
    let live_paths: BTreeSet<OuPath> = live.ou_paths().map(|(path, _)| path.clone()).collect();

    // Paths the plan itself brings into existence. Whether those creates
    // succeed is the executor's dependency problem, not a staleness one.
    let planned_creates: BTreeSet<OuPath> = plan
        .steps
        .iter()
        .filter_map(|planned| match &planned.step {
            EditStep::CreateOu { path } => Some(path.clone()),
            _ => None,
        })
        .collect();
    let planned_deletes: BTreeSet<OuPath> = plan
        .steps
        .iter()
        .filter_map(|planned| match &planned.step {
            EditStep::DeleteOu { path } => Some(path.clone()),
            _ => None,
        })
        .collect();

    let path_known =
        |path: &OuPath| path.is_root() || live_paths.contains(path) || planned_creates.contains(path);

    // Account placements per current live state; earlier unblocked moves
    // are applied virtually so a delete sees the tree those moves leave
    // behind.
    let mut placements: BTreeMap<AccountId, OuPath> = live
        .accounts()
        .map(|account| (account.id.clone(), live.path_of(account.parent).clone()))
        .collect();

    for planned in &mut plan.steps {
        if planned.status != StepStatus::Pending {
            continue;
        }
        let blocked = match &planned.step {
            EditStep::CreateOu { path } => {
                if live_paths.contains(path) {
                    None // already exists; executor skips idempotently
                } else if path.parent().is_some_and(|parent| !path_known(&parent)) {
                    Some(BlockReason::StalePlan)
                } else {
                    None
                }
            }
            EditStep::MoveAccount { account, to, .. } => match live.account(account) {
                None => Some(BlockReason::StalePlan),
                Some(live_account) => {
                    if live.path_of(live_account.parent) == to {
                        None // already at the target
                    } else if live_account.status.is_suspended() && !opts.resolve_suspensions {
                        Some(BlockReason::SuspendedAccount)
                    } else if !path_known(to) {
                        Some(BlockReason::StalePlan)
                    } else {
                        placements.insert(account.clone(), to.clone());
                        None
                    }
                }
            },
            EditStep::RenameOu { path, new_name } => {
                let renamed = path
                    .parent()
                    .map_or_else(|| OuPath::root().child(new_name), |p| p.child(new_name));
                if live_paths.contains(&renamed) {
                    None // already renamed
                } else if !path_known(path) {
                    Some(BlockReason::StalePlan)
                } else {
                    None
                }
            }
            EditStep::DeleteOu { path } => {
                if !live_paths.contains(path) {
                    None // already gone; executor skips idempotently
                } else {
                    let child_survives = live_paths.iter().any(|p| {
                        p != path && p.starts_with(path) && !planned_deletes.contains(p)
                    });
                    let account_remains = placements.values().any(|p| p.starts_with(path));
                    if child_survives || account_remains {
                        Some(BlockReason::NonEmptyOu)
                    } else {
                        None
                    }
                }
            }
        };
        if let Some(reason) = blocked {
            log::warn!("guard blocked step #{}: {} ({})", planned.index, planned.step, reason);
            planned.status = StepStatus::Blocked { reason };
        }
    }

    plan
}

/// Pre-flight account reconciliation between live and desired populations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preflight {
    pub live_accounts: usize,
    pub desired_accounts: usize,
    /// Suspended live accounts whose desired placement differs
    pub suspended_moves: Vec<AccountId>,
    /// Declared in desired, absent from live
    pub missing: Vec<AccountId>,
    /// Present in live, not placed by desired
    pub unmanaged: Vec<AccountId>,
}

impl Preflight {
    /// Whether nothing requires attention before executing.
    pub fn is_clean(&self) -> bool {
        self.suspended_moves.is_empty() && self.missing.is_empty()
    }
}

/// Reconcile the live and desired account populations.
pub fn preflight(live: &Topology, desired: &Topology) -> Preflight {
    let mut report = Preflight {
        live_accounts: live.account_count(),
        desired_accounts: desired.account_count(),
        ..Default::default()
    };

    for account in desired.accounts() {
        match live.account(&account.id) {
            None => report.missing.push(account.id.clone()),
            Some(live_account) => {
                let placement_differs =
                    live.path_of(live_account.parent) != desired.path_of(account.parent);
                if placement_differs && live_account.status.is_suspended() {
                    report.suspended_moves.push(account.id.clone());
                }
            }
        }
    }
    for account in live.accounts() {
        if desired.account(&account.id).is_none() {
            report.unmanaged.push(account.id.clone());
        }
    }

    report
}
