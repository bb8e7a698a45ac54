//! Plan executor: applies an edit script against the directory.
//!
//! Steps run strictly in sequence-index order. Every step re-reads the
//! directory immediately before acting, so a step whose postcondition
//! already holds is a no-op success - correctness comes from idempotent
//! calls, not transactions. Transient failures retry with exponential
//! backoff; permanent failures mark the step failed and execution continues
//! with independent steps, while steps depending on a failed effect are
//! skipped with reason `upstream-failed`.
//!
//! A dry run performs all the reads and produces a report with the same
//! step count and order, but issues no mutating call; actionable steps
//! remain pending. Cancellation is honored between steps, never mid-step.

use crate::error::Result;
use crate::path::OuPath;
use crate::plan::{
    EditStep, ExecutionReport, Plan, PlannedStep, SKIP_UPSTREAM_FAILED, StepStatus,
};
use crate::topology::Topology;
use orgkit::retry::{LogCallback, with_retry};
use orgkit::{AccountId, Directory, ErrorCategory, OuId, RetryConfig};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Cooperative cancellation handle, checked before each step.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Create a fresh, uncancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; the executor stops before the next step.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Options for execution.
#[derive(Debug, Clone, Default)]
pub struct ExecuteOptions {
    /// Don't mutate anything, just report what would happen
    pub dry_run: bool,
    /// Retry policy for individual directory calls
    pub retry: RetryConfig,
    /// Cancellation handle, checked between steps
    pub cancel: CancelToken,
}

/// Progress callback for execution.
pub trait ProgressCallback {
    /// Called before a step is attempted.
    fn on_step_start(&mut self, step: &PlannedStep);

    /// Called once a step has a terminal status.
    fn on_step_complete(&mut self, step: &PlannedStep);
}

/// No-op progress callback.
pub struct NoProgress;

impl ProgressCallback for NoProgress {
    fn on_step_start(&mut self, _step: &PlannedStep) {}
    fn on_step_complete(&mut self, _step: &PlannedStep) {}
}

/// Existence and identifier tracking for one OU path.
///
/// `Virtual` marks a path a dry run would have created; it exists for
/// dependency purposes but has no identifier to call the service with.
#[derive(Debug, Clone)]
enum Slot {
    Real(OuId),
    Virtual,
}

struct Tracker {
    slots: BTreeMap<OuPath, Slot>,
    existing: BTreeSet<OuPath>,
    placements: BTreeMap<AccountId, OuPath>,
}

impl Tracker {
    fn seed(live: &Topology, root_id: OuId) -> Self {
        let mut slots = BTreeMap::new();
        slots.insert(OuPath::root(), Slot::Real(root_id));
        let mut existing = BTreeSet::new();
        for (path, node) in live.ou_paths() {
            if let Some(id) = &live.node(node).id {
                slots.insert(path.clone(), Slot::Real(id.clone()));
                existing.insert(path.clone());
            }
        }
        let placements = live
            .accounts()
            .map(|account| (account.id.clone(), live.path_of(account.parent).clone()))
            .collect();
        Self {
            slots,
            existing,
            placements,
        }
    }

    fn add(&mut self, path: &OuPath, slot: Slot) {
        self.slots.insert(path.clone(), slot);
        self.existing.insert(path.clone());
    }

    fn remove(&mut self, path: &OuPath) {
        self.existing.remove(path);
    }

    /// Anything still tracked inside the subtree rooted at `path`?
    fn subtree_occupied(&self, path: &OuPath) -> bool {
        let child_alive = self
            .existing
            .iter()
            .any(|p| p != path && p.starts_with(path));
        let account_present = self.placements.values().any(|p| p.starts_with(path));
        child_alive || account_present
    }

    /// Shift every tracked path under `old` to sit under `new` instead.
    fn rebase(&mut self, old: &OuPath, new: &OuPath) {
        let rebase_one = |path: &OuPath| {
            let mut out = new.clone();
            for segment in &path.segments()[old.depth()..] {
                out = out.child(segment);
            }
            out
        };
        let affected: Vec<OuPath> = self
            .slots
            .keys()
            .filter(|p| p.starts_with(old))
            .cloned()
            .collect();
        for key in affected {
            if let Some(slot) = self.slots.remove(&key) {
                self.slots.insert(rebase_one(&key), slot);
            }
            if self.existing.remove(&key) {
                self.existing.insert(rebase_one(&key));
            }
        }
        for placement in self.placements.values_mut() {
            if placement.starts_with(old) {
                *placement = rebase_one(placement);
            }
        }
    }
}

/// Execute a plan against the directory.
///
/// `live` is the topology the plan was guarded against; it seeds the
/// path-to-identifier map. Returns an [`ExecutionReport`] enumerating every
/// planned step with a terminal status. Only a failure to resolve the
/// organization root aborts the run as a whole.
pub fn execute(
    plan: &Plan,
    dir: &dyn Directory,
    live: &Topology,
    opts: &ExecuteOptions,
    progress: &mut dyn ProgressCallback,
) -> Result<ExecutionReport> {
    // The live topology normally knows the root; only ask the directory
    // when it does not
    let root_id = match live.root_ou_id() {
        Some(id) => id.clone(),
        None => with_retry(&opts.retry, Some(&LogCallback), || dir.root())?,
    };
    let mut tracker = Tracker::seed(live, root_id);

    let mut report = ExecutionReport {
        steps: Vec::with_capacity(plan.steps.len()),
        dry_run: opts.dry_run,
        cancelled: false,
    };

    for (i, planned) in plan.steps.iter().enumerate() {
        if opts.cancel.is_cancelled() {
            log::info!("execution cancelled before step #{}", planned.index);
            report.cancelled = true;
            report.steps.extend(plan.steps[i..].iter().cloned());
            break;
        }

        progress.on_step_start(planned);

        let status = if planned.status.is_blocked() {
            // Never executed; annotated by the safety guard
            planned.status.clone()
        } else {
            apply_step(&planned.step, dir, opts, &mut tracker)
        };

        let done = PlannedStep {
            index: planned.index,
            step: planned.step.clone(),
            status,
        };
        progress.on_step_complete(&done);
        report.steps.push(done);
    }

    Ok(report)
}

/// Execute without progress callbacks.
pub fn execute_simple(
    plan: &Plan,
    dir: &dyn Directory,
    live: &Topology,
    opts: &ExecuteOptions,
) -> Result<ExecutionReport> {
    execute(plan, dir, live, opts, &mut NoProgress)
}

fn apply_step(
    step: &EditStep,
    dir: &dyn Directory,
    opts: &ExecuteOptions,
    tracker: &mut Tracker,
) -> StepStatus {
    match step {
        EditStep::CreateOu { path } => create_ou(path, dir, opts, tracker),
        EditStep::MoveAccount { account, to, .. } => move_account(account, to, dir, opts, tracker),
        EditStep::RenameOu { path, new_name } => rename_ou(path, new_name, dir, opts, tracker),
        EditStep::DeleteOu { path } => delete_ou(path, dir, opts, tracker),
    }
}

fn upstream_failed() -> StepStatus {
    StepStatus::Skipped {
        reason: SKIP_UPSTREAM_FAILED.to_string(),
    }
}

fn create_ou(
    path: &OuPath,
    dir: &dyn Directory,
    opts: &ExecuteOptions,
    tracker: &mut Tracker,
) -> StepStatus {
    let (Some(parent), Some(name)) = (path.parent(), path.name()) else {
        return StepStatus::Failed {
            error: "cannot create the organization root".to_string(),
        };
    };
    match tracker.slots.get(&parent).cloned() {
        None => upstream_failed(),
        Some(Slot::Virtual) => {
            // Parent only exists virtually, so this is a dry run deeper in
            // the same new subtree
            tracker.add(path, Slot::Virtual);
            StepStatus::Pending
        }
        Some(Slot::Real(parent_id)) => {
            let found = with_retry(&opts.retry, Some(&LogCallback), || {
                dir.child_named(&parent_id, name)
            });
            match found {
                Err(e) => StepStatus::Failed {
                    error: e.to_string(),
                },
                Ok(Some(record)) => {
                    tracker.add(path, Slot::Real(record.id));
                    StepStatus::SkippedIdempotent
                }
                Ok(None) if opts.dry_run => {
                    tracker.add(path, Slot::Virtual);
                    StepStatus::Pending
                }
                Ok(None) => {
                    let created = with_retry(&opts.retry, Some(&LogCallback), || {
                        dir.create_ou(&parent_id, name)
                    });
                    match created {
                        Ok(record) => {
                            tracker.add(path, Slot::Real(record.id));
                            StepStatus::Applied
                        }
                        Err(e) if e.category() == ErrorCategory::AlreadyExists => {
                            // Lost a race; adopt the winner
                            match dir.child_named(&parent_id, name) {
                                Ok(Some(record)) => {
                                    tracker.add(path, Slot::Real(record.id));
                                    StepStatus::SkippedIdempotent
                                }
                                _ => StepStatus::Failed {
                                    error: e.to_string(),
                                },
                            }
                        }
                        Err(e) => StepStatus::Failed {
                            error: e.to_string(),
                        },
                    }
                }
            }
        }
    }
}

fn move_account(
    account: &AccountId,
    to: &OuPath,
    dir: &dyn Directory,
    opts: &ExecuteOptions,
    tracker: &mut Tracker,
) -> StepStatus {
    let target = match tracker.slots.get(to).cloned() {
        None => return upstream_failed(),
        Some(target) => target,
    };
    let found = with_retry(&opts.retry, Some(&LogCallback), || {
        dir.find_account(account)
    });
    let record = match found {
        Err(e) => {
            return StepStatus::Failed {
                error: e.to_string(),
            };
        }
        Ok(None) => {
            return StepStatus::Failed {
                error: format!("account {account} not found"),
            };
        }
        Ok(Some(record)) => record,
    };
    match target {
        Slot::Virtual => {
            if opts.dry_run {
                tracker.placements.insert(account.clone(), to.clone());
                StepStatus::Pending
            } else {
                // Target was never really created
                upstream_failed()
            }
        }
        Slot::Real(target_id) => {
            if record.parent == target_id {
                tracker.placements.insert(account.clone(), to.clone());
                return StepStatus::SkippedIdempotent;
            }
            if opts.dry_run {
                tracker.placements.insert(account.clone(), to.clone());
                return StepStatus::Pending;
            }
            // Move from the account's actual current parent; the plan's
            // `from` may predate outside drift
            let moved = with_retry(&opts.retry, Some(&LogCallback), || {
                dir.move_account(account, &record.parent, &target_id)
            });
            match moved {
                Ok(()) => {
                    tracker.placements.insert(account.clone(), to.clone());
                    StepStatus::Applied
                }
                Err(e) => StepStatus::Failed {
                    error: e.to_string(),
                },
            }
        }
    }
}

fn rename_ou(
    path: &OuPath,
    new_name: &str,
    dir: &dyn Directory,
    opts: &ExecuteOptions,
    tracker: &mut Tracker,
) -> StepStatus {
    let Some(parent) = path.parent() else {
        return StepStatus::Failed {
            error: "cannot rename the organization root".to_string(),
        };
    };
    let renamed = parent.child(new_name);
    match tracker.slots.get(path).cloned() {
        None => {
            if tracker.existing.contains(&renamed) {
                StepStatus::SkippedIdempotent
            } else {
                upstream_failed()
            }
        }
        Some(Slot::Virtual) => {
            tracker.rebase(path, &renamed);
            StepStatus::Pending
        }
        Some(Slot::Real(id)) => {
            let found = with_retry(&opts.retry, Some(&LogCallback), || dir.find_ou(&id));
            match found {
                Err(e) => StepStatus::Failed {
                    error: e.to_string(),
                },
                Ok(None) => StepStatus::Failed {
                    error: format!("OU {path} no longer exists"),
                },
                Ok(Some(record)) if record.name == new_name => {
                    tracker.rebase(path, &renamed);
                    StepStatus::SkippedIdempotent
                }
                Ok(Some(_)) if opts.dry_run => {
                    tracker.rebase(path, &renamed);
                    StepStatus::Pending
                }
                Ok(Some(_)) => {
                    let result = with_retry(&opts.retry, Some(&LogCallback), || {
                        dir.rename_ou(&id, new_name)
                    });
                    match result {
                        Ok(_) => {
                            tracker.rebase(path, &renamed);
                            StepStatus::Applied
                        }
                        Err(e) => StepStatus::Failed {
                            error: e.to_string(),
                        },
                    }
                }
            }
        }
    }
}

fn delete_ou(
    path: &OuPath,
    dir: &dyn Directory,
    opts: &ExecuteOptions,
    tracker: &mut Tracker,
) -> StepStatus {
    if !tracker.existing.contains(path) {
        return StepStatus::SkippedIdempotent;
    }
    // Whatever is left in the subtree at this point means an earlier step
    // meant to empty it did not take effect
    if tracker.subtree_occupied(path) {
        return upstream_failed();
    }
    match tracker.slots.get(path).cloned() {
        None | Some(Slot::Virtual) => {
            tracker.remove(path);
            StepStatus::Pending
        }
        Some(Slot::Real(id)) => {
            let found = with_retry(&opts.retry, Some(&LogCallback), || dir.find_ou(&id));
            match found {
                Err(e) => StepStatus::Failed {
                    error: e.to_string(),
                },
                Ok(None) => {
                    tracker.remove(path);
                    StepStatus::SkippedIdempotent
                }
                Ok(Some(_)) if opts.dry_run => {
                    tracker.remove(path);
                    StepStatus::Pending
                }
                Ok(Some(_)) => {
                    let result =
                        with_retry(&opts.retry, Some(&LogCallback), || dir.delete_ou(&id));
                    match result {
                        Ok(()) => {
                            tracker.remove(path);
                            StepStatus::Applied
                        }
                        Err(e) if e.category() == ErrorCategory::NotFound => {
                            tracker.remove(path);
                            StepStatus::SkippedIdempotent
                        }
                        Err(e) => StepStatus::Failed {
                            error: e.to_string(),
                        },
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::desired;
    use crate::diff::diff;
    use crate::guard::{self, GuardOptions};
    use crate::live::{self, ReadOptions};
    use orgkit::{AccountStatus, Error, MemoryDirectory};
    use std::time::Duration;

    fn fast_opts() -> ExecuteOptions {
        ExecuteOptions {
            dry_run: false,
            retry: RetryConfig {
                max_attempts: 3,
                base_delay: Duration::from_millis(1),
                backoff_factor: 1.0,
                max_delay: Duration::from_millis(5),
            },
            cancel: CancelToken::new(),
        }
    }

    fn read_live(dir: &MemoryDirectory) -> Topology {
        live::read(dir, &ReadOptions::default()).unwrap()
    }

    fn pending_plan(steps: Vec<EditStep>) -> Plan {
        Plan {
            steps: steps
                .into_iter()
                .enumerate()
                .map(|(index, step)| PlannedStep {
                    index,
                    step,
                    status: StepStatus::Pending,
                })
                .collect(),
            unresolved: vec![],
            missing: vec![],
        }
    }

    fn campps_fixture() -> MemoryDirectory {
        let dir = MemoryDirectory::new();
        let root = dir.root().unwrap();
        let campps = dir.seed_ou(&root, "CAMPPS");
        let workloads = dir.seed_ou(&campps, "workloads");
        let production = dir.seed_ou(&workloads, "PRODUCTION");
        dir.seed_account(
            &production,
            "111111111111",
            "campps-prod",
            "aws+campps-prod@example.com",
            AccountStatus::Active,
        );
        dir
    }

    const CAMPPS_DESIRED: &str = r#"
        [[ou]]
        path = "Apps/CAMPPS/Production"

        [[account]]
        id = "111111111111"
        parent = "Apps/CAMPPS/Production"
    "#;

    #[test]
    fn test_apply_converges_and_replay_is_idempotent() {
        let dir = campps_fixture();
        let live_topo = read_live(&dir);
        let desired_topo = desired::parse(CAMPPS_DESIRED).unwrap();
        let plan = diff(&live_topo, &desired_topo);

        let report = execute_simple(&plan, &dir, &live_topo, &fast_opts()).unwrap();
        assert!(report.is_success());
        assert!(!report.cancelled);
        assert_eq!(report.steps.len(), plan.len());
        assert!(
            report
                .steps
                .iter()
                .all(|s| s.status == StepStatus::Applied)
        );

        // Convergence: re-diffing against the new live state is empty
        let new_live = read_live(&dir);
        let replan = diff(&new_live, &desired_topo);
        assert!(replan.is_empty(), "expected convergence, got {replan:?}");

        // Replaying the original plan is all no-op successes, never failures
        let replay = execute_simple(&plan, &dir, &new_live, &fast_opts()).unwrap();
        assert!(
            replay
                .steps
                .iter()
                .all(|s| s.status == StepStatus::SkippedIdempotent),
            "{replay:?}"
        );
    }

    #[test]
    fn test_dry_run_mutates_nothing_and_matches_shape() {
        let dir = campps_fixture();
        let live_topo = read_live(&dir);
        let desired_topo = desired::parse(CAMPPS_DESIRED).unwrap();
        let plan = diff(&live_topo, &desired_topo);

        let opts = ExecuteOptions {
            dry_run: true,
            ..fast_opts()
        };
        let report = execute_simple(&plan, &dir, &live_topo, &opts).unwrap();

        assert!(report.dry_run);
        assert!(dir.mutations().is_empty(), "dry run must not mutate");
        assert_eq!(report.steps.len(), plan.len());
        for (planned, reported) in plan.steps.iter().zip(&report.steps) {
            assert_eq!(planned.step, reported.step);
            assert_eq!(reported.status, StepStatus::Pending);
        }
    }

    #[test]
    fn test_blocked_step_is_never_called() {
        let dir = MemoryDirectory::new();
        let root = dir.root().unwrap();
        let old = dir.seed_ou(&root, "Suspended");
        dir.seed_ou(&root, "Graveyard");
        dir.seed_account(
            &old,
            "222222222222",
            "legacy",
            "aws+legacy@example.com",
            AccountStatus::Suspended,
        );
        let live_topo = read_live(&dir);
        let desired_topo = desired::parse(
            r#"
            [[ou]]
            path = "Suspended"

            [[ou]]
            path = "Graveyard"

            [[account]]
            id = "222222222222"
            parent = "Graveyard"
            "#,
        )
        .unwrap();
        let plan = diff(&live_topo, &desired_topo);
        let plan = guard::annotate(plan, &live_topo, &GuardOptions::default());

        let report = execute_simple(&plan, &dir, &live_topo, &fast_opts()).unwrap();

        assert!(report.steps[0].status.is_blocked());
        assert!(
            dir.mutations().iter().all(|m| !m.starts_with("move_account")),
            "blocked move must not reach the directory"
        );
    }

    #[test]
    fn test_missing_parent_skips_dependents() {
        let dir = MemoryDirectory::new();
        let root = dir.root().unwrap();
        let apps = dir.seed_ou(&root, "Apps");
        dir.seed_account(
            &apps,
            "111111111111",
            "app",
            "aws+app@example.com",
            AccountStatus::Active,
        );
        let live_topo = read_live(&dir);

        // Handcrafted plan whose first step's parent is never created
        let plan = pending_plan(vec![
            EditStep::CreateOu {
                path: OuPath::parse("Ghost/Child").unwrap(),
            },
            EditStep::MoveAccount {
                account: AccountId::new("111111111111"),
                from: OuPath::parse("Apps").unwrap(),
                to: OuPath::parse("Ghost/Child").unwrap(),
            },
        ]);

        let report = execute_simple(&plan, &dir, &live_topo, &fast_opts()).unwrap();
        assert_eq!(report.steps[0].status, upstream_failed());
        assert_eq!(report.steps[1].status, upstream_failed());
        assert!(dir.mutations().is_empty());
    }

    #[test]
    fn test_failed_create_poisons_descendants_only() {
        let dir = MemoryDirectory::new();
        let root = dir.root().unwrap();
        dir.seed_ou(&root, "Untouched");
        let live_topo = read_live(&dir);

        let plan = pending_plan(vec![
            EditStep::CreateOu {
                path: OuPath::parse("Apps").unwrap(),
            },
            EditStep::CreateOu {
                path: OuPath::parse("Apps/CAMPPS").unwrap(),
            },
            EditStep::CreateOu {
                path: OuPath::parse("Media").unwrap(),
            },
        ]);

        // Permanent failure on the first step's existence read
        dir.inject_failure(Error::Permission {
            message: "denied".into(),
        });

        let report = execute_simple(&plan, &dir, &live_topo, &fast_opts()).unwrap();
        assert!(matches!(report.steps[0].status, StepStatus::Failed { .. }));
        assert_eq!(report.steps[1].status, upstream_failed());
        // The independent sibling still applies
        assert_eq!(report.steps[2].status, StepStatus::Applied);
    }

    #[test]
    fn test_transient_failures_are_retried() {
        let dir = MemoryDirectory::new();
        let _ = dir.root().unwrap();
        let live_topo = read_live(&dir);

        let plan = pending_plan(vec![EditStep::CreateOu {
            path: OuPath::parse("Apps").unwrap(),
        }]);

        dir.inject_failure(Error::RateLimited {
            message: "throttled".into(),
        });

        let report = execute_simple(&plan, &dir, &live_topo, &fast_opts()).unwrap();
        assert_eq!(report.steps[0].status, StepStatus::Applied);
    }

    #[test]
    fn test_cancellation_between_steps() {
        let dir = campps_fixture();
        let live_topo = read_live(&dir);
        let desired_topo = desired::parse(CAMPPS_DESIRED).unwrap();
        let plan = diff(&live_topo, &desired_topo);

        let opts = fast_opts();
        opts.cancel.cancel();
        let report = execute_simple(&plan, &dir, &live_topo, &opts).unwrap();

        assert!(report.cancelled);
        assert_eq!(report.steps.len(), plan.len());
        assert!(
            report
                .steps
                .iter()
                .all(|s| s.status == StepStatus::Pending)
        );
        assert!(dir.mutations().is_empty());
    }

    #[test]
    fn test_cancel_after_first_step() {
        struct CancelAfterFirst(CancelToken);
        impl ProgressCallback for CancelAfterFirst {
            fn on_step_start(&mut self, _step: &PlannedStep) {}
            fn on_step_complete(&mut self, _step: &PlannedStep) {
                self.0.cancel();
            }
        }

        let dir = campps_fixture();
        let live_topo = read_live(&dir);
        let desired_topo = desired::parse(CAMPPS_DESIRED).unwrap();
        let plan = diff(&live_topo, &desired_topo);

        let opts = fast_opts();
        let mut progress = CancelAfterFirst(opts.cancel.clone());
        let report = execute(&plan, &dir, &live_topo, &opts, &mut progress).unwrap();

        assert!(report.cancelled);
        assert_eq!(report.steps.len(), plan.len());
        assert_eq!(report.steps[0].status, StepStatus::Applied);
        assert!(
            report.steps[1..]
                .iter()
                .all(|s| s.status == StepStatus::Pending)
        );
    }

    #[test]
    fn test_manual_rename_step() {
        let dir = MemoryDirectory::new();
        let root = dir.root().unwrap();
        dir.seed_ou(&root, "Apps");
        let live_topo = read_live(&dir);

        let plan = pending_plan(vec![EditStep::RenameOu {
            path: OuPath::parse("Apps").unwrap(),
            new_name: "Platform".to_string(),
        }]);

        let report = execute_simple(&plan, &dir, &live_topo, &fast_opts()).unwrap();
        assert_eq!(report.steps[0].status, StepStatus::Applied);
        let renamed = dir.list_ous(&root).unwrap();
        assert_eq!(renamed[0].name, "Platform");

        // Replaying against the refreshed live state is a no-op
        let refreshed = read_live(&dir);
        let replay = execute_simple(&plan, &dir, &refreshed, &fast_opts()).unwrap();
        assert_eq!(replay.steps[0].status, StepStatus::SkippedIdempotent);
    }

    #[test]
    fn test_root_resolution_failure_aborts() {
        // A topology with no root id forces the executor to ask the
        // directory; a permanent failure there aborts the whole run
        let dir = MemoryDirectory::new();
        let rootless = Topology::new(None);
        let plan = pending_plan(vec![EditStep::CreateOu {
            path: OuPath::parse("Apps").unwrap(),
        }]);

        dir.inject_failure(Error::Permission {
            message: "denied".into(),
        });
        assert!(execute_simple(&plan, &dir, &rootless, &fast_opts()).is_err());
    }
}
