//! Plan vocabulary: edit steps, statuses, plans, and execution reports.

use crate::path::OuPath;
use orgkit::AccountId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Skip reason used when an upstream step did not take effect.
pub const SKIP_UPSTREAM_FAILED: &str = "upstream-failed";

/// A single mutation against the directory.
///
/// A closed sum type: the executor dispatches by exhaustive match, so a new
/// step kind cannot be added without handling it everywhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EditStep {
    /// Create the OU at `path`; its parent is `path.parent()`
    CreateOu { path: OuPath },
    /// Move an account between OU paths
    MoveAccount {
        account: AccountId,
        from: OuPath,
        to: OuPath,
    },
    /// Rename the OU at `path` to `new_name`
    RenameOu { path: OuPath, new_name: String },
    /// Delete the OU at `path`; only legal once it holds nothing
    DeleteOu { path: OuPath },
}

impl fmt::Display for EditStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditStep::CreateOu { path } => write!(f, "create OU {path}"),
            EditStep::MoveAccount { account, from, to } => {
                write!(f, "move account {account} {from} -> {to}")
            }
            EditStep::RenameOu { path, new_name } => {
                write!(f, "rename OU {path} to {new_name:?}")
            }
            EditStep::DeleteOu { path } => write!(f, "delete OU {path}"),
        }
    }
}

/// Why the safety guard refused a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockReason {
    /// Delete target still holds accounts or child OUs
    NonEmptyOu,
    /// The account to move is suspended
    SuspendedAccount,
    /// A referenced account/OU no longer exists; re-diff required
    StalePlan,
}

impl fmt::Display for BlockReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BlockReason::NonEmptyOu => "non-empty-ou",
            BlockReason::SuspendedAccount => "suspended-account",
            BlockReason::StalePlan => "stale-plan",
        };
        f.write_str(s)
    }
}

/// Execution status of a planned step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum StepStatus {
    /// Not applied yet (or would apply, in a dry run)
    Pending,
    /// Applied by the executor
    Applied,
    /// The postcondition already held; nothing was done
    SkippedIdempotent,
    /// Not attempted, e.g. because an upstream step did not take effect
    Skipped { reason: String },
    /// Refused by the safety guard; never executed
    Blocked { reason: BlockReason },
    /// The directory rejected the step
    Failed { error: String },
}

impl StepStatus {
    /// Whether the step's effect holds (applied, or already true).
    pub fn took_effect(&self) -> bool {
        matches!(self, Self::Applied | Self::SkippedIdempotent)
    }

    /// Whether the guard refused this step.
    pub fn is_blocked(&self) -> bool {
        matches!(self, Self::Blocked { .. })
    }
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepStatus::Pending => f.write_str("pending"),
            StepStatus::Applied => f.write_str("applied"),
            StepStatus::SkippedIdempotent => f.write_str("unchanged"),
            StepStatus::Skipped { reason } => write!(f, "skipped ({reason})"),
            StepStatus::Blocked { reason } => write!(f, "blocked ({reason})"),
            StepStatus::Failed { error } => write!(f, "failed: {error}"),
        }
    }
}

/// One step of a plan: the edit, its stable sequence index, and its status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedStep {
    pub index: usize,
    pub step: EditStep,
    pub status: StepStatus,
}

/// A live-only OU that cannot be deleted because its subtree still holds
/// accounts with no desired placement. Requires manual resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnresolvedOu {
    pub path: OuPath,
    /// Accounts stranding the OU, sorted
    pub stranded: Vec<AccountId>,
}

/// Ordered, idempotent edit script transforming live toward desired.
///
/// Produced once by the diff engine, optionally annotated by the safety
/// guard, then consumed by the executor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub steps: Vec<PlannedStep>,
    /// Live-only OUs left for manual resolution
    #[serde(default)]
    pub unresolved: Vec<UnresolvedOu>,
    /// Accounts declared in desired but absent from live
    #[serde(default)]
    pub missing: Vec<AccountId>,
}

impl Plan {
    /// Whether the plan contains no steps.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Per-kind step counts.
    pub fn summary(&self) -> PlanSummary {
        let mut summary = PlanSummary::default();
        for planned in &self.steps {
            match planned.step {
                EditStep::CreateOu { .. } => summary.creates += 1,
                EditStep::MoveAccount { .. } => summary.moves += 1,
                EditStep::RenameOu { .. } => summary.renames += 1,
                EditStep::DeleteOu { .. } => summary.deletes += 1,
            }
            if planned.status.is_blocked() {
                summary.blocked += 1;
            }
        }
        summary
    }
}

/// Step counts for a plan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlanSummary {
    pub creates: usize,
    pub moves: usize,
    pub renames: usize,
    pub deletes: usize,
    pub blocked: usize,
}

impl PlanSummary {
    /// Total number of steps.
    pub fn total(&self) -> usize {
        self.creates + self.moves + self.renames + self.deletes
    }

    /// Whether any change is planned.
    pub fn has_changes(&self) -> bool {
        self.total() > 0
    }
}

/// Outcome of one execution run: every planned step with a terminal status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionReport {
    pub steps: Vec<PlannedStep>,
    /// Whether this was a dry run
    pub dry_run: bool,
    /// Whether the run was cancelled between steps
    pub cancelled: bool,
}

impl ExecutionReport {
    /// Tally the step statuses.
    pub fn summary(&self) -> ExecuteSummary {
        let mut summary = ExecuteSummary::default();
        for planned in &self.steps {
            summary.add(&planned.status);
        }
        summary
    }

    /// Whether no step failed.
    pub fn is_success(&self) -> bool {
        self.summary().failed == 0
    }
}

/// Status counts for an execution run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecuteSummary {
    pub applied: usize,
    pub skipped_idempotent: usize,
    pub skipped: usize,
    pub blocked: usize,
    pub failed: usize,
    pub pending: usize,
}

impl ExecuteSummary {
    /// Add one step status to the tally.
    pub fn add(&mut self, status: &StepStatus) {
        match status {
            StepStatus::Pending => self.pending += 1,
            StepStatus::Applied => self.applied += 1,
            StepStatus::SkippedIdempotent => self.skipped_idempotent += 1,
            StepStatus::Skipped { .. } => self.skipped += 1,
            StepStatus::Blocked { .. } => self.blocked += 1,
            StepStatus::Failed { .. } => self.failed += 1,
        }
    }

    /// Total number of steps tallied.
    pub fn total(&self) -> usize {
        self.applied + self.skipped_idempotent + self.skipped + self.blocked + self.failed
            + self.pending
    }
}
