//! # reconcile
//!
//! Declarative reconciliation of an organization's account/OU topology.
//!
//! Declare the tree you want; read the tree you have; converge.
//!
//! ## Core Concepts
//!
//! - **Topology**: the full tree of OUs and account placements at a point
//!   in time. Two instances exist per cycle: *live* (read from the
//!   directory) and *desired* (loaded from configuration).
//! - **Plan**: the ordered, idempotent edit script the diff engine derives
//!   from the two - creates first (parents before children), then account
//!   moves, then deletes (children before parents).
//! - **Safety guard**: annotates a plan against a re-fetched live snapshot,
//!   blocking steps that would strand accounts, move suspended accounts,
//!   or act on state that no longer exists.
//! - **Executor**: applies unblocked steps in order with per-step fresh
//!   reads, retry with backoff, and a dry-run mode.
//!
//! ## Example
//!
//! ```
//! use orgkit::{AccountStatus, Directory, MemoryDirectory};
//! use reconcile::executor::{self, ExecuteOptions};
//! use reconcile::live::ReadOptions;
//! use reconcile::{desired, diff, guard, live};
//!
//! let dir = MemoryDirectory::new();
//! let root = dir.root()?;
//! let old = dir.seed_ou(&root, "Workloads");
//! dir.seed_account(&old, "111111111111", "app", "app@example.com", AccountStatus::Active);
//!
//! let live_topology = live::read(&dir, &ReadOptions::default())?;
//! let desired_topology = desired::parse(
//!     r#"
//!     [[ou]]
//!     path = "Apps/Production"
//!
//!     [[account]]
//!     id = "111111111111"
//!     parent = "Apps/Production"
//!     "#,
//! )?;
//!
//! let plan = diff::diff(&live_topology, &desired_topology);
//! let plan = guard::annotate(plan, &live_topology, &Default::default());
//! let report = executor::execute_simple(&plan, &dir, &live_topology, &ExecuteOptions::default())?;
//! assert!(report.is_success());
//! # Ok::<(), reconcile::Error>(())
//! ```
//!
//! One logical cycle runs at a time: hold a [`lease::CycleLock`] across
//! read, diff, guard, and execute.

pub mod desired;
pub mod diff;
pub mod error;
pub mod executor;
pub mod guard;
pub mod lease;
pub mod live;
pub mod path;
pub mod plan;
pub mod topology;

// Re-export main types at crate root
pub use error::{Error, ParseError, Result, ValidationError};
pub use executor::{CancelToken, ExecuteOptions, NoProgress, ProgressCallback};
pub use guard::{GuardOptions, Preflight};
pub use lease::CycleLock;
pub use path::OuPath;
pub use plan::{
    BlockReason, EditStep, ExecuteSummary, ExecutionReport, Plan, PlanSummary, PlannedStep,
    StepStatus, UnresolvedOu,
};
pub use topology::{Account, NodeId, OuNode, Topology};
