//! `orgsync apply` - run one full reconciliation cycle
//!
//! Holds the cycle lease across read, diff, guard, and execute so no two
//! cycles can interleave mutations against the same organization.

use crate::cli::ApplyArgs;
use crate::{config, ui};
use anyhow::{Context, Result, bail};
use dialoguer::Confirm;
use orgkit::SnapshotDirectory;
use reconcile::executor::{self, ExecuteOptions};
use reconcile::live::ReadOptions;
use reconcile::{CycleLock, GuardOptions, desired, diff, guard, live};

pub fn run(args: &ApplyArgs) -> Result<()> {
    let lease_path = config::lease_path()?;
    let _lease = CycleLock::acquire(&lease_path)
        .with_context(|| "could not start a reconciliation cycle")?;

    let snapshot_path = config::live_snapshot_path(args.target.live.as_deref())?;
    let dir = SnapshotDirectory::open(&snapshot_path)
        .with_context(|| format!("could not open live snapshot {}", snapshot_path.display()))?;

    let live_topology = live::read(&dir, &ReadOptions::default())?;
    let desired_path = config::desired_path(args.target.desired.as_deref())?;
    let desired_topology = desired::load(&desired_path)?;

    let plan = diff::diff(&live_topology, &desired_topology);
    let plan = guard::annotate(
        plan,
        &live_topology,
        &GuardOptions {
            resolve_suspensions: args.resolve_suspensions,
        },
    );

    ui::display_plan(&plan);
    if plan.is_empty() {
        return Ok(());
    }

    if !args.dry_run && !args.yes {
        let confirmed = Confirm::new()
            .with_prompt(format!("Apply {} change(s)?", plan.len()))
            .default(false)
            .interact()?;
        if !confirmed {
            println!("Aborted.");
            return Ok(());
        }
    }

    let opts = ExecuteOptions {
        dry_run: args.dry_run,
        ..Default::default()
    };
    let report = executor::execute(&plan, &dir, &live_topology, &opts, &mut ui::PrintProgress)?;
    ui::display_report(&report);

    let summary = report.summary();
    if summary.failed > 0 {
        bail!("{} step(s) failed; re-run `orgsync plan` after resolving", summary.failed);
    }
    Ok(())
}
