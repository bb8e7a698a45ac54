//! `orgsync plan` - compute and display the reconciliation plan

use crate::cli::PlanArgs;
use crate::{config, ui};
use anyhow::{Context, Result};
use orgkit::SnapshotDirectory;
use reconcile::live::ReadOptions;
use reconcile::{GuardOptions, desired, diff, guard, live};

pub fn run(args: &PlanArgs) -> Result<()> {
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

    if args.json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        ui::display_plan(&plan);
    }
    Ok(())
}
