//! `orgsync status` - live vs desired summary

use crate::cli::TargetArgs;
use crate::{config, ui};
use anyhow::{Context, Result};
use orgkit::SnapshotDirectory;
use reconcile::live::ReadOptions;
use reconcile::{desired, diff, guard, live};

pub fn run(args: &TargetArgs) -> Result<()> {
    let snapshot_path = config::live_snapshot_path(args.live.as_deref())?;
    let dir = SnapshotDirectory::open(&snapshot_path)
        .with_context(|| format!("could not open live snapshot {}", snapshot_path.display()))?;

    let live_topology = live::read(&dir, &ReadOptions::default())?;
    let desired_path = config::desired_path(args.desired.as_deref())?;
    let desired_topology = desired::load(&desired_path)?;

    let preflight = guard::preflight(&live_topology, &desired_topology);
    let plan = diff::diff(&live_topology, &desired_topology);

    ui::display_status(&live_topology, &desired_topology, &preflight, &plan);
    Ok(())
}
