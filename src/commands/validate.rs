//! `orgsync validate` - check the desired-state file without live calls

use crate::cli::ValidateArgs;
use crate::config;
use anyhow::Result;
use colored::Colorize;
use reconcile::desired;

pub fn run(args: &ValidateArgs) -> Result<()> {
    let path = config::desired_path(args.desired.as_deref())?;
    let topology = desired::load(&path)?;
    println!(
        "{} {} is valid: {} OUs, {} accounts",
        "✓".green(),
        path.display(),
        topology.ou_count(),
        topology.account_count()
    );
    Ok(())
}
