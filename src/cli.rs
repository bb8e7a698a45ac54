use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "orgsync")]
#[command(version)]
#[command(about = "Declarative reconciliation of an organization's account/OU topology", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show live vs desired topology summary
    Status(TargetArgs),

    /// Compute and display the reconciliation plan
    Plan(PlanArgs),

    /// Apply the reconciliation plan to the live directory
    Apply(ApplyArgs),

    /// Validate the desired-state file
    Validate(ValidateArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args)]
pub struct TargetArgs {
    /// Live snapshot file (defaults to <config>/live.json)
    #[arg(long, value_name = "FILE")]
    pub live: Option<PathBuf>,

    /// Desired topology file (defaults to <config>/organization.toml)
    #[arg(long, value_name = "FILE")]
    pub desired: Option<PathBuf>,
}

#[derive(Args)]
pub struct PlanArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Emit the annotated plan as JSON
    #[arg(long)]
    pub json: bool,

    /// Allow moves of suspended accounts (resolve-suspension run)
    #[arg(long)]
    pub resolve_suspensions: bool,
}

#[derive(Args)]
pub struct ApplyArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Don't make changes, just show what would happen
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Allow moves of suspended accounts (resolve-suspension run)
    #[arg(long)]
    pub resolve_suspensions: bool,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Args)]
pub struct ValidateArgs {
    /// Desired topology file (defaults to <config>/organization.toml)
    #[arg(long, value_name = "FILE")]
    pub desired: Option<PathBuf>,
}
