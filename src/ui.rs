//! Plan and report rendering - orgsync-specific UI

use colored::Colorize;
use reconcile::{
    EditStep, ExecutionReport, Plan, PlannedStep, Preflight, ProgressCallback, StepStatus,
    Topology,
};

/// Display an annotated plan in a user-friendly format
pub fn display_plan(plan: &Plan) {
    if plan.is_empty() && plan.unresolved.is_empty() && plan.missing.is_empty() {
        println!();
        println!("  {} Live topology matches desired - nothing to do", "✓".green());
        return;
    }

    println!();
    println!("┌─ {} ─────────────────────────────────────────┐", "Reconciliation Plan".bold());
    println!("│");

    for planned in &plan.steps {
        let symbol = match &planned.step {
            EditStep::CreateOu { .. } => "+".green(),
            EditStep::MoveAccount { .. } => "~".yellow(),
            EditStep::RenameOu { .. } => "~".yellow(),
            EditStep::DeleteOu { .. } => "-".red(),
        };
        let blocked = match &planned.status {
            StepStatus::Blocked { reason } => format!(" [blocked: {reason}]").red().to_string(),
            _ => String::new(),
        };
        println!("│   {} {}{}", symbol, planned.step, blocked);
    }

    if !plan.unresolved.is_empty() {
        println!("│");
        println!("│ {} left for manual resolution:", "Unmatched non-empty OUs".bold());
        for unresolved in &plan.unresolved {
            println!(
                "│   {} {} holds {}",
                "!".yellow(),
                unresolved.path,
                unresolved
                    .stranded
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
                    .dimmed()
            );
        }
    }

    if !plan.missing.is_empty() {
        println!("│");
        println!("│ {} (declared in desired, absent from live):", "Missing accounts".bold());
        for account in &plan.missing {
            println!("│   {} {}", "?".yellow(), account);
        }
    }

    let summary = plan.summary();
    println!("├─────────────────────────────────────────────────────┤");
    println!(
        "│ Summary: {} creates, {} moves, {} deletes ({} blocked)",
        summary.creates.to_string().green(),
        summary.moves.to_string().yellow(),
        summary.deletes.to_string().red(),
        summary.blocked
    );
    println!("└─────────────────────────────────────────────────────┘");
}

/// Display an execution report with per-step outcomes
pub fn display_report(report: &ExecutionReport) {
    println!();
    if report.dry_run {
        println!("{}", "Dry run - no changes were made".bold());
    }
    if report.cancelled {
        println!("{}", "Cancelled - remaining steps were not attempted".yellow().bold());
    }

    for planned in &report.steps {
        println!("  {} {}", status_symbol(&planned.status), planned.step);
    }

    let summary = report.summary();
    println!();
    println!(
        "{} applied, {} unchanged, {} skipped, {} blocked, {} failed, {} pending",
        summary.applied.to_string().green(),
        summary.skipped_idempotent,
        summary.skipped,
        summary.blocked,
        if summary.failed > 0 {
            summary.failed.to_string().red().to_string()
        } else {
            summary.failed.to_string()
        },
        summary.pending
    );
}

/// Display the live/desired summary with pre-flight findings
pub fn display_status(live: &Topology, desired: &Topology, preflight: &Preflight, plan: &Plan) {
    println!();
    println!(
        "Live:    {} OUs, {} accounts",
        live.ou_count(),
        live.account_count()
    );
    println!(
        "Desired: {} OUs, {} accounts",
        desired.ou_count(),
        desired.account_count()
    );

    let summary = plan.summary();
    if summary.has_changes() {
        println!(
            "Drift:   {} creates, {} moves, {} deletes pending",
            summary.creates, summary.moves, summary.deletes
        );
    } else {
        println!("Drift:   {}", "none".green());
    }

    if !preflight.suspended_moves.is_empty() {
        println!(
            "{} suspended account(s) require a --resolve-suspensions run: {}",
            "⚠".yellow(),
            preflight
                .suspended_moves
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        );
    }
    if !preflight.missing.is_empty() {
        println!(
            "{} account(s) declared but absent from live: {}",
            "⚠".yellow(),
            preflight
                .missing
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        );
    }
    if !preflight.unmanaged.is_empty() {
        println!(
            "  {} live account(s) not placed by desired state",
            preflight.unmanaged.len()
        );
    }
}

fn status_symbol(status: &StepStatus) -> String {
    match status {
        StepStatus::Pending => "·".dimmed().to_string(),
        StepStatus::Applied => "✓".green().to_string(),
        StepStatus::SkippedIdempotent => "=".dimmed().to_string(),
        StepStatus::Skipped { .. } => "»".yellow().to_string(),
        StepStatus::Blocked { .. } => "!".red().to_string(),
        StepStatus::Failed { .. } => "✗".red().to_string(),
    }
}

/// Progress callback that prints each step outcome as it lands
pub struct PrintProgress;

impl ProgressCallback for PrintProgress {
    fn on_step_start(&mut self, _step: &PlannedStep) {}

    fn on_step_complete(&mut self, step: &PlannedStep) {
        log::info!("step #{}: {} -> {}", step.index, step.step, step.status);
    }
}
