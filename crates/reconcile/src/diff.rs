//! Diff engine: compute the minimal edit script between two topologies.
//!
//! OUs are matched by full path-from-root (name sequence), never by
//! identifier - identifiers are live-only. The resulting plan is ordered so
//! every step's preconditions hold by the time it executes: creates first
//! (parents before children), then account moves, then deletes (children
//! before parents).
//!
//! Renames are represented structurally as create + moves + delete; the
//! `RenameOu` step kind exists for manually authored plans.
//!
//! For identical inputs the plan is byte-identical: every collection walked
//! here iterates in lexicographic path or account-id order.

use crate::path::OuPath;
use crate::plan::{EditStep, Plan, PlannedStep, StepStatus, UnresolvedOu};
use crate::topology::Topology;
use orgkit::AccountId;
use std::collections::BTreeSet;

/// Compute the edit script transforming `live` into `desired`.
///
/// Both inputs must already be validated trees (see
/// [`Topology::validate`]); the engine assumes it.
pub fn diff(live: &Topology, desired: &Topology) -> Plan {
    let live_paths: BTreeSet<&OuPath> = live.ou_paths().map(|(path, _)| path).collect();
    let desired_paths: BTreeSet<&OuPath> = desired.ou_paths().map(|(path, _)| path).collect();

    let mut steps: Vec<EditStep> = Vec::new();

    // Creates: desired paths with no live match, parents before children
    // (path order guarantees it).
    for (path, _) in desired.ou_paths() {
        if !live_paths.contains(path) {
            steps.push(EditStep::CreateOu { path: path.clone() });
        }
    }

    // Moves: every account present in both, whose parents' paths differ.
    // Desired accounts absent from live are reported, never planned -
    // account creation is not this tool's job.
    let mut missing: Vec<AccountId> = Vec::new();
    for account in desired.accounts() {
        match live.account(&account.id) {
            None => missing.push(account.id.clone()),
            Some(live_account) => {
                let from = live.path_of(live_account.parent);
                let to = desired.path_of(account.parent);
                if from != to {
                    steps.push(EditStep::MoveAccount {
                        account: account.id.clone(),
                        from: from.clone(),
                        to: to.clone(),
                    });
                }
            }
        }
    }

    // Deletes: live-only OUs whose subtree will be empty once the moves
    // above land. A live-only OU still holding accounts with no desired
    // placement is never auto-deleted; it is reported for manual
    // resolution instead.
    let mut deletes: Vec<OuPath> = Vec::new();
    let mut unresolved: Vec<UnresolvedOu> = Vec::new();
    for (path, node) in live.ou_paths() {
        if desired_paths.contains(path) {
            continue;
        }
        let stranded: Vec<AccountId> = live
            .subtree_accounts(node)
            .into_iter()
            .filter(|id| desired.account(id).is_none())
            .collect();
        if stranded.is_empty() {
            deletes.push(path.clone());
        } else {
            unresolved.push(UnresolvedOu {
                path: path.clone(),
                stranded,
            });
        }
    }
    // Children before parents: reverse of creation order.
    deletes.reverse();
    steps.extend(deletes.into_iter().map(|path| EditStep::DeleteOu { path }));

    let steps = steps
        .into_iter()
        .enumerate()
        .map(|(index, step)| PlannedStep {
            index,
            step,
            status: StepStatus::Pending,
        })
        .collect();

    Plan {
        steps,
        unresolved,
        missing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::desired;
    use crate::live::{self, ReadOptions};
    use orgkit::{AccountStatus, Directory, MemoryDirectory};

    /// No DeleteOu may precede a step that empties the deleted subtree.
    fn assert_delete_ordering(plan: &Plan) {
        for (i, planned) in plan.steps.iter().enumerate() {
            let EditStep::DeleteOu { path } = &planned.step else {
                continue;
            };
            for later in &plan.steps[i + 1..] {
                match &later.step {
                    EditStep::MoveAccount { from, .. } => {
                        assert!(
                            !from.starts_with(path),
                            "delete of {path} precedes move out of {from}"
                        );
                    }
                    EditStep::CreateOu { path: created } => {
                        assert!(
                            !created.starts_with(path),
                            "delete of {path} precedes create of {created}"
                        );
                    }
                    EditStep::DeleteOu { path: deleted } => {
                        assert!(
                            !deleted.starts_with(path) || deleted == path,
                            "delete of {path} precedes delete of child {deleted}"
                        );
                    }
                    EditStep::RenameOu { .. } => {}
                }
            }
        }
    }

    fn campps_live() -> (MemoryDirectory, Topology) {
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
        let topo = live::read(&dir, &ReadOptions::default()).unwrap();
        (dir, topo)
    }

    const CAMPPS_DESIRED: &str = r#"
        [[ou]]
        path = "Apps/CAMPPS/Production"

        [[account]]
        id = "111111111111"
        parent = "Apps/CAMPPS/Production"
    "#;

    #[test]
    fn test_campps_migration_scenario() {
        let (_dir, live_topo) = campps_live();
        let desired_topo = desired::parse(CAMPPS_DESIRED).unwrap();

        let plan = diff(&live_topo, &desired_topo);

        let rendered: Vec<String> = plan.steps.iter().map(|s| s.step.to_string()).collect();
        assert_eq!(
            rendered,
            vec![
                "create OU Apps",
                "create OU Apps/CAMPPS",
                "create OU Apps/CAMPPS/Production",
                "move account 111111111111 CAMPPS/workloads/PRODUCTION -> Apps/CAMPPS/Production",
                "delete OU CAMPPS/workloads/PRODUCTION",
                "delete OU CAMPPS/workloads",
                "delete OU CAMPPS",
            ]
        );
        assert!(plan.unresolved.is_empty());
        assert!(plan.missing.is_empty());
        assert_delete_ordering(&plan);

        // Stable sequence indices
        for (i, planned) in plan.steps.iter().enumerate() {
            assert_eq!(planned.index, i);
        }
    }

    #[test]
    fn test_diff_is_deterministic() {
        let (_dir, live_topo) = campps_live();
        let desired_topo = desired::parse(CAMPPS_DESIRED).unwrap();

        let first = diff(&live_topo, &desired_topo);
        let second = diff(&live_topo, &desired_topo);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_identical_topologies_yield_empty_plan() {
        let (_dir, live_topo) = campps_live();
        let desired_topo = desired::parse(
            r#"
            [[ou]]
            path = "CAMPPS/workloads/PRODUCTION"

            [[account]]
            id = "111111111111"
            parent = "CAMPPS/workloads/PRODUCTION"
            "#,
        )
        .unwrap();

        let plan = diff(&live_topo, &desired_topo);
        assert!(plan.is_empty());
        assert!(plan.unresolved.is_empty());
    }

    #[test]
    fn test_unmatched_nonempty_ou_is_reported_not_deleted() {
        let dir = MemoryDirectory::new();
        let root = dir.root().unwrap();
        let cicd = dir.seed_ou(&root, "CICD");
        let production = dir.seed_ou(&cicd, "PRODUCTION");
        dir.seed_account(
            &production,
            "999999999999",
            "cicd-prod",
            "aws+cicd-prod@example.com",
            AccountStatus::Active,
        );
        let live_topo = live::read(&dir, &ReadOptions::default()).unwrap();
        let desired_topo = desired::parse("[[ou]]\npath = \"Apps\"\n").unwrap();

        let plan = diff(&live_topo, &desired_topo);

        assert!(
            plan.steps
                .iter()
                .all(|s| !matches!(s.step, EditStep::DeleteOu { .. })),
            "no delete may be emitted for a stranded subtree"
        );
        let paths: Vec<String> = plan.unresolved.iter().map(|u| u.path.to_string()).collect();
        assert_eq!(paths, vec!["CICD", "CICD/PRODUCTION"]);
        assert_eq!(
            plan.unresolved[1].stranded,
            vec![AccountId::new("999999999999")]
        );
    }

    #[test]
    fn test_rename_is_create_move_delete() {
        let dir = MemoryDirectory::new();
        let root = dir.root().unwrap();
        let apps = dir.seed_ou(&root, "Apps");
        let old = dir.seed_ou(&apps, "NonProd");
        dir.seed_account(
            &old,
            "444444444444",
            "campps-dev",
            "aws+campps-dev@example.com",
            AccountStatus::Active,
        );
        let live_topo = live::read(&dir, &ReadOptions::default()).unwrap();
        let desired_topo = desired::parse(
            r#"
            [[ou]]
            path = "Apps/Development"

            [[account]]
            id = "444444444444"
            parent = "Apps/Development"
            "#,
        )
        .unwrap();

        let plan = diff(&live_topo, &desired_topo);
        let rendered: Vec<String> = plan.steps.iter().map(|s| s.step.to_string()).collect();
        assert_eq!(
            rendered,
            vec![
                "create OU Apps/Development",
                "move account 444444444444 Apps/NonProd -> Apps/Development",
                "delete OU Apps/NonProd",
            ]
        );
        assert_delete_ordering(&plan);
    }

    #[test]
    fn test_desired_account_missing_from_live() {
        let dir = MemoryDirectory::new();
        let _ = dir.root().unwrap();
        let live_topo = live::read(&dir, &ReadOptions::default()).unwrap();
        let desired_topo = desired::parse(
            r#"
            [[account]]
            id = "555555555555"
            "#,
        )
        .unwrap();

        let plan = diff(&live_topo, &desired_topo);
        assert!(plan.is_empty());
        assert_eq!(plan.missing, vec![AccountId::new("555555555555")]);
    }

    #[test]
    fn test_move_between_matched_ous() {
        let dir = MemoryDirectory::new();
        let root = dir.root().unwrap();
        let apps = dir.seed_ou(&root, "Apps");
        let media = dir.seed_ou(&root, "Media");
        dir.seed_account(
            &apps,
            "666666666666",
            "media-site",
            "aws+media-site@example.com",
            AccountStatus::Active,
        );
        let _ = media;
        let live_topo = live::read(&dir, &ReadOptions::default()).unwrap();
        let desired_topo = desired::parse(
            r#"
            [[ou]]
            path = "Apps"

            [[ou]]
            path = "Media"

            [[account]]
            id = "666666666666"
            parent = "Media"
            "#,
        )
        .unwrap();

        let plan = diff(&live_topo, &desired_topo);
        assert_eq!(plan.len(), 1);
        assert_eq!(
            plan.steps[0].step.to_string(),
            "move account 666666666666 Apps -> Media"
        );
    }
}
