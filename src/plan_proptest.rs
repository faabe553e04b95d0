//! Property-based tests for reconciliation planning.
//!
//! Manifests and registries are drawn from a small name alphabet so that
//! generated inputs overlap often enough to exercise every branch.

#[cfg(test)]
mod proptest_tests {
    use std::collections::BTreeSet;

    use crate::manifest::{Manifest, Project};
    use crate::plan::ReconciliationPlan;
    use proptest::prelude::*;

    fn manifest_from(names: &BTreeSet<String>) -> Manifest {
        Manifest {
            default_revision: None,
            projects: names
                .iter()
                .map(|name| Project {
                    name: name.clone(),
                    path: format!("libs/{}", name),
                    revision: "main".to_string(),
                })
                .collect(),
        }
    }

    fn registered_from(names: &[String]) -> Vec<String> {
        names.iter().map(|name| format!("libs/{}", name)).collect()
    }

    fn paths_of(projects: &[Project]) -> BTreeSet<String> {
        projects.iter().map(|p| p.path.clone()).collect()
    }

    proptest! {
        /// Property: add and update partition the declared paths exactly
        #[test]
        fn add_and_update_partition_declared(
            declared in prop::collection::btree_set("[a-f]", 0..6),
            registered in prop::collection::vec("[a-h]", 0..8),
        ) {
            let manifest = manifest_from(&declared);
            let plan = ReconciliationPlan::compute(&manifest, &registered_from(&registered));

            let added = paths_of(&plan.to_add);
            let updated = paths_of(&plan.to_update);

            prop_assert!(added.is_disjoint(&updated));
            let union: BTreeSet<String> = added.union(&updated).cloned().collect();
            prop_assert_eq!(union, manifest.paths());
            prop_assert_eq!(plan.to_add.len() + plan.to_update.len(), manifest.projects.len());
        }

        /// Property: nothing declared is ever removed, and only registered
        /// paths are removed
        #[test]
        fn removals_are_registered_and_undeclared(
            declared in prop::collection::btree_set("[a-f]", 0..6),
            registered in prop::collection::vec("[a-h]", 0..8),
        ) {
            let manifest = manifest_from(&declared);
            let registered = registered_from(&registered);
            let plan = ReconciliationPlan::compute(&manifest, &registered);

            let declared_paths = manifest.paths();
            for path in &plan.to_remove {
                prop_assert!(!declared_paths.contains(path));
                prop_assert!(registered.contains(path));
            }
            let unique: BTreeSet<&String> = plan.to_remove.iter().collect();
            prop_assert_eq!(unique.len(), plan.to_remove.len());
        }

        /// Property: applying a plan and planning again reaches steady state
        #[test]
        fn second_plan_is_steady(
            declared in prop::collection::btree_set("[a-f]", 0..6),
            registered in prop::collection::vec("[a-h]", 0..8),
        ) {
            let manifest = manifest_from(&declared);
            let registered = registered_from(&registered);
            let plan = ReconciliationPlan::compute(&manifest, &registered);

            let mut after: Vec<String> = registered
                .iter()
                .filter(|path| !plan.to_remove.contains(path))
                .cloned()
                .collect();
            after.extend(plan.to_add.iter().map(|p| p.path.clone()));

            let second = ReconciliationPlan::compute(&manifest, &after);
            prop_assert!(second.is_steady_state());
            prop_assert_eq!(second.to_update.len(), manifest.projects.len());
        }
    }
}
