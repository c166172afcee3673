#![allow(dead_code)]

use crate::types::{Amount, Identity, Project, ProjectStatus};
use crate::LedgerStore;

/// INV-1: Project IDs are sequential starting from 1.
pub fn assert_sequential_ids(ids: &[u64]) {
    for (i, id) in ids.iter().enumerate() {
        assert_eq!(
            *id,
            i as u64 + 1,
            "INV-1 violated: expected id {}, got {}",
            i + 1,
            id
        );
    }
}

/// INV-2: Funding grows by exactly the deposited amount.
pub fn assert_funding_invariant(before: Amount, after: Amount, amount: Amount) {
    assert_eq!(
        after,
        before + amount,
        "INV-2 violated: funding invariant broken: {} + {} != {}",
        before,
        amount,
        after
    );
}

/// INV-3: Fields fixed at creation never change.
pub fn assert_project_immutable_fields(original: &Project, current: &Project) {
    assert_eq!(original.id, current.id, "INV-3 violated: project id changed");
    assert_eq!(original.name, current.name, "INV-3 violated: project name changed");
    assert_eq!(
        original.description, current.description,
        "INV-3 violated: project description changed"
    );
    assert_eq!(
        original.funding_goal, current.funding_goal,
        "INV-3 violated: project funding_goal changed"
    );
    assert_eq!(original.owner, current.owner, "INV-3 violated: project owner changed");
}

/// INV-4: Funding and share totals never decrease.
pub fn assert_monotonic(label: &str, before: u128, after: u128) {
    assert!(
        after >= before,
        "INV-4 violated: {} decreased from {} to {}",
        label,
        before,
        after
    );
}

/// INV-5: Only `Active` is ever produced.
pub fn assert_active(project: &Project) {
    assert_eq!(
        project.status,
        ProjectStatus::Active,
        "INV-5 violated: project {} left the active state",
        project.id
    );
}

/// INV-6: When every contribution goes through `fund_project`, the funder
/// totals add up to the project's funding.
pub fn assert_contributions_sum_to_funding(
    store: &LedgerStore,
    project_id: u64,
    funders: &[Identity],
) {
    let project = store.get_project(project_id).expect("project exists");
    let sum: Amount = funders
        .iter()
        .map(|f| store.get_funder_amount(project_id, f))
        .sum();
    assert_eq!(
        sum, project.current_funding,
        "INV-6 violated: contributions {} != current_funding {}",
        sum, project.current_funding
    );
}

/// Run all stateless project invariants.
pub fn assert_all_project_invariants(project: &Project) {
    assert_active(project);
}
