use proptest::prelude::*;

use crate::invariants::{
    assert_all_project_invariants, assert_contributions_sum_to_funding, assert_funding_invariant,
    assert_monotonic, assert_project_immutable_fields, assert_sequential_ids,
};
use crate::{Identity, LedgerError, LedgerStore, ProjectStatus};

const NAME: &str = "Mona Lisa Restoration";
const DESCRIPTION: &str = "Restoring the famous painting";
const GOAL: u128 = 1_000_000;

fn owner() -> Identity {
    Identity::new("MOCK_OWNER")
}

fn setup() -> LedgerStore {
    let store = LedgerStore::new();
    store.create_project(&owner(), NAME, DESCRIPTION, GOAL);
    store
}

#[test]
fn test_create_project() {
    let store = LedgerStore::new();
    let id = store.create_project(&owner(), NAME, DESCRIPTION, GOAL);
    assert_eq!(id, 1);
    assert_eq!(store.project_count(), 1);

    let project = store.get_project(1).unwrap();
    assert_eq!(project.name, NAME);
    assert_eq!(project.description, DESCRIPTION);
    assert_eq!(project.funding_goal, GOAL);
    assert_eq!(project.current_funding, 0);
    assert_eq!(project.owner, owner());
    assert_eq!(project.status, ProjectStatus::Active);
}

#[test]
fn test_ids_are_sequential_regardless_of_arguments() {
    let store = LedgerStore::new();
    let ids: Vec<u64> = [("", "", 0u128), ("a", "b", 1), ("x", "y", u128::MAX)]
        .iter()
        .map(|(n, d, g)| store.create_project(&owner(), *n, *d, *g))
        .collect();
    assert_sequential_ids(&ids);
}

#[test]
fn test_fund_project() {
    let store = setup();
    let funder = Identity::new("MOCK_FUNDER");

    store.fund_project(1, 500_000, &funder).unwrap();

    assert_eq!(store.get_project(1).unwrap().current_funding, 500_000);
    assert_eq!(store.get_funder_amount(1, &funder), 500_000);
}

#[test]
fn test_funding_may_overshoot_goal() {
    let store = setup();
    let funder = Identity::new("WHALE");

    store.fund_project(1, GOAL * 3, &funder).unwrap();

    let project = store.get_project(1).unwrap();
    assert_eq!(project.current_funding, GOAL * 3);
    assert_all_project_invariants(&project);
}

#[test]
fn test_zero_amount_creates_contribution_record() {
    let store = setup();
    let funder = Identity::new("F0");
    store.fund_project(1, 0, &funder).unwrap();
    assert_eq!(store.get_funder_amount(1, &funder), 0);
    assert_eq!(store.get_project(1).unwrap().current_funding, 0);
}

#[test]
fn test_multiple_funders() {
    let store = setup();
    let a = Identity::new("FUNDER_A");
    let b = Identity::new("FUNDER_B");

    store.fund_project(1, 300_000, &a).unwrap();
    store.fund_project(1, 200_000, &b).unwrap();
    store.fund_project(1, 100_000, &a).unwrap();

    assert_eq!(store.get_funder_amount(1, &a), 400_000);
    assert_eq!(store.get_funder_amount(1, &b), 200_000);
    assert_eq!(store.get_project(1).unwrap().current_funding, 600_000);
    assert_contributions_sum_to_funding(&store, 1, &[a, b]);
}

#[test]
fn test_contributions_are_per_project() {
    let store = setup();
    store.create_project(&owner(), "Sistine Chapel", "Ceiling cleaning", GOAL);
    let funder = Identity::new("F1");

    store.fund_project(1, 10, &funder).unwrap();
    store.fund_project(2, 20, &funder).unwrap();

    assert_eq!(store.get_funder_amount(1, &funder), 10);
    assert_eq!(store.get_funder_amount(2, &funder), 20);
}

#[test]
fn test_mint_shares_accumulates() {
    let store = setup();
    assert_eq!(store.get_share_total(1), 0);

    store.mint_shares(1, 100).unwrap();
    assert_eq!(store.get_share_total(1), 100);

    store.mint_shares(1, 50).unwrap();
    assert_eq!(store.get_share_total(1), 150);
}

#[test]
fn test_transfer_shares_validates_then_changes_nothing() {
    let store = setup();
    let funder = Identity::new("F1");
    let recipient = Identity::new("MOCK_RECIPIENT");
    store.fund_project(1, 500_000, &funder).unwrap();
    store.mint_shares(1, 100).unwrap();
    let before = store.get_project(1).unwrap();

    store.transfer_shares(1, &recipient).unwrap();

    // Holders are not modeled, so nothing observable moves.
    assert_eq!(store.get_project(1).unwrap(), before);
    assert_eq!(store.get_share_total(1), 100);
    assert_eq!(store.get_funder_amount(1, &funder), 500_000);
    assert_eq!(store.get_funder_amount(1, &recipient), 0);
}

#[test]
fn test_transfer_without_shares_fails() {
    let store = setup();
    let recipient = Identity::new("R");

    let err = store.transfer_shares(1, &recipient).unwrap_err();
    assert_eq!(err, LedgerError::SharesNotFound(1));
    assert_eq!(err.to_string(), "No shares found for project");

    // A zero-share mint records a total, but still nothing to transfer.
    store.mint_shares(1, 0).unwrap();
    assert!(store.transfer_shares(1, &recipient).is_err());

    assert_eq!(
        store.transfer_shares(999, &recipient).unwrap_err(),
        LedgerError::SharesNotFound(999)
    );
}

#[test]
fn test_missing_project_errors_leave_state_unchanged() {
    let store = setup();
    let funder = Identity::new("MOCK_FUNDER");
    let before = store.get_project(1).unwrap();

    let err = store.fund_project(999, 500_000, &funder).unwrap_err();
    assert_eq!(err, LedgerError::ProjectNotFound(999));
    assert_eq!(err.to_string(), "Project not found");

    assert_eq!(
        store.get_project(999).unwrap_err(),
        LedgerError::ProjectNotFound(999)
    );
    assert_eq!(
        store.mint_shares(999, 10).unwrap_err(),
        LedgerError::ProjectNotFound(999)
    );

    assert_eq!(store.get_funder_amount(999, &funder), 0);
    assert_eq!(store.get_share_total(999), 0);
    assert_eq!(store.project_count(), 1);
    assert_eq!(store.get_project(1).unwrap(), before);
    assert_eq!(store.create_project(&owner(), NAME, DESCRIPTION, GOAL), 2);
}

#[test]
fn test_overflow_is_rejected_without_mutation() {
    let store = setup();
    let funder = Identity::new("F");
    store.fund_project(1, u128::MAX, &funder).unwrap();

    assert_eq!(store.fund_project(1, 1, &funder).unwrap_err(), LedgerError::Overflow);
    assert_eq!(store.get_project(1).unwrap().current_funding, u128::MAX);

    store.mint_shares(1, u64::MAX).unwrap();
    assert_eq!(store.mint_shares(1, 1).unwrap_err(), LedgerError::Overflow);
    assert_eq!(store.get_share_total(1), u64::MAX);
}

#[test]
fn test_reset_rewinds_ids() {
    let store = setup();
    store.mint_shares(1, 5).unwrap();
    store.reset();

    assert_eq!(store.project_count(), 0);
    assert!(store.get_project(1).is_err());
    assert_eq!(store.get_share_total(1), 0);
    assert_eq!(store.create_project(&owner(), NAME, DESCRIPTION, GOAL), 1);
}

#[test]
fn test_restoration_scenario() {
    let store = LedgerStore::new();
    let f1 = Identity::new("F1");

    let id = store.create_project(&owner(), NAME, "...", GOAL);
    assert_eq!(id, 1);
    let created = store.get_project(id).unwrap();

    store.fund_project(id, 500_000, &f1).unwrap();
    assert_funding_invariant(0, store.get_project(id).unwrap().current_funding, 500_000);
    assert_eq!(store.get_funder_amount(id, &f1), 500_000);

    store.mint_shares(id, 100).unwrap();
    assert_eq!(store.get_share_total(id), 100);

    let project = store.get_project(id).unwrap();
    assert_eq!(project.current_funding, 500_000);
    assert_project_immutable_fields(&created, &project);
    assert_all_project_invariants(&project);
}

proptest! {
    #[test]
    fn funder_total_is_sum_of_amounts(
        amounts in prop::collection::vec(0u128..1_000_000_000, 1..32)
    ) {
        let store = setup();
        let funder = Identity::new("F");
        let mut previous = 0u128;

        for amount in &amounts {
            store.fund_project(1, *amount, &funder).unwrap();
            let current = store.get_funder_amount(1, &funder);
            assert_monotonic("contribution", previous, current);
            previous = current;
        }

        prop_assert_eq!(store.get_funder_amount(1, &funder), amounts.iter().sum::<u128>());
    }

    #[test]
    fn project_funding_is_sum_across_funders(
        deposits in prop::collection::vec((0usize..4, 0u128..1_000_000), 1..48)
    ) {
        let store = setup();
        let funders: Vec<Identity> = (0..4).map(|i| Identity::new(format!("F{i}"))).collect();

        for (who, amount) in &deposits {
            store.fund_project(1, *amount, &funders[*who]).unwrap();
        }

        let expected: u128 = deposits.iter().map(|(_, a)| *a).sum();
        prop_assert_eq!(store.get_project(1).unwrap().current_funding, expected);
        assert_contributions_sum_to_funding(&store, 1, &funders);
    }

    #[test]
    fn share_total_is_sum_of_mints(mints in prop::collection::vec(0u64..1_000_000, 1..32)) {
        let store = setup();
        for shares in &mints {
            store.mint_shares(1, *shares).unwrap();
        }
        prop_assert_eq!(store.get_share_total(1), mints.iter().sum::<u64>());
    }
}
