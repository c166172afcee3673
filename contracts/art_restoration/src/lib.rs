//! # Art Restoration Ledger
//!
//! Crowdfunding ledger for restoration projects. A single [`LedgerStore`]
//! owns every project, every funder contribution and every share total, and
//! exposes the operations that mutate them:
//!
//! | Phase        | Operation(s)                                     |
//! |--------------|--------------------------------------------------|
//! | Registration | [`LedgerStore::create_project`]                  |
//! | Funding      | [`LedgerStore::fund_project`]                    |
//! | Shares       | [`LedgerStore::mint_shares`], [`LedgerStore::transfer_shares`] |
//! | Queries      | `get_project`, `get_funder_amount`, `get_share_total`, `project_count` |
//! | Test support | [`LedgerStore::reset`]                           |
//!
//! ## Architecture
//!
//! Storage and locking are delegated to [`storage`]. Stricter rules (goal
//! caps, owner-only minting) live in [`policy`] and wrap the store rather than
//! altering it. [`events`] describes successful mutations for adapters that
//! keep an audit trail.
//!
//! Every operation returns a [`Result`]; a failed call leaves the ledger
//! untouched.

pub mod errors;
pub mod events;
pub mod policy;
pub mod storage;
pub mod types;

#[cfg(test)]
mod invariants;
#[cfg(test)]
mod test_ledger;

use tracing::{debug, info, warn};

use storage::{EntryRef, ProjectEntry, ProjectIndex};

pub use errors::{ErrorKind, LedgerError, Result};
pub use events::LedgerEvent;
pub use policy::{GuardedLedger, LedgerPolicy, PermissivePolicy, PolicyError, StrictPolicy};
pub use types::{Amount, Identity, Project, ProjectConfig, ProjectId, ProjectState, ProjectStatus};

/// In-memory ledger of restoration projects.
///
/// Cheap to share behind an `Arc`; all methods take `&self`.
#[derive(Debug, Default)]
pub struct LedgerStore {
    index: ProjectIndex,
}

impl LedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new project owned by `owner`.
    ///
    /// Name, description and goal are stored as given. Returns the new ID,
    /// which is one more than the previous one, starting at 1.
    pub fn create_project(
        &self,
        owner: &Identity,
        name: impl Into<String>,
        description: impl Into<String>,
        funding_goal: Amount,
    ) -> ProjectId {
        self.create_project_with(owner, name, description, funding_goal, |_| {})
    }

    /// [`create_project`](Self::create_project), calling `on_created` with the
    /// new ID before any other caller can see the project.
    pub fn create_project_with(
        &self,
        owner: &Identity,
        name: impl Into<String>,
        description: impl Into<String>,
        funding_goal: Amount,
        on_created: impl FnOnce(ProjectId),
    ) -> ProjectId {
        let name = name.into();
        let description = description.into();
        let id = self.index.insert_with(|id| {
            on_created(id);
            ProjectEntry::new(ProjectConfig {
                id,
                name,
                description,
                funding_goal,
                owner: owner.clone(),
            })
        });
        info!(project_id = id, %owner, funding_goal, "project created");
        id
    }

    /// Add `amount` to the project's funding and to `funder`'s running total.
    ///
    /// Funding past the goal is accepted.
    pub fn fund_project(
        &self,
        project_id: ProjectId,
        amount: Amount,
        funder: &Identity,
    ) -> Result<()> {
        self.fund_project_with(project_id, amount, funder, |_| Ok(()), || {})
    }

    /// [`fund_project`](Self::fund_project) with hooks run under the project
    /// lock.
    ///
    /// `check` sees the project as it is right before the update and can veto
    /// it; `on_funded` runs once the update is applied.
    pub fn fund_project_with<E: From<LedgerError>>(
        &self,
        project_id: ProjectId,
        amount: Amount,
        funder: &Identity,
        check: impl FnOnce(&Project) -> std::result::Result<(), E>,
        on_funded: impl FnOnce(),
    ) -> std::result::Result<(), E> {
        let entry = self.entry(project_id)?;
        let mut entry = entry.lock();

        check(&Project::from_parts(&entry.config, &entry.state))?;

        let funding = entry
            .state
            .current_funding
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        let contribution = entry
            .contribution_of(funder)
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;

        entry.state.current_funding = funding;
        entry.set_contribution(funder, contribution);
        on_funded();

        info!(project_id, %funder, amount, current_funding = funding, "project funded");
        Ok(())
    }

    /// Add `share_count` to the project's minted share total.
    ///
    /// Any caller may mint; see [`StrictPolicy`] for an owner-only variant.
    pub fn mint_shares(&self, project_id: ProjectId, share_count: u64) -> Result<()> {
        self.mint_shares_with(project_id, share_count, |_| Ok(()), || {})
    }

    /// [`mint_shares`](Self::mint_shares) with hooks run under the project lock.
    pub fn mint_shares_with<E: From<LedgerError>>(
        &self,
        project_id: ProjectId,
        share_count: u64,
        check: impl FnOnce(&Project) -> std::result::Result<(), E>,
        on_minted: impl FnOnce(),
    ) -> std::result::Result<(), E> {
        let entry = self.entry(project_id)?;
        let mut entry = entry.lock();

        check(&Project::from_parts(&entry.config, &entry.state))?;

        let total = entry
            .shares()
            .unwrap_or_default()
            .checked_add(share_count)
            .ok_or(LedgerError::Overflow)?;
        entry.set_shares(total);
        on_minted();

        info!(project_id, share_count, total_shares = total, "shares minted");
        Ok(())
    }

    /// Check that the project has shares and report success.
    ///
    /// Shares are only tracked in aggregate, so there is no holder to move:
    /// this validates and changes nothing. Fails with
    /// [`LedgerError::SharesNotFound`] when no non-zero total was ever minted.
    pub fn transfer_shares(&self, project_id: ProjectId, recipient: &Identity) -> Result<()> {
        self.transfer_shares_with(project_id, recipient, || {})
    }

    /// [`transfer_shares`](Self::transfer_shares), calling `on_accepted` under
    /// the project lock once validation passed.
    pub fn transfer_shares_with(
        &self,
        project_id: ProjectId,
        recipient: &Identity,
        on_accepted: impl FnOnce(),
    ) -> Result<()> {
        let not_found = LedgerError::SharesNotFound(project_id);
        let entry = self.index.load(project_id).ok_or(not_found.clone())?;
        let entry = entry.lock();
        let shares = entry.shares().filter(|total| *total > 0).ok_or(not_found)?;
        on_accepted();

        // TODO: move shares once per-holder balances exist in the data model.
        warn!(
            project_id,
            %recipient,
            total_shares = shares,
            "share transfer accepted without effect: holders are not tracked"
        );
        Ok(())
    }

    /// Snapshot of the project.
    pub fn get_project(&self, project_id: ProjectId) -> Result<Project> {
        let entry = self.entry(project_id)?;
        let entry = entry.lock();
        debug!(project_id, "project read");
        Ok(Project::from_parts(&entry.config, &entry.state))
    }

    /// Cumulative contribution of `funder` to the project, or 0.
    ///
    /// Never fails, including for unknown projects.
    pub fn get_funder_amount(&self, project_id: ProjectId, funder: &Identity) -> Amount {
        self.index
            .load(project_id)
            .map(|entry| entry.lock().contribution_of(funder))
            .unwrap_or_default()
    }

    /// Minted share total, or 0 if nothing was minted or the project is unknown.
    pub fn get_share_total(&self, project_id: ProjectId) -> u64 {
        self.index
            .load(project_id)
            .and_then(|entry| entry.lock().shares())
            .unwrap_or_default()
    }

    /// Number of projects created since construction or the last reset.
    pub fn project_count(&self) -> u64 {
        self.index.allocated()
    }

    /// Forget every project and rewind ID allocation to 1.
    ///
    /// Intended for test harnesses; nothing else destroys ledger data.
    pub fn reset(&self) {
        self.index.clear();
        info!("ledger reset");
    }

    fn entry(&self, project_id: ProjectId) -> Result<EntryRef> {
        self.index
            .load(project_id)
            .ok_or(LedgerError::ProjectNotFound(project_id))
    }
}
