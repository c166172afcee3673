//! # Policy
//!
//! Optional rules checked before a call changes [`LedgerStore`].
//!
//! The store accepts over-goal funding and lets anyone mint. Deployments that
//! want something stricter wrap the store in a [`GuardedLedger`] with a
//! [`LedgerPolicy`]; the store's own behavior never changes.
//!
//! | Policy               | Funding past goal | Mint by non-owner |
//! |----------------------|-------------------|-------------------|
//! | [`PermissivePolicy`] | allowed           | allowed           |
//! | [`StrictPolicy`]     | rejected          | rejected          |
//!
//! Checks run through the store's `*_with` entry points, under the same
//! project lock as the update they guard, so a cap holds under concurrent
//! funding. Applied calls are reported to the optional [`EventSink`] under
//! that lock too.

use std::sync::Arc;

use thiserror::Error;
use tracing::warn;

use crate::errors::{ErrorKind, LedgerError};
use crate::events::{EventSink, LedgerEvent};
use crate::types::{Amount, Identity, Project, ProjectId};
use crate::LedgerStore;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PolicyError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("{0}")]
    Rejected(String),
}

impl PolicyError {
    /// Ledger error kind, or `None` for policy rejections.
    pub fn ledger_kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Ledger(e) => Some(e.kind()),
            Self::Rejected(_) => None,
        }
    }
}

/// Gate consulted by [`GuardedLedger`]. Returning `Err(reason)` rejects the call.
pub trait LedgerPolicy: Send + Sync {
    fn name(&self) -> &'static str;

    fn check_fund(
        &self,
        _project: &Project,
        _amount: Amount,
        _funder: &Identity,
    ) -> Result<(), String> {
        Ok(())
    }

    fn check_mint(
        &self,
        _project: &Project,
        _caller: &Identity,
        _shares: u64,
    ) -> Result<(), String> {
        Ok(())
    }
}

impl<P: LedgerPolicy + ?Sized> LedgerPolicy for Box<P> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn check_fund(
        &self,
        project: &Project,
        amount: Amount,
        funder: &Identity,
    ) -> Result<(), String> {
        (**self).check_fund(project, amount, funder)
    }

    fn check_mint(&self, project: &Project, caller: &Identity, shares: u64) -> Result<(), String> {
        (**self).check_mint(project, caller, shares)
    }
}

/// Accepts everything; identical to calling the store directly.
#[derive(Clone, Copy, Debug, Default)]
pub struct PermissivePolicy;

impl LedgerPolicy for PermissivePolicy {
    fn name(&self) -> &'static str {
        "permissive"
    }
}

/// Caps funding at the goal and restricts minting to the project owner.
#[derive(Clone, Copy, Debug)]
pub struct StrictPolicy {
    pub cap_at_goal: bool,
    pub owner_only_mint: bool,
}

impl Default for StrictPolicy {
    fn default() -> Self {
        Self {
            cap_at_goal: true,
            owner_only_mint: true,
        }
    }
}

impl LedgerPolicy for StrictPolicy {
    fn name(&self) -> &'static str {
        "strict"
    }

    fn check_fund(
        &self,
        project: &Project,
        amount: Amount,
        _funder: &Identity,
    ) -> Result<(), String> {
        if !self.cap_at_goal {
            return Ok(());
        }
        match project.current_funding.checked_add(amount) {
            Some(total) if total <= project.funding_goal => Ok(()),
            _ => Err(format!(
                "Funding would exceed goal ({} of {} raised)",
                project.current_funding, project.funding_goal
            )),
        }
    }

    fn check_mint(&self, project: &Project, caller: &Identity, _shares: u64) -> Result<(), String> {
        if self.owner_only_mint && *caller != project.owner {
            return Err("Only the project owner may mint shares".to_string());
        }
        Ok(())
    }
}

/// Resolve a policy by its configuration name.
pub fn policy_by_name(name: &str) -> Option<Box<dyn LedgerPolicy>> {
    match name.trim().to_ascii_lowercase().as_str() {
        "permissive" => Some(Box::new(PermissivePolicy)),
        "strict" => Some(Box::new(StrictPolicy::default())),
        _ => None,
    }
}

/// A [`LedgerStore`] behind a [`LedgerPolicy`], optionally reporting applied
/// calls to an [`EventSink`].
pub struct GuardedLedger<P> {
    store: Arc<LedgerStore>,
    policy: P,
    sink: Option<Arc<dyn EventSink>>,
}

impl<P: LedgerPolicy> GuardedLedger<P> {
    pub fn new(store: Arc<LedgerStore>, policy: P) -> Self {
        Self {
            store,
            policy,
            sink: None,
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    pub fn create_project(
        &self,
        owner: &Identity,
        name: impl Into<String>,
        description: impl Into<String>,
        funding_goal: Amount,
    ) -> ProjectId {
        self.store
            .create_project_with(owner, name, description, funding_goal, |project_id| {
                self.emit(LedgerEvent::ProjectCreated {
                    project_id,
                    owner: owner.clone(),
                    funding_goal,
                });
            })
    }

    pub fn fund_project(
        &self,
        project_id: ProjectId,
        amount: Amount,
        funder: &Identity,
    ) -> Result<(), PolicyError> {
        self.store.fund_project_with(
            project_id,
            amount,
            funder,
            |project| {
                self.policy
                    .check_fund(project, amount, funder)
                    .map_err(|reason| self.reject(project_id, reason))
            },
            || {
                self.emit(LedgerEvent::ProjectFunded {
                    project_id,
                    funder: funder.clone(),
                    amount,
                });
            },
        )
    }

    pub fn mint_shares(
        &self,
        caller: &Identity,
        project_id: ProjectId,
        share_count: u64,
    ) -> Result<(), PolicyError> {
        self.store.mint_shares_with(
            project_id,
            share_count,
            |project| {
                self.policy
                    .check_mint(project, caller, share_count)
                    .map_err(|reason| self.reject(project_id, reason))
            },
            || {
                self.emit(LedgerEvent::SharesMinted {
                    project_id,
                    minter: caller.clone(),
                    shares: share_count,
                });
            },
        )
    }

    pub fn transfer_shares(
        &self,
        project_id: ProjectId,
        recipient: &Identity,
    ) -> Result<(), PolicyError> {
        self.store.transfer_shares_with(project_id, recipient, || {
            self.emit(LedgerEvent::SharesTransferred {
                project_id,
                recipient: recipient.clone(),
            });
        })?;
        Ok(())
    }

    pub fn get_project(&self, project_id: ProjectId) -> Result<Project, PolicyError> {
        Ok(self.store.get_project(project_id)?)
    }

    pub fn get_funder_amount(&self, project_id: ProjectId, funder: &Identity) -> Amount {
        self.store.get_funder_amount(project_id, funder)
    }

    pub fn get_share_total(&self, project_id: ProjectId) -> u64 {
        self.store.get_share_total(project_id)
    }

    fn emit(&self, event: LedgerEvent) {
        if let Some(sink) = &self.sink {
            sink.record(event);
        }
    }

    fn reject(&self, project_id: ProjectId, reason: String) -> PolicyError {
        warn!(project_id, policy = self.policy.name(), %reason, "call rejected by policy");
        PolicyError::Rejected(reason)
    }
}
