//! Ledger events describing successful mutations.
//!
//! The store itself does not publish anything. [`crate::GuardedLedger`]
//! builds an event for every applied call and hands it to its [`EventSink`]
//! while the project lock is still held, so a sink sees the events of one
//! project in the order the ledger applied them.

use serde::{Deserialize, Serialize};

use crate::types::{amount_str, Amount, Identity, ProjectId};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LedgerEvent {
    ProjectCreated {
        project_id: ProjectId,
        owner: Identity,
        #[serde(with = "amount_str")]
        funding_goal: Amount,
    },
    ProjectFunded {
        project_id: ProjectId,
        funder: Identity,
        #[serde(with = "amount_str")]
        amount: Amount,
    },
    SharesMinted {
        project_id: ProjectId,
        minter: Identity,
        shares: u64,
    },
    /// Recorded even though no holder changes; see `LedgerStore::transfer_shares`.
    SharesTransferred {
        project_id: ProjectId,
        recipient: Identity,
    },
}

/// Receiver for ledger events.
///
/// Called with a project lock held: implementations must not block or call
/// back into the ledger.
pub trait EventSink: Send + Sync {
    fn record(&self, event: LedgerEvent);
}

impl LedgerEvent {
    /// Short identifier suitable for storage.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ProjectCreated { .. } => "project_created",
            Self::ProjectFunded { .. } => "project_funded",
            Self::SharesMinted { .. } => "shares_minted",
            Self::SharesTransferred { .. } => "shares_transferred",
        }
    }

    pub fn project_id(&self) -> ProjectId {
        match self {
            Self::ProjectCreated { project_id, .. }
            | Self::ProjectFunded { project_id, .. }
            | Self::SharesMinted { project_id, .. }
            | Self::SharesTransferred { project_id, .. } => *project_id,
        }
    }

    /// The identity the event is about, if any.
    pub fn actor(&self) -> Option<&Identity> {
        match self {
            Self::ProjectCreated { owner, .. } => Some(owner),
            Self::ProjectFunded { funder, .. } => Some(funder),
            Self::SharesMinted { minter, .. } => Some(minter),
            Self::SharesTransferred { recipient, .. } => Some(recipient),
        }
    }

    /// Quantity carried by the event, rendered as a decimal string.
    pub fn amount(&self) -> Option<String> {
        match self {
            Self::ProjectCreated { funding_goal, .. } => Some(funding_goal.to_string()),
            Self::ProjectFunded { amount, .. } => Some(amount.to_string()),
            Self::SharesMinted { shares, .. } => Some(shares.to_string()),
            Self::SharesTransferred { .. } => None,
        }
    }
}
