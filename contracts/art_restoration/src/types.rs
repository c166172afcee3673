//! # Types
//!
//! Shared data structures used across the ledger.
//!
//! ## Config / State split
//!
//! A `Project` is stored internally as two parts:
//!
//! - [`ProjectConfig`] — written once by `create_project`; never mutated.
//! - [`ProjectState`] — written on every `fund_project`.
//!
//! The public API exposes the reconstructed [`Project`] snapshot.
//!
//! ## Amounts
//!
//! Money is `u128` and serialised as a decimal string so JSON consumers never
//! lose precision. Share counts are `u64` and serialised as plain numbers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Sequential project identifier, starting at 1.
pub type ProjectId = u64;

/// Monetary amount in the smallest unit of the funding currency.
pub type Amount = u128;

/// Opaque caller identity (owner, funder, or share recipient).
///
/// The ledger never interprets the value; it only compares for equality.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Identity {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Identity {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Lifecycle status of a project.
///
/// Only `Active` is produced today; no operation moves a project into a
/// terminal state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    /// Accepting contributions.
    Active,
}

/// Immutable project configuration, written once at creation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProjectConfig {
    pub id: ProjectId,
    pub name: String,
    pub description: String,
    pub funding_goal: Amount,
    pub owner: Identity,
}

/// Mutable project state, updated by funding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProjectState {
    pub current_funding: Amount,
    pub status: ProjectStatus,
}

impl ProjectState {
    pub fn new() -> Self {
        Self {
            current_funding: 0,
            status: ProjectStatus::Active,
        }
    }
}

impl Default for ProjectState {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of a restoration project as returned by `get_project`.
///
/// Reconstructed from the split `ProjectConfig` + `ProjectState`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Unique identifier (auto-incremented from 1).
    pub id: ProjectId,
    pub name: String,
    pub description: String,
    /// Target amount. Funding may overshoot it.
    #[serde(with = "amount_str")]
    pub funding_goal: Amount,
    /// Sum of every contribution routed through `fund_project`.
    #[serde(with = "amount_str")]
    pub current_funding: Amount,
    /// Identity that created the project.
    pub owner: Identity,
    pub status: ProjectStatus,
}

impl Project {
    pub(crate) fn from_parts(config: &ProjectConfig, state: &ProjectState) -> Self {
        Self {
            id: config.id,
            name: config.name.clone(),
            description: config.description.clone(),
            funding_goal: config.funding_goal,
            current_funding: state.current_funding,
            owner: config.owner.clone(),
            status: state.status,
        }
    }
}

/// Serde adapter writing `u128` amounts as decimal strings.
///
/// Deserialisation accepts either a string or a JSON integer.
pub mod amount_str {
    use serde::{de, Deserialize, Deserializer, Serializer};

    use super::Amount;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Int(u64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(value: &Amount, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Amount, D::Error> {
        match Repr::deserialize(deserializer)? {
            Repr::Int(v) => Ok(Amount::from(v)),
            Repr::Text(s) => s
                .trim()
                .parse::<Amount>()
                .map_err(|e| de::Error::custom(format!("invalid amount {s:?}: {e}"))),
        }
    }
}
