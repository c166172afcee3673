//! Ledger error types.

use thiserror::Error;

use crate::types::ProjectId;

/// Coarse classification of a [`LedgerError`], used by adapters to pick a
/// transport-level status.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Overflow,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Project not found")]
    ProjectNotFound(ProjectId),

    #[error("No shares found for project")]
    SharesNotFound(ProjectId),

    #[error("Amount overflow")]
    Overflow,
}

impl LedgerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ProjectNotFound(_) | Self::SharesNotFound(_) => ErrorKind::NotFound,
            Self::Overflow => ErrorKind::Overflow,
        }
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;
