//! Typed errors for every ledger operation.
//!
//! Each variant maps to one rejection class; all of them are detected before
//! any mutation, so a failed call never leaves partial state behind. Storage
//! backend faults are wrapped transparently.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    /// Role assignment attempted on an address that already has a role.
    #[error("address is already registered")]
    AlreadyRegistered,

    /// Caller role or ownership does not satisfy the operation's requirement.
    #[error("caller is not authorized to perform this operation")]
    Unauthorized,

    /// Referenced task, reward or child does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// Operation attempted from a status that does not permit it.
    #[error("operation not permitted in the entity's current status")]
    InvalidState,

    /// Completion attempted on a task past its due date.
    #[error("task is past its due date")]
    Expired,

    /// Purchase attempted with a balance smaller than the price.
    #[error("insufficient balance: have {balance}, need {required}")]
    InsufficientBalance { balance: u128, required: u128 },

    /// `assigned_to` address is not in the caller's family group.
    #[error("{0} is not a member of the caller's family group")]
    NotFamilyMember(String),

    /// Request field failed validation (empty description, zero amount, ...).
    #[error("{0}")]
    InvalidInput(String),

    /// Storage backend fault.
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

pub type LedgerResult<T> = Result<T, LedgerError>;
