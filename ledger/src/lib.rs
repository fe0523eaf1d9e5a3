//! # Family Ledger
//!
//! Core ledger for a family chore-and-allowance system: parents register,
//! enrol children into a family group, assign tasks (chores) and rewards
//! (prizes) priced in a fungible token, and approve or reject the children's
//! claims.
//!
//! The crate is organized the same way as the rest of the backend stack:
//!
//! - **domain**: business logic — identity, family group membership, the task
//!   and reward state machines, token accounting, and the authorization guard
//!   evaluated before every mutation.
//! - **storage**: the storage abstraction traits plus the in-memory backend.
//!   Persistence media are external collaborators; a real backend plugs in at
//!   the trait seam without touching the domain layer.
//! - **ledger**: the [`FamilyLedger`] facade wiring everything together and
//!   exposing the operation surface a presentation layer consumes.
//!
//! All monetary values are integers in base units (scaled by `10^decimals`);
//! the ledger performs no unit conversion and no floating-point arithmetic.

pub mod config;
pub mod domain;
pub mod ledger;
pub mod storage;

pub use config::{CancelActor, LedgerConfig, LedgerPolicy, TokenConfig};
pub use domain::errors::{LedgerError, LedgerResult};
pub use ledger::FamilyLedger;
