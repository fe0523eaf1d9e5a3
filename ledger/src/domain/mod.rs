//! # Domain Module
//!
//! Business logic of the family ledger: who may do what, which status
//! transitions are legal, and when tokens move.
//!
//! ## Module Organization
//!
//! - **models**: the domain entities (`Parent`, `Child`, `Task`, `Reward`)
//!   and their status enums.
//! - **errors**: the typed error every operation resolves to.
//! - **authorization**: the guard evaluated before every mutating call.
//! - **identity_service**: parent registration and child enrolment.
//! - **family_service**: the parent↔child membership graph and the family
//!   group summary query.
//! - **token_service**: the per-child balance ledger; credit and debit are
//!   crate-private and only reachable through task approval and reward
//!   purchase.
//! - **task_service**: the task state machine (`Open → Completed → Approved`
//!   with completion cancel).
//! - **reward_service**: the reward state machine (`Open → Purchased →
//!   Redeemed → Approved` with redemption cancel).
//!
//! ## Core Rules
//!
//! - Every mutating operation validates completely (authorization, existence,
//!   status, balance) before changing any state; failures leave the ledger
//!   untouched.
//! - A child's balance changes only when a task is approved (credit) or a
//!   reward is purchased (debit).
//! - `Approved` is terminal for both tasks and rewards.
//! - Expiry is derived from the due date against the current clock on every
//!   read and transition attempt; it is never stored.

pub mod authorization;
pub mod errors;
pub mod family_service;
pub mod identity_service;
pub mod models;
pub mod reward_service;
pub mod task_service;
pub mod token_service;

pub use authorization::AuthorizationGuard;
pub use family_service::FamilyService;
pub use identity_service::IdentityService;
pub use reward_service::RewardService;
pub use task_service::TaskService;
pub use token_service::TokenService;

/// Current wall-clock time as unix seconds.
///
/// Expiry checks go through here; there are no background timers.
pub(crate) fn unix_now() -> u64 {
    chrono::Utc::now().timestamp().max(0) as u64
}
