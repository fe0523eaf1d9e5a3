//! Ledger configuration.
//!
//! A [`LedgerConfig`] value is handed to the ledger at construction time and
//! never read from ambient global state. Besides the token parameters it
//! carries a [`LedgerPolicy`], the knobs for behavior the product left open
//! (who may reverse which transition, and what deletion is allowed to touch).

/// Which actor may invoke a reversal transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelActor {
    /// The parent owning the entity's assigned child.
    Parent,
    /// The child the entity is assigned to.
    Child,
}

/// Policy knobs for the task and reward state machines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerPolicy {
    /// Who may call `cancel_task_completion`.
    pub task_cancel_actor: CancelActor,
    /// Who may call `cancel_reward_redemption`.
    pub redemption_cancel_actor: CancelActor,
    /// Permit `delete_task` on a Completed task and `delete_reward` on a
    /// Purchased reward. Approved entities are never deletable.
    pub allow_delete_settled: bool,
    /// When a Purchased reward is deleted (requires `allow_delete_settled`),
    /// credit the escrowed price back to the child.
    pub refund_on_delete: bool,
}

impl Default for LedgerPolicy {
    fn default() -> Self {
        Self {
            task_cancel_actor: CancelActor::Parent,
            redemption_cancel_actor: CancelActor::Child,
            allow_delete_settled: false,
            refund_on_delete: false,
        }
    }
}

/// Fixed-point parameters of the token the ledger accounts in.
///
/// Purely descriptive: every amount crossing the ledger boundary is already
/// an integer in base units, and the ledger never converts or rounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenConfig {
    pub symbol: String,
    pub decimals: u8,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            symbol: "FCT".to_string(),
            decimals: 18,
        }
    }
}

/// Top-level ledger configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LedgerConfig {
    pub token: TokenConfig,
    pub policy: LedgerPolicy,
}
