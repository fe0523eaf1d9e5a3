use shared::{RewardStatusView, RewardView};

/// Stored status of a reward.
///
/// Tokens move at `Open → Purchased` (escrow debit), never again afterwards;
/// `Approved` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewardStatus {
    Open,
    Purchased,
    Redeemed,
    Approved,
}

/// A prize a child can buy with earned tokens.
///
/// `price` is in token base units, debited from the child's balance at
/// purchase time. Date fields are unix seconds, 0 when unset;
/// `redemption_date` is cleared again if the redemption is cancelled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reward {
    pub id: u64,
    pub description: String,
    pub price: u128,
    pub assigned_to: String,
    pub status: RewardStatus,
    pub purchase_date: u64,
    pub redemption_date: u64,
    pub approval_date: u64,
}

impl Reward {
    pub fn new(
        id: u64,
        description: impl Into<String>,
        price: u128,
        assigned_to: impl Into<String>,
    ) -> Self {
        Self {
            id,
            description: description.into(),
            price,
            assigned_to: assigned_to.into(),
            status: RewardStatus::Open,
            purchase_date: 0,
            redemption_date: 0,
            approval_date: 0,
        }
    }

    /// Editing and deletion are permitted while the reward is still Open.
    pub fn is_editable(&self) -> bool {
        self.status == RewardStatus::Open
    }

    /// The escrowed price counts as spent from purchase onwards.
    pub fn tokens_spent(&self) -> u128 {
        match self.status {
            RewardStatus::Open => 0,
            RewardStatus::Purchased | RewardStatus::Redeemed | RewardStatus::Approved => self.price,
        }
    }

    /// Presentation view of the reward.
    pub fn to_view(&self) -> RewardView {
        let status = match self.status {
            RewardStatus::Open => RewardStatusView::Open,
            RewardStatus::Purchased => RewardStatusView::Purchased,
            RewardStatus::Redeemed => RewardStatusView::Redeemed,
            RewardStatus::Approved => RewardStatusView::Approved,
        };
        RewardView {
            id: self.id,
            description: self.description.clone(),
            price: self.price,
            assigned_to: self.assigned_to.clone(),
            status,
            purchase_date: self.purchase_date,
            redemption_date: self.redemption_date,
            approval_date: self.approval_date,
        }
    }
}
