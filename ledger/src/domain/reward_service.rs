//! Reward ledger: CRUD and the prize redemption workflow.
//!
//! Status machine: `Open → Purchased → Redeemed → Approved`, with
//! `Redeemed → Purchased` as the cancel. Token movement is asymmetric to
//! tasks: the price is debited at purchase time (escrow) and never moves
//! again — redemption and approval only finalize the claim.

use log::info;
use std::sync::Arc;

use shared::RewardView;

use crate::config::{CancelActor, LedgerPolicy};
use crate::domain::authorization::AuthorizationGuard;
use crate::domain::errors::{LedgerError, LedgerResult};
use crate::domain::models::{Reward, RewardStatus};
use crate::domain::token_service::TokenService;
use crate::domain::unix_now;
use crate::storage::RewardStorage;

const MAX_DESCRIPTION_LEN: usize = 256;

#[derive(Clone)]
pub struct RewardService {
    rewards: Arc<dyn RewardStorage>,
    guard: Arc<AuthorizationGuard>,
    tokens: Arc<TokenService>,
    policy: LedgerPolicy,
}

impl RewardService {
    pub fn new(
        rewards: Arc<dyn RewardStorage>,
        guard: Arc<AuthorizationGuard>,
        tokens: Arc<TokenService>,
        policy: LedgerPolicy,
    ) -> Self {
        Self {
            rewards,
            guard,
            tokens,
            policy,
        }
    }

    /// Create an open reward for a child in the caller's family group.
    pub async fn add_reward(
        &self,
        caller: &str,
        child_address: &str,
        description: &str,
        price: u128,
    ) -> LedgerResult<RewardView> {
        validate_fields(description, price)?;
        self.guard.require_member(caller, child_address).await?;

        let id = self.rewards.next_reward_id().await?;
        let reward = Reward::new(id, description.trim(), price, child_address);
        self.rewards.store_reward(&reward).await?;

        info!("reward {id} assigned to {child_address} by {caller}");
        Ok(reward.to_view())
    }

    /// Edit an open reward in place.
    pub async fn edit_reward(
        &self,
        caller: &str,
        reward_id: u64,
        description: &str,
        price: u128,
    ) -> LedgerResult<RewardView> {
        validate_fields(description, price)?;
        let mut reward = self.load(reward_id).await?;
        self.guard.require_owner(caller, &reward.assigned_to).await?;
        if !reward.is_editable() {
            return Err(LedgerError::InvalidState);
        }

        reward.description = description.trim().to_string();
        reward.price = price;
        self.rewards.update_reward(&reward).await?;

        info!("reward {reward_id} edited by {caller}");
        Ok(reward.to_view())
    }

    /// Delete a reward. Open always; Purchased only when policy allows
    /// deleting settled entities (optionally refunding the escrowed price);
    /// Redeemed and Approved never.
    pub async fn delete_reward(&self, caller: &str, reward_id: u64) -> LedgerResult<()> {
        let reward = self.load(reward_id).await?;
        self.guard.require_owner(caller, &reward.assigned_to).await?;

        let refund = match reward.status {
            RewardStatus::Open => 0,
            RewardStatus::Purchased if self.policy.allow_delete_settled => {
                if self.policy.refund_on_delete {
                    reward.price
                } else {
                    0
                }
            }
            _ => return Err(LedgerError::InvalidState),
        };

        self.rewards.delete_reward(reward_id).await?;
        if refund > 0 {
            self.tokens.credit(&reward.assigned_to, refund).await?;
            info!("reward {reward_id} deleted by {caller}, refunded {refund}");
        } else {
            info!("reward {reward_id} deleted by {caller}");
        }
        Ok(())
    }

    /// Assigned child buys the reward; the price is debited immediately and
    /// held in escrow. Fails in full when the balance is short.
    pub async fn purchase_reward(&self, caller: &str, reward_id: u64) -> LedgerResult<RewardView> {
        let mut reward = self.load(reward_id).await?;
        let child = self
            .guard
            .require_assignee(caller, &reward.assigned_to)
            .await?;
        if reward.status != RewardStatus::Open {
            return Err(LedgerError::InvalidState);
        }
        if child.balance < reward.price {
            return Err(LedgerError::InsufficientBalance {
                balance: child.balance,
                required: reward.price,
            });
        }

        self.tokens.debit(&reward.assigned_to, reward.price).await?;
        reward.status = RewardStatus::Purchased;
        reward.purchase_date = unix_now();
        self.rewards.update_reward(&reward).await?;

        info!("reward {reward_id} purchased by {caller} for {}", reward.price);
        Ok(reward.to_view())
    }

    /// Assigned child asks to cash in a purchased reward. No token movement;
    /// the price was already escrowed at purchase.
    pub async fn redeem_reward(&self, caller: &str, reward_id: u64) -> LedgerResult<RewardView> {
        let mut reward = self.load(reward_id).await?;
        self.guard
            .require_assignee(caller, &reward.assigned_to)
            .await?;
        if reward.status != RewardStatus::Purchased {
            return Err(LedgerError::InvalidState);
        }

        reward.status = RewardStatus::Redeemed;
        reward.redemption_date = unix_now();
        self.rewards.update_reward(&reward).await?;

        info!("reward {reward_id} redeemed by {caller}");
        Ok(reward.to_view())
    }

    /// Reverse a redemption request; the reward drops back to Purchased with
    /// no balance change.
    pub async fn cancel_reward_redemption(
        &self,
        caller: &str,
        reward_id: u64,
    ) -> LedgerResult<RewardView> {
        let mut reward = self.load(reward_id).await?;
        match self.policy.redemption_cancel_actor {
            CancelActor::Parent => {
                self.guard.require_owner(caller, &reward.assigned_to).await?;
            }
            CancelActor::Child => {
                self.guard
                    .require_assignee(caller, &reward.assigned_to)
                    .await?;
            }
        }
        if reward.status != RewardStatus::Redeemed {
            return Err(LedgerError::InvalidState);
        }

        reward.status = RewardStatus::Purchased;
        reward.redemption_date = 0;
        self.rewards.update_reward(&reward).await?;

        info!("reward {reward_id} redemption cancelled by {caller}");
        Ok(reward.to_view())
    }

    /// Parent finalizes a redeemed reward. Terminal; the escrowed tokens
    /// remain spent.
    pub async fn approve_reward_redemption(
        &self,
        caller: &str,
        reward_id: u64,
    ) -> LedgerResult<RewardView> {
        let mut reward = self.load(reward_id).await?;
        self.guard.require_owner(caller, &reward.assigned_to).await?;
        if reward.status != RewardStatus::Redeemed {
            return Err(LedgerError::InvalidState);
        }

        reward.status = RewardStatus::Approved;
        reward.approval_date = unix_now();
        self.rewards.update_reward(&reward).await?;

        info!("reward {reward_id} redemption approved by {caller}");
        Ok(reward.to_view())
    }

    /// Rewards of the calling child.
    pub async fn get_child_rewards(&self, caller: &str) -> LedgerResult<Vec<RewardView>> {
        let child = self.guard.require_child(caller).await?;
        Ok(self
            .rewards
            .list_rewards_for_child(&child.address)
            .await?
            .iter()
            .map(Reward::to_view)
            .collect())
    }

    /// All rewards across the calling parent's family group, ordered by id.
    pub async fn get_family_group_rewards(&self, caller: &str) -> LedgerResult<Vec<RewardView>> {
        let parent = self.guard.require_parent(caller).await?;
        Ok(self
            .rewards
            .list_rewards_for_children(&parent.children)
            .await?
            .iter()
            .map(Reward::to_view)
            .collect())
    }

    async fn load(&self, reward_id: u64) -> LedgerResult<Reward> {
        self.rewards
            .get_reward(reward_id)
            .await?
            .ok_or_else(|| LedgerError::NotFound(format!("reward {reward_id}")))
    }
}

fn validate_fields(description: &str, price: u128) -> LedgerResult<()> {
    if description.trim().is_empty() {
        return Err(LedgerError::InvalidInput(
            "description cannot be empty".to_string(),
        ));
    }
    if description.len() > MAX_DESCRIPTION_LEN {
        return Err(LedgerError::InvalidInput(format!(
            "description cannot exceed {MAX_DESCRIPTION_LEN} characters"
        )));
    }
    if price == 0 {
        return Err(LedgerError::InvalidInput(
            "price must be greater than zero".to_string(),
        ));
    }
    Ok(())
}
