//! Family group membership graph and the family group summary query.
//!
//! The summary aggregates, per child, the current balance plus task and
//! reward counters broken down by status, the numbers the parent dashboard
//! renders on each child card.

use log::{info, warn};
use std::sync::Arc;

use shared::{FamilyGroupMember, RewardsCounter, TasksCounter};

use crate::domain::authorization::AuthorizationGuard;
use crate::domain::errors::{LedgerError, LedgerResult};
use crate::domain::models::{Child, Parent, RewardStatus, TaskStatus};
use crate::domain::unix_now;
use crate::storage::{IdentityStorage, RewardStorage, TaskStorage};

#[derive(Clone)]
pub struct FamilyService {
    identity: Arc<dyn IdentityStorage>,
    tasks: Arc<dyn TaskStorage>,
    rewards: Arc<dyn RewardStorage>,
    guard: Arc<AuthorizationGuard>,
}

impl FamilyService {
    pub fn new(
        identity: Arc<dyn IdentityStorage>,
        tasks: Arc<dyn TaskStorage>,
        rewards: Arc<dyn RewardStorage>,
        guard: Arc<AuthorizationGuard>,
    ) -> Self {
        Self {
            identity,
            tasks,
            rewards,
            guard,
        }
    }

    /// Parent owning `child_address`, if the child is currently enrolled.
    pub async fn parent_of(&self, child_address: &str) -> LedgerResult<Parent> {
        let child = self
            .identity
            .get_child(child_address)
            .await?
            .ok_or_else(|| LedgerError::NotFound(format!("child {child_address}")))?;
        let parent_address = child
            .parent
            .ok_or_else(|| LedgerError::NotFound(format!("parent of {child_address}")))?;
        self.identity
            .get_parent(&parent_address)
            .await?
            .ok_or_else(|| LedgerError::NotFound(format!("parent {parent_address}")))
    }

    /// Whether `child_address` is in `parent_address`'s family group.
    pub async fn is_member(&self, parent_address: &str, child_address: &str) -> LedgerResult<bool> {
        Ok(self
            .identity
            .get_parent(parent_address)
            .await?
            .map(|p| p.is_member(child_address))
            .unwrap_or(false))
    }

    /// Children enrolled in `parent_address`'s family group.
    pub async fn family_group_of(&self, parent_address: &str) -> LedgerResult<Vec<Child>> {
        let parent = self
            .identity
            .get_parent(parent_address)
            .await?
            .ok_or_else(|| LedgerError::NotFound(format!("parent {parent_address}")))?;
        self.children_of(&parent).await
    }

    /// Family group summary for the calling parent: one entry per child with
    /// balance and per-status task/reward counters.
    pub async fn get_family_group(&self, caller: &str) -> LedgerResult<Vec<FamilyGroupMember>> {
        let parent = self.guard.require_parent(caller).await?;
        let now = unix_now();

        let mut members = Vec::with_capacity(parent.children.len());
        for child in self.children_of(&parent).await? {
            let mut tasks_counter = TasksCounter::default();
            for task in self.tasks.list_tasks_for_child(&child.address).await? {
                tasks_counter.assigned += 1;
                if task.is_expired(now) {
                    tasks_counter.expired += 1;
                }
                match task.status {
                    TaskStatus::Open => {}
                    TaskStatus::Completed => tasks_counter.completed += 1,
                    TaskStatus::Approved => {
                        tasks_counter.approved += 1;
                        tasks_counter.tokens_earned += task.reward;
                    }
                }
            }

            let mut rewards_counter = RewardsCounter::default();
            for reward in self.rewards.list_rewards_for_child(&child.address).await? {
                rewards_counter.assigned += 1;
                rewards_counter.tokens_spent += reward.tokens_spent();
                match reward.status {
                    RewardStatus::Open => {}
                    RewardStatus::Purchased => rewards_counter.purchased += 1,
                    RewardStatus::Redeemed => rewards_counter.redeemed += 1,
                    RewardStatus::Approved => rewards_counter.approved += 1,
                }
            }

            members.push(FamilyGroupMember {
                address: child.address,
                name: child.name,
                balance: child.balance,
                tasks_counter,
                rewards_counter,
            });
        }
        Ok(members)
    }

    /// Remove a child from the caller's family group.
    ///
    /// Refused while the child has any non-terminal task or reward, so no
    /// ledger entry is ever orphaned mid-workflow. The child record itself
    /// persists, keeping its balance and role; only the membership link is
    /// severed.
    pub async fn remove_child(&self, caller: &str, child_address: &str) -> LedgerResult<()> {
        let (mut parent, mut child) = self.guard.require_member(caller, child_address).await?;

        let open_tasks = self
            .tasks
            .list_tasks_for_child(child_address)
            .await?
            .iter()
            .any(|t| t.status != TaskStatus::Approved);
        let open_rewards = self
            .rewards
            .list_rewards_for_child(child_address)
            .await?
            .iter()
            .any(|r| r.status != RewardStatus::Approved);
        if open_tasks || open_rewards {
            warn!("refusing to remove {child_address}: outstanding tasks or rewards");
            return Err(LedgerError::InvalidState);
        }

        parent.children.retain(|c| c != child_address);
        child.parent = None;
        self.identity.update_parent(&parent).await?;
        self.identity.update_child(&child).await?;

        info!("removed child {child_address} from {caller}'s family group");
        Ok(())
    }

    async fn children_of(&self, parent: &Parent) -> LedgerResult<Vec<Child>> {
        let mut children = Vec::with_capacity(parent.children.len());
        for address in &parent.children {
            let child = self
                .identity
                .get_child(address)
                .await?
                .ok_or_else(|| LedgerError::NotFound(format!("child {address}")))?;
            children.push(child);
        }
        Ok(children)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TokenConfig;
    use crate::domain::identity_service::IdentityService;
    use crate::domain::token_service::TokenService;
    use crate::storage::MemoryStore;

    struct Fixture {
        identity: IdentityService,
        family: FamilyService,
        tokens: TokenService,
        store: Arc<MemoryStore>,
    }

    async fn setup() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let guard = Arc::new(AuthorizationGuard::new(store.clone()));
        let identity = IdentityService::new(store.clone(), guard.clone());
        let tokens = TokenService::new(store.clone(), TokenConfig::default());
        let family = FamilyService::new(store.clone(), store.clone(), store.clone(), guard);

        identity.register_parent("0xalice", "Alice").await.unwrap();
        identity.add_child("0xalice", "0xbob", "Bob").await.unwrap();
        identity
            .add_child("0xalice", "0xgrace", "Grace")
            .await
            .unwrap();

        Fixture {
            identity,
            family,
            tokens,
            store,
        }
    }

    #[tokio::test]
    async fn membership_graph_is_consistent() {
        let fx = setup().await;

        let parent = fx.family.parent_of("0xbob").await.unwrap();
        assert_eq!(parent.address, "0xalice");
        assert!(fx.family.is_member("0xalice", "0xbob").await.unwrap());
        assert!(!fx.family.is_member("0xalice", "0xnobody").await.unwrap());

        let group = fx.family.family_group_of("0xalice").await.unwrap();
        let names: Vec<&str> = group.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Bob", "Grace"]);
    }

    #[tokio::test]
    async fn summary_reports_balances_and_counters() {
        let fx = setup().await;
        fx.tokens.credit("0xbob", 20).await.unwrap();

        use crate::domain::models::Task;
        let mut approved = Task::new(1, "Clean your bedroom", 20, "0xbob", 0);
        approved.status = TaskStatus::Approved;
        fx.store.store_task(&approved).await.unwrap();
        fx.store
            .store_task(&Task::new(2, "Feed and walk the dog", 5, "0xbob", 0))
            .await
            .unwrap();

        let members = fx.family.get_family_group("0xalice").await.unwrap();
        assert_eq!(members.len(), 2);
        let bob = &members[0];
        assert_eq!(bob.name, "Bob");
        assert_eq!(bob.balance, 20);
        assert_eq!(bob.tasks_counter.assigned, 2);
        assert_eq!(bob.tasks_counter.approved, 1);
        assert_eq!(bob.tasks_counter.tokens_earned, 20);
        assert_eq!(members[1].tasks_counter.assigned, 0);
    }

    #[tokio::test]
    async fn summary_requires_parent_caller() {
        let fx = setup().await;
        assert!(matches!(
            fx.family.get_family_group("0xbob").await,
            Err(LedgerError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn remove_child_refused_while_entries_outstanding() {
        let fx = setup().await;

        use crate::domain::models::Task;
        fx.store
            .store_task(&Task::new(1, "Water the plants", 3, "0xbob", 0))
            .await
            .unwrap();

        assert!(matches!(
            fx.family.remove_child("0xalice", "0xbob").await,
            Err(LedgerError::InvalidState)
        ));
        // Still a member.
        assert!(fx.family.is_member("0xalice", "0xbob").await.unwrap());
    }

    #[tokio::test]
    async fn remove_child_severs_membership_but_keeps_record() {
        let fx = setup().await;
        fx.tokens.credit("0xgrace", 7).await.unwrap();

        fx.family.remove_child("0xalice", "0xgrace").await.unwrap();

        assert!(!fx.family.is_member("0xalice", "0xgrace").await.unwrap());
        assert!(fx.family.parent_of("0xgrace").await.is_err());
        // Balance and role survive removal.
        assert_eq!(fx.tokens.balance_of("0xgrace").await.unwrap(), 7);
        assert_eq!(
            fx.identity.role_of("0xgrace").await.unwrap(),
            shared::Role::Child
        );
    }
}
