//! The ledger facade.
//!
//! [`FamilyLedger`] wires the domain services over one storage backend and
//! exposes the full operation surface a presentation layer consumes. Every
//! operation takes the caller address explicitly; there is no ambient
//! session state.
//!
//! Mutating calls are serialized through a single async mutex, so the whole
//! ledger behaves as one critical section per state-changing call: two
//! concurrent approvals of the same task can never both observe `Completed`
//! and both credit the balance. Read queries bypass the mutex and observe
//! only committed state.

use std::sync::Arc;
use tokio::sync::Mutex;

use shared::{
    AddChildRequest, AddRewardRequest, AddTaskRequest, EditRewardRequest, EditTaskRequest,
    FamilyGroupResponse, Profile, RegisterParentRequest, RewardListResponse, RewardResponse,
    Role, TaskListResponse, TaskResponse,
};

use crate::config::LedgerConfig;
use crate::domain::errors::LedgerResult;
use crate::domain::{
    AuthorizationGuard, FamilyService, IdentityService, RewardService, TaskService, TokenService,
};
use crate::storage::{IdentityStorage, MemoryStore, RewardStorage, TaskStorage};

pub struct FamilyLedger {
    identity: IdentityService,
    family: FamilyService,
    tasks: TaskService,
    rewards: RewardService,
    tokens: Arc<TokenService>,
    /// Single-writer lock: one mutating operation at a time, start to commit.
    write_lock: Mutex<()>,
}

impl FamilyLedger {
    /// Ledger over a fresh in-memory store.
    pub fn new(config: LedgerConfig) -> Self {
        let store = Arc::new(MemoryStore::new());
        Self::with_storage(store.clone(), store.clone(), store, config)
    }

    /// Ledger over externally provided storage backends.
    pub fn with_storage(
        identity: Arc<dyn IdentityStorage>,
        tasks: Arc<dyn TaskStorage>,
        rewards: Arc<dyn RewardStorage>,
        config: LedgerConfig,
    ) -> Self {
        let guard = Arc::new(AuthorizationGuard::new(identity.clone()));
        let tokens = Arc::new(TokenService::new(identity.clone(), config.token));
        Self {
            identity: IdentityService::new(identity.clone(), guard.clone()),
            family: FamilyService::new(identity, tasks.clone(), rewards.clone(), guard.clone()),
            tasks: TaskService::new(tasks, guard.clone(), tokens.clone(), config.policy),
            rewards: RewardService::new(rewards, guard, tokens.clone(), config.policy),
            tokens,
            write_lock: Mutex::new(()),
        }
    }

    // ---- identity & family group ----

    pub async fn register_parent(
        &self,
        caller: &str,
        request: RegisterParentRequest,
    ) -> LedgerResult<Profile> {
        let _write = self.write_lock.lock().await;
        self.identity.register_parent(caller, &request.name).await
    }

    pub async fn add_child(&self, caller: &str, request: AddChildRequest) -> LedgerResult<()> {
        let _write = self.write_lock.lock().await;
        self.identity
            .add_child(caller, &request.child_address, &request.name)
            .await
    }

    pub async fn remove_child(&self, caller: &str, child_address: &str) -> LedgerResult<()> {
        let _write = self.write_lock.lock().await;
        self.family.remove_child(caller, child_address).await
    }

    pub async fn role_of(&self, address: &str) -> LedgerResult<Role> {
        self.identity.role_of(address).await
    }

    pub async fn get_profile(&self, caller: &str) -> LedgerResult<Profile> {
        self.identity.get_profile(caller).await
    }

    pub async fn get_family_group(&self, caller: &str) -> LedgerResult<FamilyGroupResponse> {
        let members = self.family.get_family_group(caller).await?;
        Ok(FamilyGroupResponse { members })
    }

    // ---- tasks ----

    pub async fn add_task(&self, caller: &str, request: AddTaskRequest) -> LedgerResult<TaskResponse> {
        let _write = self.write_lock.lock().await;
        let task = self
            .tasks
            .add_task(
                caller,
                &request.child_address,
                &request.description,
                request.reward,
                request.due_date,
            )
            .await?;
        Ok(TaskResponse {
            task,
            success_message: "Task added successfully".to_string(),
        })
    }

    pub async fn edit_task(
        &self,
        caller: &str,
        request: EditTaskRequest,
    ) -> LedgerResult<TaskResponse> {
        let _write = self.write_lock.lock().await;
        let task = self
            .tasks
            .edit_task(
                caller,
                request.task_id,
                &request.description,
                request.reward,
                request.due_date,
            )
            .await?;
        Ok(TaskResponse {
            task,
            success_message: "Task updated successfully".to_string(),
        })
    }

    pub async fn delete_task(&self, caller: &str, task_id: u64) -> LedgerResult<()> {
        let _write = self.write_lock.lock().await;
        self.tasks.delete_task(caller, task_id).await
    }

    pub async fn complete_task(&self, caller: &str, task_id: u64) -> LedgerResult<TaskResponse> {
        let _write = self.write_lock.lock().await;
        let task = self.tasks.complete_task(caller, task_id).await?;
        Ok(TaskResponse {
            task,
            success_message: "Task completed, waiting for approval".to_string(),
        })
    }

    pub async fn cancel_task_completion(
        &self,
        caller: &str,
        task_id: u64,
    ) -> LedgerResult<TaskResponse> {
        let _write = self.write_lock.lock().await;
        let task = self.tasks.cancel_task_completion(caller, task_id).await?;
        Ok(TaskResponse {
            task,
            success_message: "Task completion cancelled".to_string(),
        })
    }

    pub async fn approve_task_completion(
        &self,
        caller: &str,
        task_id: u64,
    ) -> LedgerResult<TaskResponse> {
        let _write = self.write_lock.lock().await;
        let task = self.tasks.approve_task_completion(caller, task_id).await?;
        Ok(TaskResponse {
            task,
            success_message: "Task approved and reward credited".to_string(),
        })
    }

    pub async fn get_child_tasks(&self, caller: &str) -> LedgerResult<TaskListResponse> {
        let tasks = self.tasks.get_child_tasks(caller).await?;
        Ok(TaskListResponse { tasks })
    }

    pub async fn get_family_group_tasks(&self, caller: &str) -> LedgerResult<TaskListResponse> {
        let tasks = self.tasks.get_family_group_tasks(caller).await?;
        Ok(TaskListResponse { tasks })
    }

    // ---- rewards ----

    pub async fn add_reward(
        &self,
        caller: &str,
        request: AddRewardRequest,
    ) -> LedgerResult<RewardResponse> {
        let _write = self.write_lock.lock().await;
        let reward = self
            .rewards
            .add_reward(
                caller,
                &request.child_address,
                &request.description,
                request.price,
            )
            .await?;
        Ok(RewardResponse {
            reward,
            success_message: "Reward added successfully".to_string(),
        })
    }

    pub async fn edit_reward(
        &self,
        caller: &str,
        request: EditRewardRequest,
    ) -> LedgerResult<RewardResponse> {
        let _write = self.write_lock.lock().await;
        let reward = self
            .rewards
            .edit_reward(caller, request.reward_id, &request.description, request.price)
            .await?;
        Ok(RewardResponse {
            reward,
            success_message: "Reward updated successfully".to_string(),
        })
    }

    pub async fn delete_reward(&self, caller: &str, reward_id: u64) -> LedgerResult<()> {
        let _write = self.write_lock.lock().await;
        self.rewards.delete_reward(caller, reward_id).await
    }

    pub async fn purchase_reward(&self, caller: &str, reward_id: u64) -> LedgerResult<RewardResponse> {
        let _write = self.write_lock.lock().await;
        let reward = self.rewards.purchase_reward(caller, reward_id).await?;
        Ok(RewardResponse {
            reward,
            success_message: "Reward purchased".to_string(),
        })
    }

    pub async fn redeem_reward(&self, caller: &str, reward_id: u64) -> LedgerResult<RewardResponse> {
        let _write = self.write_lock.lock().await;
        let reward = self.rewards.redeem_reward(caller, reward_id).await?;
        Ok(RewardResponse {
            reward,
            success_message: "Reward redeemed, waiting for approval".to_string(),
        })
    }

    pub async fn cancel_reward_redemption(
        &self,
        caller: &str,
        reward_id: u64,
    ) -> LedgerResult<RewardResponse> {
        let _write = self.write_lock.lock().await;
        let reward = self.rewards.cancel_reward_redemption(caller, reward_id).await?;
        Ok(RewardResponse {
            reward,
            success_message: "Redemption cancelled".to_string(),
        })
    }

    pub async fn approve_reward_redemption(
        &self,
        caller: &str,
        reward_id: u64,
    ) -> LedgerResult<RewardResponse> {
        let _write = self.write_lock.lock().await;
        let reward = self.rewards.approve_reward_redemption(caller, reward_id).await?;
        Ok(RewardResponse {
            reward,
            success_message: "Redemption approved".to_string(),
        })
    }

    pub async fn get_child_rewards(&self, caller: &str) -> LedgerResult<RewardListResponse> {
        let rewards = self.rewards.get_child_rewards(caller).await?;
        Ok(RewardListResponse { rewards })
    }

    pub async fn get_family_group_rewards(&self, caller: &str) -> LedgerResult<RewardListResponse> {
        let rewards = self.rewards.get_family_group_rewards(caller).await?;
        Ok(RewardListResponse { rewards })
    }

    // ---- token ----

    pub async fn balance_of(&self, address: &str) -> LedgerResult<u128> {
        self.tokens.balance_of(address).await
    }

    pub fn symbol(&self) -> &str {
        self.tokens.symbol()
    }

    pub fn decimals(&self) -> u8 {
        self.tokens.decimals()
    }
}
