//! # Storage Traits
//!
//! This module defines the storage abstraction traits that allow different
//! storage backends to be used interchangeably in the domain layer.
//!
//! The domain layer never reaches a backend directly; it only sees these
//! traits. Getters return `Ok(None)` for unknown ids so the domain layer can
//! decide which typed error a miss maps to.

use anyhow::Result;
use async_trait::async_trait;
use shared::Role;

use crate::domain::models::{Child, Parent, Reward, Task};

/// Interface for account, parent and child storage operations.
#[async_trait]
pub trait IdentityStorage: Send + Sync {
    /// Store a newly registered parent.
    async fn store_parent(&self, parent: &Parent) -> Result<()>;

    /// Retrieve a parent by address.
    async fn get_parent(&self, address: &str) -> Result<Option<Parent>>;

    /// Update an existing parent (family group membership changes).
    async fn update_parent(&self, parent: &Parent) -> Result<()>;

    /// Store a newly enrolled child.
    async fn store_child(&self, child: &Child) -> Result<()>;

    /// Retrieve a child by address.
    async fn get_child(&self, address: &str) -> Result<Option<Child>>;

    /// Update an existing child (balance or membership changes).
    async fn update_child(&self, child: &Child) -> Result<()>;

    /// Role of an address. Never fails for unknown addresses; those are
    /// simply `Role::Unregistered`.
    async fn role_of(&self, address: &str) -> Result<Role>;
}

/// Interface for task storage operations.
#[async_trait]
pub trait TaskStorage: Send + Sync {
    /// Allocate the next id from the global monotonic task counter.
    async fn next_task_id(&self) -> Result<u64>;

    /// Store a new task.
    async fn store_task(&self, task: &Task) -> Result<()>;

    /// Retrieve a task by id.
    async fn get_task(&self, id: u64) -> Result<Option<Task>>;

    /// Update an existing task.
    async fn update_task(&self, task: &Task) -> Result<()>;

    /// Delete a task. Returns true if the task was found and deleted.
    async fn delete_task(&self, id: u64) -> Result<bool>;

    /// List all tasks assigned to one child, ordered by id.
    async fn list_tasks_for_child(&self, child_address: &str) -> Result<Vec<Task>>;

    /// List all tasks assigned to any of the given children, ordered by id.
    async fn list_tasks_for_children(&self, children: &[String]) -> Result<Vec<Task>>;
}

/// Interface for reward storage operations.
#[async_trait]
pub trait RewardStorage: Send + Sync {
    /// Allocate the next id from the global monotonic reward counter.
    async fn next_reward_id(&self) -> Result<u64>;

    /// Store a new reward.
    async fn store_reward(&self, reward: &Reward) -> Result<()>;

    /// Retrieve a reward by id.
    async fn get_reward(&self, id: u64) -> Result<Option<Reward>>;

    /// Update an existing reward.
    async fn update_reward(&self, reward: &Reward) -> Result<()>;

    /// Delete a reward. Returns true if the reward was found and deleted.
    async fn delete_reward(&self, id: u64) -> Result<bool>;

    /// List all rewards assigned to one child, ordered by id.
    async fn list_rewards_for_child(&self, child_address: &str) -> Result<Vec<Reward>>;

    /// List all rewards assigned to any of the given children, ordered by id.
    async fn list_rewards_for_children(&self, children: &[String]) -> Result<Vec<Reward>>;
}
