//! In-memory storage backend.
//!
//! All entity collections live in one `RwLock`-guarded state, so a read
//! always observes fully committed entities. The two id counters are global
//! and monotonic, starting at 1, matching the contract the domain layer
//! relies on for family-wide ordering.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use shared::Role;

use crate::domain::models::{Child, Parent, Reward, Task};
use crate::storage::traits::{IdentityStorage, RewardStorage, TaskStorage};

#[derive(Debug)]
struct StoreState {
    parents: HashMap<String, Parent>,
    children: HashMap<String, Child>,
    tasks: BTreeMap<u64, Task>,
    rewards: BTreeMap<u64, Reward>,
    next_task_id: u64,
    next_reward_id: u64,
}

impl Default for StoreState {
    fn default() -> Self {
        Self {
            parents: HashMap::new(),
            children: HashMap::new(),
            tasks: BTreeMap::new(),
            rewards: BTreeMap::new(),
            next_task_id: 1,
            next_reward_id: 1,
        }
    }
}

/// In-memory backend implementing all three storage traits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<StoreState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, StoreState>> {
        self.state.read().map_err(|_| anyhow!("ledger store lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, StoreState>> {
        self.state.write().map_err(|_| anyhow!("ledger store lock poisoned"))
    }
}

#[async_trait]
impl IdentityStorage for MemoryStore {
    async fn store_parent(&self, parent: &Parent) -> Result<()> {
        let mut state = self.write()?;
        state.parents.insert(parent.address.clone(), parent.clone());
        Ok(())
    }

    async fn get_parent(&self, address: &str) -> Result<Option<Parent>> {
        Ok(self.read()?.parents.get(address).cloned())
    }

    async fn update_parent(&self, parent: &Parent) -> Result<()> {
        let mut state = self.write()?;
        if !state.parents.contains_key(&parent.address) {
            return Err(anyhow!("parent {} not stored", parent.address));
        }
        state.parents.insert(parent.address.clone(), parent.clone());
        Ok(())
    }

    async fn store_child(&self, child: &Child) -> Result<()> {
        let mut state = self.write()?;
        state.children.insert(child.address.clone(), child.clone());
        Ok(())
    }

    async fn get_child(&self, address: &str) -> Result<Option<Child>> {
        Ok(self.read()?.children.get(address).cloned())
    }

    async fn update_child(&self, child: &Child) -> Result<()> {
        let mut state = self.write()?;
        if !state.children.contains_key(&child.address) {
            return Err(anyhow!("child {} not stored", child.address));
        }
        state.children.insert(child.address.clone(), child.clone());
        Ok(())
    }

    async fn role_of(&self, address: &str) -> Result<Role> {
        let state = self.read()?;
        if state.parents.contains_key(address) {
            Ok(Role::Parent)
        } else if state.children.contains_key(address) {
            Ok(Role::Child)
        } else {
            Ok(Role::Unregistered)
        }
    }
}

#[async_trait]
impl TaskStorage for MemoryStore {
    async fn next_task_id(&self) -> Result<u64> {
        let mut state = self.write()?;
        let id = state.next_task_id;
        state.next_task_id += 1;
        Ok(id)
    }

    async fn store_task(&self, task: &Task) -> Result<()> {
        let mut state = self.write()?;
        state.tasks.insert(task.id, task.clone());
        Ok(())
    }

    async fn get_task(&self, id: u64) -> Result<Option<Task>> {
        Ok(self.read()?.tasks.get(&id).cloned())
    }

    async fn update_task(&self, task: &Task) -> Result<()> {
        let mut state = self.write()?;
        if !state.tasks.contains_key(&task.id) {
            return Err(anyhow!("task {} not stored", task.id));
        }
        state.tasks.insert(task.id, task.clone());
        Ok(())
    }

    async fn delete_task(&self, id: u64) -> Result<bool> {
        Ok(self.write()?.tasks.remove(&id).is_some())
    }

    async fn list_tasks_for_child(&self, child_address: &str) -> Result<Vec<Task>> {
        let state = self.read()?;
        Ok(state
            .tasks
            .values()
            .filter(|t| t.assigned_to == child_address)
            .cloned()
            .collect())
    }

    async fn list_tasks_for_children(&self, children: &[String]) -> Result<Vec<Task>> {
        let state = self.read()?;
        Ok(state
            .tasks
            .values()
            .filter(|t| children.iter().any(|c| *c == t.assigned_to))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl RewardStorage for MemoryStore {
    async fn next_reward_id(&self) -> Result<u64> {
        let mut state = self.write()?;
        let id = state.next_reward_id;
        state.next_reward_id += 1;
        Ok(id)
    }

    async fn store_reward(&self, reward: &Reward) -> Result<()> {
        let mut state = self.write()?;
        state.rewards.insert(reward.id, reward.clone());
        Ok(())
    }

    async fn get_reward(&self, id: u64) -> Result<Option<Reward>> {
        Ok(self.read()?.rewards.get(&id).cloned())
    }

    async fn update_reward(&self, reward: &Reward) -> Result<()> {
        let mut state = self.write()?;
        if !state.rewards.contains_key(&reward.id) {
            return Err(anyhow!("reward {} not stored", reward.id));
        }
        state.rewards.insert(reward.id, reward.clone());
        Ok(())
    }

    async fn delete_reward(&self, id: u64) -> Result<bool> {
        Ok(self.write()?.rewards.remove(&id).is_some())
    }

    async fn list_rewards_for_child(&self, child_address: &str) -> Result<Vec<Reward>> {
        let state = self.read()?;
        Ok(state
            .rewards
            .values()
            .filter(|r| r.assigned_to == child_address)
            .cloned()
            .collect())
    }

    async fn list_rewards_for_children(&self, children: &[String]) -> Result<Vec<Reward>> {
        let state = self.read()?;
        Ok(state
            .rewards
            .values()
            .filter(|r| children.iter().any(|c| *c == r.assigned_to))
            .cloned()
            .collect())
    }
}
