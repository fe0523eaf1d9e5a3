//! Task ledger: CRUD and the chore approval workflow.
//!
//! Status machine: `Open → Completed → Approved`, with `Completed → Open` as
//! the parent-side cancel. Deletion is only reachable from `Open` (expired or
//! not) unless policy permits deleting settled entities. The child's balance
//! is credited exactly once, at approval.

use log::info;
use std::sync::Arc;

use shared::TaskView;

use crate::config::{CancelActor, LedgerPolicy};
use crate::domain::authorization::AuthorizationGuard;
use crate::domain::errors::{LedgerError, LedgerResult};
use crate::domain::models::{Task, TaskStatus};
use crate::domain::token_service::TokenService;
use crate::domain::unix_now;
use crate::storage::TaskStorage;

const MAX_DESCRIPTION_LEN: usize = 256;

#[derive(Clone)]
pub struct TaskService {
    tasks: Arc<dyn TaskStorage>,
    guard: Arc<AuthorizationGuard>,
    tokens: Arc<TokenService>,
    policy: LedgerPolicy,
}

impl TaskService {
    pub fn new(
        tasks: Arc<dyn TaskStorage>,
        guard: Arc<AuthorizationGuard>,
        tokens: Arc<TokenService>,
        policy: LedgerPolicy,
    ) -> Self {
        Self {
            tasks,
            guard,
            tokens,
            policy,
        }
    }

    /// Create an open task for a child in the caller's family group.
    pub async fn add_task(
        &self,
        caller: &str,
        child_address: &str,
        description: &str,
        reward: u128,
        due_date: u64,
    ) -> LedgerResult<TaskView> {
        validate_fields(description, reward)?;
        self.guard.require_member(caller, child_address).await?;

        let id = self.tasks.next_task_id().await?;
        let task = Task::new(id, description.trim(), reward, child_address, due_date);
        self.tasks.store_task(&task).await?;

        info!("task {id} assigned to {child_address} by {caller}");
        Ok(task.to_view(unix_now()))
    }

    /// Edit an open (possibly expired) task in place.
    pub async fn edit_task(
        &self,
        caller: &str,
        task_id: u64,
        description: &str,
        reward: u128,
        due_date: u64,
    ) -> LedgerResult<TaskView> {
        validate_fields(description, reward)?;
        let mut task = self.load(task_id).await?;
        self.guard.require_owner(caller, &task.assigned_to).await?;
        if !task.is_editable() {
            return Err(LedgerError::InvalidState);
        }

        task.description = description.trim().to_string();
        task.reward = reward;
        task.due_date = due_date;
        self.tasks.update_task(&task).await?;

        info!("task {task_id} edited by {caller}");
        Ok(task.to_view(unix_now()))
    }

    /// Delete a task. Open (incl. expired) always; Completed only when
    /// policy allows deleting settled entities; Approved never.
    pub async fn delete_task(&self, caller: &str, task_id: u64) -> LedgerResult<()> {
        let task = self.load(task_id).await?;
        self.guard.require_owner(caller, &task.assigned_to).await?;

        let deletable = match task.status {
            TaskStatus::Open => true,
            TaskStatus::Completed => self.policy.allow_delete_settled,
            TaskStatus::Approved => false,
        };
        if !deletable {
            return Err(LedgerError::InvalidState);
        }
        self.tasks.delete_task(task_id).await?;

        info!("task {task_id} deleted by {caller}");
        Ok(())
    }

    /// Assigned child marks the task done. Rejected past the due date.
    pub async fn complete_task(&self, caller: &str, task_id: u64) -> LedgerResult<TaskView> {
        let mut task = self.load(task_id).await?;
        self.guard.require_assignee(caller, &task.assigned_to).await?;
        if task.status != TaskStatus::Open {
            return Err(LedgerError::InvalidState);
        }
        let now = unix_now();
        if task.is_expired(now) {
            return Err(LedgerError::Expired);
        }

        task.status = TaskStatus::Completed;
        task.completion_date = now;
        self.tasks.update_task(&task).await?;

        info!("task {task_id} completed by {caller}");
        Ok(task.to_view(now))
    }

    /// Reverse a completion claim; the task becomes open again.
    pub async fn cancel_task_completion(&self, caller: &str, task_id: u64) -> LedgerResult<TaskView> {
        let mut task = self.load(task_id).await?;
        match self.policy.task_cancel_actor {
            CancelActor::Parent => {
                self.guard.require_owner(caller, &task.assigned_to).await?;
            }
            CancelActor::Child => {
                self.guard.require_assignee(caller, &task.assigned_to).await?;
            }
        }
        if task.status != TaskStatus::Completed {
            return Err(LedgerError::InvalidState);
        }

        task.status = TaskStatus::Open;
        task.completion_date = 0;
        self.tasks.update_task(&task).await?;

        info!("task {task_id} completion cancelled by {caller}");
        Ok(task.to_view(unix_now()))
    }

    /// Finalize a completed task and credit the child's balance by the task
    /// reward, exactly once. Approved is terminal, so a repeat call fails the
    /// status check before any balance movement.
    pub async fn approve_task_completion(
        &self,
        caller: &str,
        task_id: u64,
    ) -> LedgerResult<TaskView> {
        let mut task = self.load(task_id).await?;
        self.guard.require_owner(caller, &task.assigned_to).await?;
        if task.status != TaskStatus::Completed {
            return Err(LedgerError::InvalidState);
        }

        // All checks passed; commit the transition and the credit together.
        task.status = TaskStatus::Approved;
        task.approval_date = unix_now();
        self.tokens.credit(&task.assigned_to, task.reward).await?;
        self.tasks.update_task(&task).await?;

        info!("task {task_id} approved by {caller}, credited {}", task.reward);
        Ok(task.to_view(task.approval_date))
    }

    /// Tasks of the calling child, expiry materialized at read time.
    pub async fn get_child_tasks(&self, caller: &str) -> LedgerResult<Vec<TaskView>> {
        let child = self.guard.require_child(caller).await?;
        let now = unix_now();
        Ok(self
            .tasks
            .list_tasks_for_child(&child.address)
            .await?
            .iter()
            .map(|t| t.to_view(now))
            .collect())
    }

    /// All tasks across the calling parent's family group, ordered by id.
    pub async fn get_family_group_tasks(&self, caller: &str) -> LedgerResult<Vec<TaskView>> {
        let parent = self.guard.require_parent(caller).await?;
        let now = unix_now();
        Ok(self
            .tasks
            .list_tasks_for_children(&parent.children)
            .await?
            .iter()
            .map(|t| t.to_view(now))
            .collect())
    }

    async fn load(&self, task_id: u64) -> LedgerResult<Task> {
        self.tasks
            .get_task(task_id)
            .await?
            .ok_or_else(|| LedgerError::NotFound(format!("task {task_id}")))
    }
}

fn validate_fields(description: &str, reward: u128) -> LedgerResult<()> {
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
    if reward == 0 {
        return Err(LedgerError::InvalidInput(
            "reward must be greater than zero".to_string(),
        ));
    }
    Ok(())
}
