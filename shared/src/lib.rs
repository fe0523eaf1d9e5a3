use serde::{Deserialize, Serialize};
use std::fmt;

/// Role of an account address within the ledger.
///
/// Assigned once by `register_parent`/`add_child` and never reverts to
/// `Unregistered`. Serialized with the wire strings the presentation layer
/// expects (`"parent"`, `"child"`, `"not-registered"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "not-registered")]
    Unregistered,
    #[serde(rename = "parent")]
    Parent,
    #[serde(rename = "child")]
    Child,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Unregistered => write!(f, "not-registered"),
            Role::Parent => write!(f, "parent"),
            Role::Child => write!(f, "child"),
        }
    }
}

/// Status of a task as seen by the presentation layer.
///
/// `Expired` is derived from `due_date` against the current time at read
/// time; it is never stored, so two reads of the same open task may differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatusView {
    Open,
    Expired,
    Completed,
    Approved,
}

/// Status of a reward as seen by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RewardStatusView {
    Open,
    Purchased,
    Redeemed,
    Approved,
}

/// A task as returned by list queries.
///
/// All amounts are integer base units scaled by `10^decimals`; all dates are
/// unix seconds with 0 meaning "unset".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskView {
    pub id: u64,
    pub description: String,
    /// Tokens credited to the assigned child when the task is approved.
    pub reward: u128,
    /// Address of the child the task is assigned to.
    pub assigned_to: String,
    /// Unix due date, or 0 for no due date.
    pub due_date: u64,
    pub status: TaskStatusView,
    pub completion_date: u64,
    pub approval_date: u64,
}

/// A reward as returned by list queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardView {
    pub id: u64,
    pub description: String,
    /// Tokens debited from the assigned child's balance at purchase time.
    pub price: u128,
    pub assigned_to: String,
    pub status: RewardStatusView,
    pub purchase_date: u64,
    pub redemption_date: u64,
    pub approval_date: u64,
}

/// Per-child task statistics shown on the family group summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TasksCounter {
    /// Total tasks currently assigned to the child (any status).
    pub assigned: u64,
    pub expired: u64,
    pub completed: u64,
    pub approved: u64,
    /// Sum of rewards of approved tasks, in base units.
    pub tokens_earned: u128,
}

/// Per-child reward statistics shown on the family group summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RewardsCounter {
    pub assigned: u64,
    pub purchased: u64,
    pub redeemed: u64,
    pub approved: u64,
    /// Sum of prices of purchased, redeemed and approved rewards.
    pub tokens_spent: u128,
}

/// One child entry in the family group summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilyGroupMember {
    pub address: String,
    pub name: String,
    /// Current token balance in base units.
    pub balance: u128,
    pub tasks_counter: TasksCounter,
    pub rewards_counter: RewardsCounter,
}

/// Profile of the calling account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub account_type: Role,
    /// Display name; empty for unregistered accounts.
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterParentRequest {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddChildRequest {
    pub child_address: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddTaskRequest {
    pub child_address: String,
    pub description: String,
    /// Base units; must be greater than zero.
    pub reward: u128,
    /// Unix due date, or 0 for no due date.
    pub due_date: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditTaskRequest {
    pub task_id: u64,
    pub description: String,
    pub reward: u128,
    pub due_date: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddRewardRequest {
    pub child_address: String,
    pub description: String,
    /// Base units; must be greater than zero.
    pub price: u128,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditRewardRequest {
    pub reward_id: u64,
    pub description: String,
    pub price: u128,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskResponse {
    pub task: TaskView,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardResponse {
    pub reward: RewardView,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskListResponse {
    pub tasks: Vec<TaskView>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardListResponse {
    pub rewards: Vec<RewardView>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilyGroupResponse {
    pub members: Vec<FamilyGroupMember>,
}
