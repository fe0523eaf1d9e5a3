use shared::{TaskStatusView, TaskView};

/// Stored status of a task.
///
/// Expiry is deliberately absent: an expired task is an `Open` task whose due
/// date has passed, recomputed against the clock on every read. Transitions
/// are validated by `TaskService`; `Approved` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Open,
    Completed,
    Approved,
}

/// A chore assigned to a child.
///
/// `reward` is in token base units and credited to the child exactly once,
/// when the task is approved. Date fields are unix seconds, 0 when unset;
/// `completion_date` is cleared again if the completion is cancelled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: u64,
    pub description: String,
    pub reward: u128,
    pub assigned_to: String,
    pub due_date: u64,
    pub status: TaskStatus,
    pub completion_date: u64,
    pub approval_date: u64,
}

impl Task {
    pub fn new(
        id: u64,
        description: impl Into<String>,
        reward: u128,
        assigned_to: impl Into<String>,
        due_date: u64,
    ) -> Self {
        Self {
            id,
            description: description.into(),
            reward,
            assigned_to: assigned_to.into(),
            due_date,
            status: TaskStatus::Open,
            completion_date: 0,
            approval_date: 0,
        }
    }

    /// An open task past its due date. A due date of 0 means none.
    pub fn is_expired(&self, now: u64) -> bool {
        self.status == TaskStatus::Open && self.due_date > 0 && self.due_date < now
    }

    /// Editing and deletion are permitted while the task is still Open,
    /// expired or not.
    pub fn is_editable(&self) -> bool {
        self.status == TaskStatus::Open
    }

    /// Presentation view with the derived status materialized.
    pub fn to_view(&self, now: u64) -> TaskView {
        let status = if self.is_expired(now) {
            TaskStatusView::Expired
        } else {
            match self.status {
                TaskStatus::Open => TaskStatusView::Open,
                TaskStatus::Completed => TaskStatusView::Completed,
                TaskStatus::Approved => TaskStatusView::Approved,
            }
        };
        TaskView {
            id: self.id,
            description: self.description.clone(),
            reward: self.reward,
            assigned_to: self.assigned_to.clone(),
            due_date: self.due_date,
            status,
            completion_date: self.completion_date,
            approval_date: self.approval_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expiry_is_derived_from_due_date() {
        let mut task = Task::new(1, "Bring the bin out", 3, "0xchild", 100);
        assert!(!task.is_expired(50));
        assert!(!task.is_expired(100));
        assert!(task.is_expired(101));

        // No due date never expires.
        task.due_date = 0;
        assert!(!task.is_expired(u64::MAX));

        // Only open tasks expire.
        task.due_date = 100;
        task.status = TaskStatus::Completed;
        assert!(!task.is_expired(101));
    }

    #[test]
    fn view_materializes_expired_status() {
        let task = Task::new(1, "Bring the bin out", 3, "0xchild", 100);
        assert_eq!(task.to_view(50).status, TaskStatusView::Open);
        assert_eq!(task.to_view(200).status, TaskStatusView::Expired);
    }
}
