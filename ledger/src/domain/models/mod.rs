//! Domain entities, kept separate from the serializable DTOs in `shared`.

pub mod identity;
pub mod reward;
pub mod task;

pub use identity::{Child, Parent};
pub use reward::{Reward, RewardStatus};
pub use task::{Task, TaskStatus};
