//! Domain model for tasks and their activity log.
//!
//! Tasks track nine fields whose changes are audited (see
//! [`TrackedField`]); every mutation produces an [`ActivityEntry`] carrying
//! a structured diff.

mod activity;
mod changes;
mod error;
mod filter;
mod task;

pub use activity::{ActivityAction, ActivityEntry};
pub use changes::{FieldChange, TaskChanges, TaskMove, TrackedField};
pub use error::{
    ParseActivityActionError, ParseTaskPriorityError, ParseTaskStatusError, ParseTaskTypeError,
    TaskDomainError,
};
pub use filter::{DueWindow, TaskFilter};
pub use task::{
    NewTask, PersistedTaskData, Task, TaskPatch, TaskPriority, TaskStatus, TaskTitle, TaskType,
};
