//! Repository port for tasks and their activity log.

use crate::error::RepositoryResult;
use crate::ids::{ProjectId, TaskId, UserId};
use crate::task::domain::{ActivityEntry, DueWindow, Task, TaskFilter};
use async_trait::async_trait;

/// Task persistence contract.
///
/// Every write that carries an [`ActivityEntry`] must persist the task row
/// and the entry atomically: either both become visible or neither does.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task and its creation entry.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::RepositoryError::NotFound`] when the project,
    /// column or assignee vanished concurrently.
    async fn create_task(&self, task: &Task, entry: &ActivityEntry) -> RepositoryResult<()>;

    /// Persists task changes, appending `entry` when present.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::RepositoryError::NotFound`] when the task does
    /// not exist.
    async fn update_task(&self, task: &Task, entry: Option<&ActivityEntry>)
    -> RepositoryResult<()>;

    /// Deletes a task with its comments, mentions, reminders, notifications
    /// and activity.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::RepositoryError::NotFound`] when the task does
    /// not exist.
    async fn delete_task(&self, id: TaskId) -> RepositoryResult<()>;

    /// Finds a task by identifier.
    async fn find_task(&self, id: TaskId) -> RepositoryResult<Option<Task>>;

    /// Lists a project's tasks matching `filter`, by position ascending then
    /// creation descending.
    async fn list_tasks(
        &self,
        project_id: ProjectId,
        filter: &TaskFilter,
    ) -> RepositoryResult<Vec<Task>>;

    /// Lists tasks assigned to `user_id` in workspaces the user belongs to,
    /// soonest due first with undated tasks last.
    async fn list_tasks_assigned_to(&self, user_id: UserId) -> RepositoryResult<Vec<Task>>;

    /// Lists tasks due inside `window` in workspaces `user_id` belongs to,
    /// ordered by due date.
    async fn list_tasks_due(&self, user_id: UserId, window: &DueWindow)
    -> RepositoryResult<Vec<Task>>;

    /// Lists a task's activity, newest first.
    async fn list_activity(&self, task_id: TaskId) -> RepositoryResult<Vec<ActivityEntry>>;
}
