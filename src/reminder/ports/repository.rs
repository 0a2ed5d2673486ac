//! Repository port for reminders.

use crate::error::RepositoryResult;
use crate::ids::{ReminderId, UserId};
use crate::reminder::domain::{Reminder, ReminderStatus};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Reminder persistence contract.
#[async_trait]
pub trait ReminderRepository: Send + Sync {
    /// Stores a new reminder.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::RepositoryError::NotFound`] when the task was
    /// deleted concurrently.
    async fn store_reminder(&self, reminder: &Reminder) -> RepositoryResult<()>;

    /// Finds a reminder by identifier.
    async fn find_reminder(&self, id: ReminderId) -> RepositoryResult<Option<Reminder>>;

    /// Lists a user's reminders by firing time, limited to tasks in
    /// workspaces the user still belongs to.
    async fn list_reminders(&self, user_id: UserId) -> RepositoryResult<Vec<Reminder>>;

    /// Lists pending reminders whose time is at or before `now`.
    async fn list_due_reminders(&self, now: DateTime<Utc>) -> RepositoryResult<Vec<Reminder>>;

    /// Moves a reminder to `target` only if it is still pending.
    ///
    /// The check and the write are one atomic step; returns `false` when
    /// another writer already moved the reminder out of `PENDING`.
    async fn transition_if_pending(
        &self,
        id: ReminderId,
        target: ReminderStatus,
        at: DateTime<Utc>,
    ) -> RepositoryResult<bool>;
}
