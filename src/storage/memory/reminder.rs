//! In-memory reminder table.

use super::InMemoryStore;
use crate::error::{EntityKind, RepositoryError, RepositoryResult, UniqueConstraint};
use crate::ids::{ReminderId, UserId};
use crate::reminder::{
    domain::{PersistedReminderData, Reminder, ReminderStatus},
    ports::ReminderRepository,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
impl ReminderRepository for InMemoryStore {
    async fn store_reminder(&self, reminder: &Reminder) -> RepositoryResult<()> {
        let mut state = self.write()?;
        if !state.has_task(reminder.task_id()) {
            return Err(RepositoryError::not_found(
                EntityKind::Task,
                reminder.task_id(),
            ));
        }
        if state.reminders.iter().any(|other| other.id() == reminder.id()) {
            return Err(RepositoryError::Duplicate(UniqueConstraint::PrimaryKey));
        }
        state.reminders.push(reminder.clone());
        Ok(())
    }

    async fn find_reminder(&self, id: ReminderId) -> RepositoryResult<Option<Reminder>> {
        let state = self.read()?;
        Ok(state.reminders.iter().find(|reminder| reminder.id() == id).cloned())
    }

    async fn list_reminders(&self, user_id: UserId) -> RepositoryResult<Vec<Reminder>> {
        let state = self.read()?;
        let mut reminders: Vec<Reminder> = state
            .reminders
            .iter()
            .filter(|reminder| reminder.user_id() == user_id)
            .filter(|reminder| {
                state
                    .tasks
                    .iter()
                    .find(|task| task.id() == reminder.task_id())
                    .is_some_and(|task| state.can_see_task(user_id, task))
            })
            .cloned()
            .collect();
        reminders.sort_by_key(Reminder::remind_at);
        Ok(reminders)
    }

    async fn list_due_reminders(&self, now: DateTime<Utc>) -> RepositoryResult<Vec<Reminder>> {
        let state = self.read()?;
        let mut reminders: Vec<Reminder> = state
            .reminders
            .iter()
            .filter(|reminder| reminder.is_due(now))
            .cloned()
            .collect();
        reminders.sort_by_key(Reminder::remind_at);
        Ok(reminders)
    }

    async fn transition_if_pending(
        &self,
        id: ReminderId,
        target: ReminderStatus,
        at: DateTime<Utc>,
    ) -> RepositoryResult<bool> {
        let mut state = self.write()?;
        let Some(slot) = state
            .reminders
            .iter_mut()
            .find(|reminder| reminder.id() == id && reminder.status() == ReminderStatus::Pending)
        else {
            return Ok(false);
        };
        *slot = Reminder::from_persisted(PersistedReminderData {
            id: slot.id(),
            task_id: slot.task_id(),
            user_id: slot.user_id(),
            remind_at: slot.remind_at(),
            status: target,
            created_at: slot.created_at(),
            updated_at: at,
        });
        Ok(true)
    }
}
