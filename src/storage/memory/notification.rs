//! In-memory notification table.

use super::InMemoryStore;
use crate::error::{EntityKind, RepositoryError, RepositoryResult, UniqueConstraint};
use crate::ids::{NotificationId, UserId};
use crate::notification::{domain::Notification, ports::NotificationRepository};
use async_trait::async_trait;

#[async_trait]
impl NotificationRepository for InMemoryStore {
    async fn store_notification(&self, notification: &Notification) -> RepositoryResult<()> {
        let mut state = self.write()?;
        if let Some(task_id) = notification.task_id() {
            if !state.has_task(task_id) {
                return Err(RepositoryError::not_found(EntityKind::Task, task_id));
            }
        }
        if state
            .notifications
            .iter()
            .any(|other| other.id() == notification.id())
        {
            return Err(RepositoryError::Duplicate(UniqueConstraint::PrimaryKey));
        }
        state.notifications.push(notification.clone());
        Ok(())
    }

    async fn find_notification(
        &self,
        id: NotificationId,
    ) -> RepositoryResult<Option<Notification>> {
        let state = self.read()?;
        Ok(state
            .notifications
            .iter()
            .find(|notification| notification.id() == id)
            .cloned())
    }

    async fn mark_notification_read(&self, id: NotificationId) -> RepositoryResult<()> {
        let mut state = self.write()?;
        let notification = state
            .notifications
            .iter_mut()
            .find(|notification| notification.id() == id)
            .ok_or_else(|| RepositoryError::not_found(EntityKind::Notification, id))?;
        notification.mark_read();
        Ok(())
    }

    async fn mark_all_notifications_read(&self, user_id: UserId) -> RepositoryResult<u64> {
        let mut state = self.write()?;
        let mut changed = 0;
        for notification in state
            .notifications
            .iter_mut()
            .filter(|notification| notification.user_id() == user_id && !notification.is_read())
        {
            notification.mark_read();
            changed += 1;
        }
        Ok(changed)
    }

    async fn list_notifications(
        &self,
        user_id: UserId,
        unread_only: bool,
    ) -> RepositoryResult<Vec<Notification>> {
        let state = self.read()?;
        let mut notifications: Vec<Notification> = state
            .notifications
            .iter()
            .rev()
            .filter(|notification| notification.user_id() == user_id)
            .filter(|notification| !unread_only || !notification.is_read())
            .cloned()
            .collect();
        notifications.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(notifications)
    }
}
