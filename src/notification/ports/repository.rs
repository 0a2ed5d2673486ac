//! Repository port for notifications.

use crate::error::RepositoryResult;
use crate::ids::{NotificationId, UserId};
use crate::notification::domain::Notification;
use async_trait::async_trait;

/// Notification persistence contract.
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Stores a new notification.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::RepositoryError::NotFound`] when the user or
    /// task vanished concurrently.
    async fn store_notification(&self, notification: &Notification) -> RepositoryResult<()>;

    /// Finds a notification by identifier.
    async fn find_notification(&self, id: NotificationId)
    -> RepositoryResult<Option<Notification>>;

    /// Flags one notification as read.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::RepositoryError::NotFound`] when the
    /// notification does not exist.
    async fn mark_notification_read(&self, id: NotificationId) -> RepositoryResult<()>;

    /// Flags every unread notification of `user_id` as read and returns how
    /// many changed.
    async fn mark_all_notifications_read(&self, user_id: UserId) -> RepositoryResult<u64>;

    /// Lists a user's notifications, newest first.
    async fn list_notifications(
        &self,
        user_id: UserId,
        unread_only: bool,
    ) -> RepositoryResult<Vec<Notification>>;
}
