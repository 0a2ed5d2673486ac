//! Per-user notification inbox.

use crate::error::{EntityKind, ForbiddenReason, TrackerError, TrackerResult};
use crate::ids::{NotificationId, UserId};
use crate::notification::{domain::Notification, ports::NotificationRepository};
use std::sync::Arc;
use tracing::debug;

/// Reads and acknowledges a user's notifications.
#[derive(Clone)]
pub struct NotificationService<S>
where
    S: NotificationRepository,
{
    store: Arc<S>,
}

impl<S> NotificationService<S>
where
    S: NotificationRepository,
{
    /// Creates a new notification service.
    #[must_use]
    pub const fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Lists the user's notifications, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Storage`] on persistence failure.
    pub async fn list(&self, user_id: UserId, unread_only: bool) -> TrackerResult<Vec<Notification>> {
        Ok(self.store.list_notifications(user_id, unread_only).await?)
    }

    /// Marks one of the user's notifications read.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::NotFound`] for an unknown notification and
    /// [`TrackerError::Forbidden`] when it belongs to someone else.
    pub async fn mark_read(
        &self,
        user_id: UserId,
        notification_id: NotificationId,
    ) -> TrackerResult<Notification> {
        let mut notification = self
            .store
            .find_notification(notification_id)
            .await?
            .ok_or_else(|| TrackerError::not_found(EntityKind::Notification, notification_id))?;
        if notification.user_id() != user_id {
            debug!(%notification_id, %user_id, "access denied: foreign notification");
            return Err(TrackerError::Forbidden(ForbiddenReason::NotResourceOwner));
        }
        if !notification.is_read() {
            self.store.mark_notification_read(notification_id).await?;
            notification.mark_read();
        }
        Ok(notification)
    }

    /// Marks every unread notification of the user read, returning how many
    /// changed.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Storage`] on persistence failure.
    pub async fn mark_all_read(&self, user_id: UserId) -> TrackerResult<u64> {
        Ok(self.store.mark_all_notifications_read(user_id).await?)
    }
}
