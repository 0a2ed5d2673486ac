//! Notification aggregate.

use crate::ids::{NotificationId, TaskId, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned while parsing notification types.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown notification type: {0}")]
pub struct ParseNotificationTypeError(pub String);

/// Reason a notification was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    /// The user became the assignee of a task.
    TaskAssigned,
    /// The user was mentioned in a task description.
    TaskMentioned,
    /// The user was mentioned in a comment.
    CommentMentioned,
    /// A reminder the user set has fired.
    TaskDueSoon,
    /// A task the user follows changed.
    TaskUpdated,
}

impl NotificationType {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TaskAssigned => "task_assigned",
            Self::TaskMentioned => "task_mentioned",
            Self::CommentMentioned => "comment_mentioned",
            Self::TaskDueSoon => "task_due_soon",
            Self::TaskUpdated => "task_updated",
        }
    }
}

impl TryFrom<&str> for NotificationType {
    type Error = ParseNotificationTypeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "task_assigned" => Ok(Self::TaskAssigned),
            "task_mentioned" => Ok(Self::TaskMentioned),
            "comment_mentioned" => Ok(Self::CommentMentioned),
            "task_due_soon" => Ok(Self::TaskDueSoon),
            "task_updated" => Ok(Self::TaskUpdated),
            _ => Err(ParseNotificationTypeError(value.to_owned())),
        }
    }
}

/// Message addressed to one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    id: NotificationId,
    user_id: UserId,
    task_id: Option<TaskId>,
    #[serde(rename = "type")]
    notification_type: NotificationType,
    message: String,
    read: bool,
    created_at: DateTime<Utc>,
}

impl Notification {
    /// Creates an unread notification for `user_id`.
    #[must_use]
    pub fn new(
        user_id: UserId,
        notification_type: NotificationType,
        message: impl Into<String>,
        task_id: Option<TaskId>,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id: NotificationId::new(),
            user_id,
            task_id,
            notification_type,
            message: message.into(),
            read: false,
            created_at: clock.utc(),
        }
    }

    /// Reconstructs a notification from persisted storage.
    #[must_use]
    pub const fn from_persisted(
        id: NotificationId,
        user_id: UserId,
        task_id: Option<TaskId>,
        notification_type: NotificationType,
        message: String,
        read: bool,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            task_id,
            notification_type,
            message,
            read,
            created_at,
        }
    }

    /// Flags the notification as read.
    pub const fn mark_read(&mut self) {
        self.read = true;
    }

    /// Returns the notification identifier.
    #[must_use]
    pub const fn id(&self) -> NotificationId {
        self.id
    }

    /// Returns the addressed user.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the related task, if any.
    #[must_use]
    pub const fn task_id(&self) -> Option<TaskId> {
        self.task_id
    }

    /// Returns the reason.
    #[must_use]
    pub const fn notification_type(&self) -> NotificationType {
        self.notification_type
    }

    /// Returns the human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns whether the user has read the notification.
    #[must_use]
    pub const fn is_read(&self) -> bool {
        self.read
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
