//! Append-only task audit trail.

use super::ParseActivityActionError;
use crate::ids::{ActivityId, TaskId, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Kind of task mutation an activity entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityAction {
    /// The task was created.
    TaskCreated,
    /// Tracked fields changed.
    TaskUpdated,
    /// The task changed column or position.
    TaskMoved,
    /// The task was deleted.
    TaskDeleted,
}

impl ActivityAction {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TaskCreated => "task_created",
            Self::TaskUpdated => "task_updated",
            Self::TaskMoved => "task_moved",
            Self::TaskDeleted => "task_deleted",
        }
    }
}

impl TryFrom<&str> for ActivityAction {
    type Error = ParseActivityActionError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "task_created" => Ok(Self::TaskCreated),
            "task_updated" => Ok(Self::TaskUpdated),
            "task_moved" => Ok(Self::TaskMoved),
            "task_deleted" => Ok(Self::TaskDeleted),
            _ => Err(ParseActivityActionError(value.to_owned())),
        }
    }
}

/// Immutable audit record of one task mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEntry {
    id: ActivityId,
    task_id: TaskId,
    user_id: UserId,
    action: ActivityAction,
    details: Value,
    created_at: DateTime<Utc>,
}

impl ActivityEntry {
    /// Records `action` by `user_id` on `task_id`.
    #[must_use]
    pub fn record(
        task_id: TaskId,
        user_id: UserId,
        action: ActivityAction,
        details: Value,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id: ActivityId::new(),
            task_id,
            user_id,
            action,
            details,
            created_at: clock.utc(),
        }
    }

    /// Reconstructs an entry from persisted storage.
    #[must_use]
    pub const fn from_persisted(
        id: ActivityId,
        task_id: TaskId,
        user_id: UserId,
        action: ActivityAction,
        details: Value,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            task_id,
            user_id,
            action,
            details,
            created_at,
        }
    }

    /// Returns the entry identifier.
    #[must_use]
    pub const fn id(&self) -> ActivityId {
        self.id
    }

    /// Returns the task the entry belongs to.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the acting user.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the recorded action.
    #[must_use]
    pub const fn action(&self) -> ActivityAction {
        self.action
    }

    /// Returns the structured details.
    #[must_use]
    pub const fn details(&self) -> &Value {
        &self.details
    }

    /// Returns when the entry was recorded.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
