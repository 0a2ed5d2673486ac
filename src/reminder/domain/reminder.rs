//! Reminder aggregate.
//!
//! ```text
//! PENDING --(due and swept)--> SENT
//! PENDING --(cancelled)------> CANCELLED
//! ```
//!
//! `SENT` and `CANCELLED` are terminal.

use crate::ids::{ReminderId, TaskId, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors returned by reminder construction and transitions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReminderDomainError {
    /// `remind_at` is not after the current time.
    #[error("reminder time {0} is not in the future")]
    NotInFuture(DateTime<Utc>),

    /// The reminder already left `PENDING`.
    #[error("reminder is {}, only pending reminders can change", .0.as_str())]
    NotPending(ReminderStatus),
}

/// Error returned while parsing reminder statuses.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown reminder status: {0}")]
pub struct ParseReminderStatusError(pub String);

/// Reminder lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderStatus {
    /// Waiting for its time.
    Pending,
    /// Fired by the sweep.
    Sent,
    /// Cancelled by its owner.
    Cancelled,
}

impl ReminderStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Sent => "sent",
            Self::Cancelled => "cancelled",
        }
    }

    /// Returns whether no further transition is possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl TryFrom<&str> for ReminderStatus {
    type Error = ParseReminderStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "sent" => Ok(Self::Sent),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(ParseReminderStatusError(value.to_owned())),
        }
    }
}

/// One-shot reminder a user sets on a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    id: ReminderId,
    task_id: TaskId,
    user_id: UserId,
    remind_at: DateTime<Utc>,
    status: ReminderStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted reminder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedReminderData {
    /// Persisted identifier.
    pub id: ReminderId,
    /// Reminded task.
    pub task_id: TaskId,
    /// Owning user.
    pub user_id: UserId,
    /// Firing time.
    pub remind_at: DateTime<Utc>,
    /// Persisted state.
    pub status: ReminderStatus,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Reminder {
    /// Schedules a pending reminder.
    ///
    /// # Errors
    ///
    /// Returns [`ReminderDomainError::NotInFuture`] unless `remind_at` is
    /// after the clock's current time.
    pub fn schedule(
        task_id: TaskId,
        user_id: UserId,
        remind_at: DateTime<Utc>,
        clock: &impl Clock,
    ) -> Result<Self, ReminderDomainError> {
        let now = clock.utc();
        if remind_at <= now {
            return Err(ReminderDomainError::NotInFuture(remind_at));
        }
        Ok(Self {
            id: ReminderId::new(),
            task_id,
            user_id,
            remind_at,
            status: ReminderStatus::Pending,
            created_at: now,
            updated_at: now,
        })
    }

    /// Reconstructs a reminder from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedReminderData) -> Self {
        Self {
            id: data.id,
            task_id: data.task_id,
            user_id: data.user_id,
            remind_at: data.remind_at,
            status: data.status,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Moves a pending reminder into `target`.
    ///
    /// # Errors
    ///
    /// Returns [`ReminderDomainError::NotPending`] when the reminder is
    /// already terminal.
    pub fn transition(
        &mut self,
        target: ReminderStatus,
        clock: &impl Clock,
    ) -> Result<(), ReminderDomainError> {
        if self.status.is_terminal() {
            return Err(ReminderDomainError::NotPending(self.status));
        }
        self.status = target;
        self.updated_at = clock.utc();
        Ok(())
    }

    /// Returns whether the sweep should fire this reminder at `now`.
    #[must_use]
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.status == ReminderStatus::Pending && self.remind_at <= now
    }

    /// Returns the reminder identifier.
    #[must_use]
    pub const fn id(&self) -> ReminderId {
        self.id
    }

    /// Returns the reminded task.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the owning user.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the firing time.
    #[must_use]
    pub const fn remind_at(&self) -> DateTime<Utc> {
        self.remind_at
    }

    /// Returns the lifecycle state.
    #[must_use]
    pub const fn status(&self) -> ReminderStatus {
        self.status
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}
