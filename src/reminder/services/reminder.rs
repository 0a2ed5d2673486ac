//! Reminder scheduling, cancellation and the due sweep.

use crate::access::{AccessGuard, OwnershipStore, Resource};
use crate::error::{
    ConflictReason, EntityKind, ForbiddenReason, TrackerError, TrackerResult,
};
use crate::ids::{ReminderId, TaskId, UserId};
use crate::notification::{
    domain::{Notification, NotificationType},
    ports::NotificationRepository,
};
use crate::reminder::domain::{Reminder, ReminderStatus};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Outcome of one reminder sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Due reminders found pending.
    pub examined: usize,
    /// Reminders this sweep moved to `SENT`.
    pub sent: usize,
}

/// Reminder coordinator.
#[derive(Clone)]
pub struct ReminderService<S, C>
where
    S: OwnershipStore + NotificationRepository,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    guard: AccessGuard<S>,
    clock: Arc<C>,
}

impl<S, C> ReminderService<S, C>
where
    S: OwnershipStore + NotificationRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new reminder service.
    #[must_use]
    pub fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        let guard = AccessGuard::new(Arc::clone(&store));
        Self {
            store,
            guard,
            clock,
        }
    }

    /// Schedules a reminder on a task for the acting user.
    ///
    /// Any member may set reminders, viewers included.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::NotFound`], [`TrackerError::Forbidden`] or
    /// [`TrackerError::BadRequest`] when `remind_at` is not in the future.
    pub async fn create(
        &self,
        user_id: UserId,
        task_id: TaskId,
        remind_at: DateTime<Utc>,
    ) -> TrackerResult<Reminder> {
        self.guard
            .authorize_member(user_id, Resource::Task(task_id))
            .await?;
        let reminder = Reminder::schedule(task_id, user_id, remind_at, &*self.clock)
            .map_err(TrackerError::bad_request)?;
        self.store.store_reminder(&reminder).await?;
        debug!(reminder_id = %reminder.id(), %task_id, %user_id, "scheduled reminder");
        Ok(reminder)
    }

    /// Lists the user's reminders by firing time.
    ///
    /// Reminders on tasks in workspaces the user has left are omitted.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Storage`] on persistence failure.
    pub async fn list(&self, user_id: UserId) -> TrackerResult<Vec<Reminder>> {
        Ok(self.store.list_reminders(user_id).await?)
    }

    /// Returns one of the user's reminders.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::NotFound`], or [`TrackerError::Forbidden`] for
    /// another user's reminder or once the user has left the workspace.
    pub async fn get(&self, user_id: UserId, reminder_id: ReminderId) -> TrackerResult<Reminder> {
        self.load_owned(user_id, reminder_id).await
    }

    /// Cancels a pending reminder.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Conflict`] when the reminder already fired or
    /// was cancelled, and [`TrackerError::Forbidden`] for another user's
    /// reminder.
    pub async fn cancel(
        &self,
        user_id: UserId,
        reminder_id: ReminderId,
    ) -> TrackerResult<Reminder> {
        let mut reminder = self.load_owned(user_id, reminder_id).await?;
        reminder
            .transition(ReminderStatus::Cancelled, &*self.clock)
            .map_err(|_| TrackerError::Conflict(ConflictReason::ReminderNotPending))?;
        let moved = self
            .store
            .transition_if_pending(reminder_id, ReminderStatus::Cancelled, reminder.updated_at())
            .await?;
        if !moved {
            // The sweep won the race.
            return Err(TrackerError::Conflict(ConflictReason::ReminderNotPending));
        }
        info!(%reminder_id, %user_id, "cancelled reminder");
        Ok(reminder)
    }

    /// Moves every due pending reminder to `SENT` and notifies its owner.
    ///
    /// Safe to run concurrently or repeatedly: each reminder is claimed by
    /// a conditional write, so overlapping sweeps send it once.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Storage`] when listing or claiming fails.
    /// Notification failures are logged and do not abort the sweep.
    pub async fn sweep(&self) -> TrackerResult<SweepReport> {
        let now = self.clock.utc();
        let due = self.store.list_due_reminders(now).await?;
        let mut report = SweepReport {
            examined: due.len(),
            sent: 0,
        };
        for reminder in due {
            let claimed = self
                .store
                .transition_if_pending(reminder.id(), ReminderStatus::Sent, now)
                .await?;
            if !claimed {
                debug!(reminder_id = %reminder.id(), "reminder already claimed");
                continue;
            }
            report.sent += 1;
            if let Err(err) = self.notify_due(&reminder).await {
                warn!(
                    reminder_id = %reminder.id(),
                    error = %err,
                    "failed to notify due reminder"
                );
            }
        }
        if report.sent > 0 {
            info!(examined = report.examined, sent = report.sent, "reminder sweep");
        }
        Ok(report)
    }

    async fn notify_due(&self, reminder: &Reminder) -> TrackerResult<()> {
        let task = self
            .store
            .find_task(reminder.task_id())
            .await?
            .ok_or_else(|| TrackerError::not_found(EntityKind::Task, reminder.task_id()))?;
        let notification = Notification::new(
            reminder.user_id(),
            NotificationType::TaskDueSoon,
            format!("Reminder: \"{}\"", task.title().as_str()),
            Some(task.id()),
            &*self.clock,
        );
        self.store.store_notification(&notification).await?;
        Ok(())
    }

    async fn load_owned(&self, user_id: UserId, reminder_id: ReminderId) -> TrackerResult<Reminder> {
        self.guard
            .authorize_member(user_id, Resource::Reminder(reminder_id))
            .await?;
        let reminder = self
            .store
            .find_reminder(reminder_id)
            .await?
            .ok_or_else(|| TrackerError::not_found(EntityKind::Reminder, reminder_id))?;
        if reminder.user_id() != user_id {
            debug!(%reminder_id, %user_id, "access denied: foreign reminder");
            return Err(TrackerError::Forbidden(ForbiddenReason::NotResourceOwner));
        }
        Ok(reminder)
    }
}
