//! Assignment notifications.

use super::{CommitEvent, PostCommitHook};
use crate::error::TrackerResult;
use crate::ids::UserId;
use crate::notification::{
    domain::{Notification, NotificationType},
    ports::NotificationRepository,
};
use crate::task::domain::Task;
use async_trait::async_trait;
use mockable::Clock;
use std::sync::Arc;

/// Notifies a user who becomes a task's assignee through someone else.
pub struct AssignmentHook<S, C>
where
    S: NotificationRepository,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    clock: Arc<C>,
}

impl<S, C> AssignmentHook<S, C>
where
    S: NotificationRepository,
    C: Clock + Send + Sync,
{
    /// Creates the hook.
    #[must_use]
    pub const fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        Self { store, clock }
    }

    async fn notify(&self, assignee: UserId, task: &Task) -> TrackerResult<()> {
        let notification = Notification::new(
            assignee,
            NotificationType::TaskAssigned,
            format!("You were assigned to \"{}\"", task.title().as_str()),
            Some(task.id()),
            &*self.clock,
        );
        self.store.store_notification(&notification).await?;
        Ok(())
    }
}

#[async_trait]
impl<S, C> PostCommitHook for AssignmentHook<S, C>
where
    S: NotificationRepository,
    C: Clock + Send + Sync,
{
    fn name(&self) -> &'static str {
        "assignment"
    }

    async fn on_commit(&self, event: &CommitEvent) -> TrackerResult<()> {
        let (actor, previous, task) = match event {
            CommitEvent::TaskCreated { actor, task } => (*actor, None, task),
            CommitEvent::TaskUpdated {
                actor,
                before,
                after,
            } => (*actor, before.assignee_id(), after.as_ref()),
            CommitEvent::CommentCreated { .. } => return Ok(()),
        };
        match task.assignee_id() {
            Some(assignee) if assignee != actor && Some(assignee) != previous => {
                self.notify(assignee, task).await
            }
            _ => Ok(()),
        }
    }
}
