//! Mention recording and mention notifications.

use super::{CommitEvent, PostCommitHook};
use crate::error::TrackerResult;
use crate::identity::{domain::Handle, ports::UserRepository};
use crate::ids::{TaskId, UserId};
use crate::mention::{
    domain::{Mention, MentionTarget, extract_handles},
    ports::MentionRepository,
};
use crate::notification::{
    domain::{Notification, NotificationType},
    ports::NotificationRepository,
};
use async_trait::async_trait;
use mockable::Clock;
use std::sync::Arc;
use tracing::debug;

/// Records mentions found in task descriptions and comment bodies and
/// notifies the mentioned users.
pub struct MentionHook<S, C>
where
    S: UserRepository + MentionRepository + NotificationRepository,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    clock: Arc<C>,
}

impl<S, C> MentionHook<S, C>
where
    S: UserRepository + MentionRepository + NotificationRepository,
    C: Clock + Send + Sync,
{
    /// Creates the hook.
    #[must_use]
    pub const fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        Self { store, clock }
    }

    async fn record(
        &self,
        actor: UserId,
        target: MentionTarget,
        task_id: TaskId,
        task_title: &str,
        tokens: Vec<String>,
    ) -> TrackerResult<()> {
        // Tokens that are not valid handles cannot belong to anyone.
        let handles: Vec<Handle> = tokens
            .into_iter()
            .filter_map(|token| Handle::new(token).ok())
            .collect();
        if handles.is_empty() {
            return Ok(());
        }

        let users = self.store.find_users_by_handles(&handles).await?;
        if users.is_empty() {
            debug!(%task_id, "no mentioned handle resolved to a user");
            return Ok(());
        }
        let mentions: Vec<Mention> = users
            .iter()
            .map(|user| Mention::new(target, user.id(), &*self.clock))
            .collect();
        self.store.store_mentions(&mentions).await?;

        let (notification_type, message) = match target {
            MentionTarget::Task(_) => (
                NotificationType::TaskMentioned,
                format!("You were mentioned in \"{task_title}\""),
            ),
            MentionTarget::Comment(_) => (
                NotificationType::CommentMentioned,
                format!("You were mentioned in a comment on \"{task_title}\""),
            ),
        };
        for mention in mentions
            .iter()
            .filter(|mention| mention.mentioned_user_id() != actor)
        {
            let notification = Notification::new(
                mention.mentioned_user_id(),
                notification_type,
                message.clone(),
                Some(task_id),
                &*self.clock,
            );
            self.store.store_notification(&notification).await?;
            self.store.mark_mention_notified(mention.id()).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl<S, C> PostCommitHook for MentionHook<S, C>
where
    S: UserRepository + MentionRepository + NotificationRepository,
    C: Clock + Send + Sync,
{
    fn name(&self) -> &'static str {
        "mention"
    }

    async fn on_commit(&self, event: &CommitEvent) -> TrackerResult<()> {
        match event {
            CommitEvent::TaskCreated { actor, task } => {
                let tokens = extract_handles(task.description().unwrap_or_default());
                self.record(
                    *actor,
                    MentionTarget::Task(task.id()),
                    task.id(),
                    task.title().as_str(),
                    tokens,
                )
                .await
            }
            CommitEvent::TaskUpdated {
                actor,
                before,
                after,
            } => {
                if before.description() == after.description() {
                    return Ok(());
                }
                let previous = extract_handles(before.description().unwrap_or_default());
                let added: Vec<String> = extract_handles(after.description().unwrap_or_default())
                    .into_iter()
                    .filter(|token| !previous.contains(token))
                    .collect();
                self.record(
                    *actor,
                    MentionTarget::Task(after.id()),
                    after.id(),
                    after.title().as_str(),
                    added,
                )
                .await
            }
            CommitEvent::CommentCreated {
                actor,
                task,
                comment,
            } => {
                self.record(
                    *actor,
                    MentionTarget::Comment(comment.id()),
                    task.id(),
                    task.title().as_str(),
                    extract_handles(comment.body().as_str()),
                )
                .await
            }
        }
    }
}
