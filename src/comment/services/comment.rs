//! Comment coordinator.

use crate::access::{AccessGuard, OwnershipStore, Resource};
use crate::comment::domain::{Comment, CommentBody};
use crate::error::{EntityKind, ForbiddenReason, TrackerError, TrackerResult};
use crate::hooks::{CommitEvent, HookChain};
use crate::ids::{CommentId, TaskId, UserId};
use mockable::Clock;
use std::sync::Arc;
use tracing::{debug, info};

/// Threaded comment coordinator.
///
/// Posting a comment dispatches a [`CommitEvent::CommentCreated`] so the
/// mention hook can record `@handle` references in the body.
#[derive(Clone)]
pub struct CommentService<S, C>
where
    S: OwnershipStore,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    guard: AccessGuard<S>,
    clock: Arc<C>,
    hooks: HookChain,
}

impl<S, C> CommentService<S, C>
where
    S: OwnershipStore,
    C: Clock + Send + Sync,
{
    /// Creates a new comment service dispatching to `hooks`.
    #[must_use]
    pub fn new(store: Arc<S>, clock: Arc<C>, hooks: HookChain) -> Self {
        let guard = AccessGuard::new(Arc::clone(&store));
        Self {
            store,
            guard,
            clock,
            hooks,
        }
    }

    /// Posts a comment, optionally replying to `parent_id`.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::NotFound`] for a missing task or parent,
    /// [`TrackerError::Forbidden`] for non-writers, and
    /// [`TrackerError::BadRequest`] for a blank body or a parent on another
    /// task.
    pub async fn create(
        &self,
        user_id: UserId,
        task_id: TaskId,
        body: &str,
        parent_id: Option<CommentId>,
    ) -> TrackerResult<Comment> {
        self.guard
            .authorize_write(user_id, Resource::Task(task_id))
            .await?;
        let body = CommentBody::new(body).map_err(TrackerError::bad_request)?;
        if let Some(parent_id) = parent_id {
            let parent = self.load(parent_id).await?;
            if parent.task_id() != task_id {
                return Err(TrackerError::bad_request(format!(
                    "parent comment {parent_id} belongs to another task"
                )));
            }
        }
        let task = self
            .store
            .find_task(task_id)
            .await?
            .ok_or_else(|| TrackerError::not_found(EntityKind::Task, task_id))?;

        let comment = Comment::new(task_id, user_id, parent_id, body, &*self.clock);
        self.store.store_comment(&comment).await?;
        info!(comment_id = %comment.id(), %task_id, %user_id, "posted comment");

        self.hooks
            .dispatch(&CommitEvent::CommentCreated {
                actor: user_id,
                task,
                comment: comment.clone(),
            })
            .await;
        Ok(comment)
    }

    /// Lists the comments of a readable task, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::NotFound`] or [`TrackerError::Forbidden`].
    pub async fn list(&self, user_id: UserId, task_id: TaskId) -> TrackerResult<Vec<Comment>> {
        self.guard
            .authorize_read(user_id, Resource::Task(task_id))
            .await?;
        Ok(self.store.list_comments(task_id).await?)
    }

    /// Edits a comment. Only its author may edit it, whatever their role.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Forbidden`] for anyone but the author.
    pub async fn update(
        &self,
        user_id: UserId,
        comment_id: CommentId,
        body: &str,
    ) -> TrackerResult<Comment> {
        let mut comment = self.load_authored(user_id, comment_id).await?;
        let body = CommentBody::new(body).map_err(TrackerError::bad_request)?;
        comment.edit(body, &*self.clock);
        self.store.update_comment(&comment).await?;
        Ok(comment)
    }

    /// Deletes a comment; replies to it are kept without a parent.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Forbidden`] for anyone but the author.
    pub async fn delete(&self, user_id: UserId, comment_id: CommentId) -> TrackerResult<()> {
        self.load_authored(user_id, comment_id).await?;
        self.store.delete_comment(comment_id).await?;
        info!(%comment_id, %user_id, "deleted comment");
        Ok(())
    }

    async fn load(&self, comment_id: CommentId) -> TrackerResult<Comment> {
        self.store
            .find_comment(comment_id)
            .await?
            .ok_or_else(|| TrackerError::not_found(EntityKind::Comment, comment_id))
    }

    async fn load_authored(&self, user_id: UserId, comment_id: CommentId) -> TrackerResult<Comment> {
        self.guard
            .authorize_write(user_id, Resource::Comment(comment_id))
            .await?;
        let comment = self.load(comment_id).await?;
        if !comment.is_authored_by(user_id) {
            debug!(%comment_id, %user_id, "access denied: not the comment author");
            return Err(TrackerError::Forbidden(ForbiddenReason::NotCommentAuthor));
        }
        Ok(comment)
    }
}
