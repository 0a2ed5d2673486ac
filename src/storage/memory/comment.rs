//! In-memory comment table.

use super::{InMemoryStore, replace};
use crate::comment::{
    domain::{Comment, PersistedCommentData},
    ports::CommentRepository,
};
use crate::error::{EntityKind, RepositoryError, RepositoryResult, UniqueConstraint};
use crate::ids::{CommentId, TaskId};
use async_trait::async_trait;

/// Returns a copy of `comment` detached from its parent.
pub(super) fn orphaned(comment: &Comment) -> Comment {
    Comment::from_persisted(PersistedCommentData {
        id: comment.id(),
        task_id: comment.task_id(),
        author_id: comment.author_id(),
        parent_id: None,
        body: comment.body().clone(),
        created_at: comment.created_at(),
        updated_at: comment.updated_at(),
    })
}

#[async_trait]
impl CommentRepository for InMemoryStore {
    async fn store_comment(&self, comment: &Comment) -> RepositoryResult<()> {
        let mut state = self.write()?;
        if !state.has_task(comment.task_id()) {
            return Err(RepositoryError::not_found(
                EntityKind::Task,
                comment.task_id(),
            ));
        }
        if let Some(parent_id) = comment.parent_id() {
            if !state.has_comment(parent_id) {
                return Err(RepositoryError::not_found(EntityKind::Comment, parent_id));
            }
        }
        if state.has_comment(comment.id()) {
            return Err(RepositoryError::Duplicate(UniqueConstraint::PrimaryKey));
        }
        state.comments.push(comment.clone());
        Ok(())
    }

    async fn update_comment(&self, comment: &Comment) -> RepositoryResult<()> {
        let mut state = self.write()?;
        if !replace(&mut state.comments, comment, |other| other.id() == comment.id()) {
            return Err(RepositoryError::not_found(EntityKind::Comment, comment.id()));
        }
        Ok(())
    }

    async fn delete_comment(&self, id: CommentId) -> RepositoryResult<()> {
        let mut state = self.write()?;
        if !state.has_comment(id) {
            return Err(RepositoryError::not_found(EntityKind::Comment, id));
        }
        state.remove_comment(id);
        Ok(())
    }

    async fn find_comment(&self, id: CommentId) -> RepositoryResult<Option<Comment>> {
        let state = self.read()?;
        Ok(state.comments.iter().find(|comment| comment.id() == id).cloned())
    }

    async fn list_comments(&self, task_id: TaskId) -> RepositoryResult<Vec<Comment>> {
        let state = self.read()?;
        let mut comments: Vec<Comment> = state
            .comments
            .iter()
            .filter(|comment| comment.task_id() == task_id)
            .cloned()
            .collect();
        comments.sort_by_key(Comment::created_at);
        Ok(comments)
    }
}
