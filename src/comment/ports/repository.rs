//! Repository port for comments.

use crate::comment::domain::Comment;
use crate::error::RepositoryResult;
use crate::ids::{CommentId, TaskId};
use async_trait::async_trait;

/// Comment persistence contract.
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Stores a new comment.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::RepositoryError::NotFound`] when the task was
    /// deleted concurrently.
    async fn store_comment(&self, comment: &Comment) -> RepositoryResult<()>;

    /// Persists an edited comment.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::RepositoryError::NotFound`] when the comment
    /// does not exist.
    async fn update_comment(&self, comment: &Comment) -> RepositoryResult<()>;

    /// Deletes a comment and its mentions; replies lose their parent link.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::RepositoryError::NotFound`] when the comment
    /// does not exist.
    async fn delete_comment(&self, id: CommentId) -> RepositoryResult<()>;

    /// Finds a comment by identifier.
    async fn find_comment(&self, id: CommentId) -> RepositoryResult<Option<Comment>>;

    /// Lists a task's comments, oldest first.
    async fn list_comments(&self, task_id: TaskId) -> RepositoryResult<Vec<Comment>>;
}
