//! Comment aggregate.

use crate::ids::{CommentId, TaskId, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors returned while constructing comment values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CommentDomainError {
    /// The body is empty after trimming.
    #[error("comment body must not be empty")]
    EmptyBody,
}

/// Validated comment text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentBody(String);

impl CommentBody {
    /// Creates a validated comment body.
    ///
    /// # Errors
    ///
    /// Returns [`CommentDomainError::EmptyBody`] when blank.
    pub fn new(value: impl Into<String>) -> Result<Self, CommentDomainError> {
        let body = value.into();
        if body.trim().is_empty() {
            return Err(CommentDomainError::EmptyBody);
        }
        Ok(Self(body))
    }

    /// Returns the text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Comment on a task, optionally replying to another comment on the same task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    id: CommentId,
    task_id: TaskId,
    author_id: UserId,
    parent_id: Option<CommentId>,
    body: CommentBody,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedCommentData {
    /// Persisted identifier.
    pub id: CommentId,
    /// Commented task.
    pub task_id: TaskId,
    /// Writing user.
    pub author_id: UserId,
    /// Replied-to comment.
    pub parent_id: Option<CommentId>,
    /// Persisted text.
    pub body: CommentBody,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    /// Creates a comment by `author_id` on `task_id`.
    #[must_use]
    pub fn new(
        task_id: TaskId,
        author_id: UserId,
        parent_id: Option<CommentId>,
        body: CommentBody,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        Self {
            id: CommentId::new(),
            task_id,
            author_id,
            parent_id,
            body,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a comment from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedCommentData) -> Self {
        Self {
            id: data.id,
            task_id: data.task_id,
            author_id: data.author_id,
            parent_id: data.parent_id,
            body: data.body,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Replaces the text.
    pub fn edit(&mut self, body: CommentBody, clock: &impl Clock) {
        self.body = body;
        self.updated_at = clock.utc();
    }

    /// Returns whether `user_id` wrote this comment.
    #[must_use]
    pub fn is_authored_by(&self, user_id: UserId) -> bool {
        self.author_id == user_id
    }

    /// Returns the comment identifier.
    #[must_use]
    pub const fn id(&self) -> CommentId {
        self.id
    }

    /// Returns the commented task.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the writing user.
    #[must_use]
    pub const fn author_id(&self) -> UserId {
        self.author_id
    }

    /// Returns the replied-to comment, if any.
    #[must_use]
    pub const fn parent_id(&self) -> Option<CommentId> {
        self.parent_id
    }

    /// Returns the text.
    #[must_use]
    pub const fn body(&self) -> &CommentBody {
        &self.body
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
