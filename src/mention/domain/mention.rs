//! Mention records.

use crate::ids::{CommentId, MentionId, TaskId, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned while parsing mention contexts.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown mention context: {0}")]
pub struct ParseMentionContextError(pub String);

/// Where a mention was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MentionContext {
    /// Task description.
    Task,
    /// Comment body.
    Comment,
}

impl MentionContext {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Task => "task",
            Self::Comment => "comment",
        }
    }
}

impl TryFrom<&str> for MentionContext {
    type Error = ParseMentionContextError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "task" => Ok(Self::Task),
            "comment" => Ok(Self::Comment),
            _ => Err(ParseMentionContextError(value.to_owned())),
        }
    }
}

/// The entity whose text contains the mention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "context", content = "id", rename_all = "snake_case")]
pub enum MentionTarget {
    /// A task description.
    Task(TaskId),
    /// A comment body.
    Comment(CommentId),
}

impl MentionTarget {
    /// Returns the context discriminator.
    #[must_use]
    pub const fn context(self) -> MentionContext {
        match self {
            Self::Task(_) => MentionContext::Task,
            Self::Comment(_) => MentionContext::Comment,
        }
    }

    /// Returns the task id when the target is a task.
    #[must_use]
    pub const fn task_id(self) -> Option<TaskId> {
        match self {
            Self::Task(id) => Some(id),
            Self::Comment(_) => None,
        }
    }

    /// Returns the comment id when the target is a comment.
    #[must_use]
    pub const fn comment_id(self) -> Option<CommentId> {
        match self {
            Self::Comment(id) => Some(id),
            Self::Task(_) => None,
        }
    }
}

/// Record that a user was named in a task or comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mention {
    id: MentionId,
    target: MentionTarget,
    mentioned_user_id: UserId,
    notified: bool,
    created_at: DateTime<Utc>,
}

impl Mention {
    /// Records a mention of `mentioned_user_id` in `target`.
    #[must_use]
    pub fn new(target: MentionTarget, mentioned_user_id: UserId, clock: &impl Clock) -> Self {
        Self {
            id: MentionId::new(),
            target,
            mentioned_user_id,
            notified: false,
            created_at: clock.utc(),
        }
    }

    /// Reconstructs a mention from persisted storage.
    #[must_use]
    pub const fn from_persisted(
        id: MentionId,
        target: MentionTarget,
        mentioned_user_id: UserId,
        notified: bool,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            target,
            mentioned_user_id,
            notified,
            created_at,
        }
    }

    /// Returns the mention identifier.
    #[must_use]
    pub const fn id(&self) -> MentionId {
        self.id
    }

    /// Returns the mentioning entity.
    #[must_use]
    pub const fn target(&self) -> MentionTarget {
        self.target
    }

    /// Returns the mentioned user.
    #[must_use]
    pub const fn mentioned_user_id(&self) -> UserId {
        self.mentioned_user_id
    }

    /// Returns whether a notification was created for this mention.
    #[must_use]
    pub const fn notified(&self) -> bool {
        self.notified
    }

    /// Returns when the mention was recorded.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
