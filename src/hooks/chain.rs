//! Hook contract and ordered dispatch.

use crate::comment::domain::Comment;
use crate::error::TrackerResult;
use crate::identity::ports::UserRepository;
use crate::ids::UserId;
use crate::mention::ports::MentionRepository;
use crate::notification::ports::NotificationRepository;
use crate::task::domain::Task;
use async_trait::async_trait;
use mockable::Clock;
use std::sync::Arc;
use tracing::warn;

use super::{AssignmentHook, MentionHook};

/// A committed change that may trigger side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitEvent {
    /// A task was created.
    TaskCreated {
        /// Acting user.
        actor: UserId,
        /// The new task.
        task: Task,
    },
    /// A task's tracked fields changed.
    TaskUpdated {
        /// Acting user.
        actor: UserId,
        /// State before the update.
        before: Box<Task>,
        /// State after the update.
        after: Box<Task>,
    },
    /// A comment was posted.
    CommentCreated {
        /// Acting user.
        actor: UserId,
        /// The commented task.
        task: Task,
        /// The new comment.
        comment: Comment,
    },
}

impl CommitEvent {
    /// Returns a short event label for logs.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::TaskCreated { .. } => "task_created",
            Self::TaskUpdated { .. } => "task_updated",
            Self::CommentCreated { .. } => "comment_created",
        }
    }
}

/// Side effect run after a primary write commits.
#[async_trait]
pub trait PostCommitHook: Send + Sync {
    /// Returns the hook name used in logs.
    fn name(&self) -> &'static str;

    /// Reacts to `event`.
    ///
    /// # Errors
    ///
    /// Any error is logged by the chain and otherwise ignored.
    async fn on_commit(&self, event: &CommitEvent) -> TrackerResult<()>;
}

/// Ordered list of post-commit hooks.
#[derive(Clone, Default)]
pub struct HookChain {
    hooks: Vec<Arc<dyn PostCommitHook>>,
}

impl HookChain {
    /// Creates a chain with no hooks.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the chain used in production: mentions, then assignments.
    #[must_use]
    pub fn standard<S, C>(store: Arc<S>, clock: Arc<C>) -> Self
    where
        S: UserRepository + MentionRepository + NotificationRepository + 'static,
        C: Clock + Send + Sync + 'static,
    {
        Self::new()
            .with_hook(MentionHook::new(Arc::clone(&store), Arc::clone(&clock)))
            .with_hook(AssignmentHook::new(store, clock))
    }

    /// Appends a hook.
    #[must_use]
    pub fn with_hook(mut self, hook: impl PostCommitHook + 'static) -> Self {
        self.hooks.push(Arc::new(hook));
        self
    }

    /// Returns the number of registered hooks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    /// Returns whether no hook is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Runs every hook for `event`, logging and swallowing failures.
    pub async fn dispatch(&self, event: &CommitEvent) {
        for hook in &self.hooks {
            if let Err(err) = hook.on_commit(event).await {
                warn!(
                    hook = hook.name(),
                    event = event.label(),
                    error = %err,
                    "post-commit hook failed"
                );
            }
        }
    }
}
