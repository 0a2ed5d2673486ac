//! Repository port for mentions.

use crate::error::RepositoryResult;
use crate::ids::MentionId;
use crate::mention::domain::{Mention, MentionTarget};
use async_trait::async_trait;

/// Mention persistence contract.
#[async_trait]
pub trait MentionRepository: Send + Sync {
    /// Stores new mentions.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::RepositoryError::NotFound`] when the target
    /// was deleted concurrently.
    async fn store_mentions(&self, mentions: &[Mention]) -> RepositoryResult<()>;

    /// Flags a mention as notified.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::RepositoryError::NotFound`] when the mention
    /// does not exist.
    async fn mark_mention_notified(&self, id: MentionId) -> RepositoryResult<()>;

    /// Lists the mentions recorded for `target`, oldest first.
    async fn list_mentions(&self, target: MentionTarget) -> RepositoryResult<Vec<Mention>>;
}
