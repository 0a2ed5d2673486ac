//! In-memory mention table.

use super::InMemoryStore;
use crate::error::{EntityKind, RepositoryError, RepositoryResult};
use crate::ids::MentionId;
use crate::mention::{
    domain::{Mention, MentionTarget},
    ports::MentionRepository,
};
use async_trait::async_trait;

#[async_trait]
impl MentionRepository for InMemoryStore {
    async fn store_mentions(&self, mentions: &[Mention]) -> RepositoryResult<()> {
        let mut state = self.write()?;
        for mention in mentions {
            let exists = match mention.target() {
                MentionTarget::Task(task_id) => state.has_task(task_id),
                MentionTarget::Comment(comment_id) => state.has_comment(comment_id),
            };
            if !exists {
                return Err(match mention.target() {
                    MentionTarget::Task(id) => RepositoryError::not_found(EntityKind::Task, id),
                    MentionTarget::Comment(id) => {
                        RepositoryError::not_found(EntityKind::Comment, id)
                    }
                });
            }
        }
        state.mentions.extend_from_slice(mentions);
        Ok(())
    }

    async fn mark_mention_notified(&self, id: MentionId) -> RepositoryResult<()> {
        let mut state = self.write()?;
        let Some(slot) = state.mentions.iter_mut().find(|mention| mention.id() == id) else {
            return Err(RepositoryError::not_found(EntityKind::Mention, id));
        };
        *slot = Mention::from_persisted(
            slot.id(),
            slot.target(),
            slot.mentioned_user_id(),
            true,
            slot.created_at(),
        );
        Ok(())
    }

    async fn list_mentions(&self, target: MentionTarget) -> RepositoryResult<Vec<Mention>> {
        let state = self.read()?;
        Ok(state
            .mentions
            .iter()
            .filter(|mention| mention.target() == target)
            .cloned()
            .collect())
    }
}
