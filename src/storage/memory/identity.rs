//! In-memory user table.

use super::{InMemoryStore, replace};
use crate::error::{EntityKind, RepositoryError, RepositoryResult, UniqueConstraint};
use crate::identity::{
    domain::{Handle, User},
    ports::UserRepository,
};
use crate::ids::UserId;
use async_trait::async_trait;

fn check_unique(users: &[User], user: &User) -> RepositoryResult<()> {
    let taken = users
        .iter()
        .any(|other| other.id() != user.id() && other.external_id() == user.external_id());
    if taken {
        return Err(RepositoryError::Duplicate(UniqueConstraint::ExternalId));
    }
    Ok(())
}

/// Clears `user`'s handle from every other user still holding it.
fn release_handle(users: &mut [User], user: &User) {
    let Some(handle) = user.handle() else {
        return;
    };
    for other in users
        .iter_mut()
        .filter(|other| other.id() != user.id() && other.handle() == Some(handle))
    {
        other.release_handle(user.updated_at());
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn store_user(&self, user: &User) -> RepositoryResult<()> {
        let mut state = self.write()?;
        if state.users.iter().any(|other| other.id() == user.id()) {
            return Err(RepositoryError::Duplicate(UniqueConstraint::PrimaryKey));
        }
        check_unique(&state.users, user)?;
        release_handle(&mut state.users, user);
        state.users.push(user.clone());
        Ok(())
    }

    async fn update_user(&self, user: &User) -> RepositoryResult<()> {
        let mut state = self.write()?;
        check_unique(&state.users, user)?;
        if !replace(&mut state.users, user, |other| other.id() == user.id()) {
            return Err(RepositoryError::not_found(EntityKind::User, user.id()));
        }
        release_handle(&mut state.users, user);
        Ok(())
    }

    async fn find_user(&self, id: UserId) -> RepositoryResult<Option<User>> {
        let state = self.read()?;
        Ok(state.users.iter().find(|user| user.id() == id).cloned())
    }

    async fn find_user_by_external_id(&self, external_id: i64) -> RepositoryResult<Option<User>> {
        let state = self.read()?;
        Ok(state
            .users
            .iter()
            .find(|user| user.external_id() == external_id)
            .cloned())
    }

    async fn find_users_by_handles(&self, handles: &[Handle]) -> RepositoryResult<Vec<User>> {
        let state = self.read()?;
        Ok(handles
            .iter()
            .filter_map(|handle| {
                state
                    .users
                    .iter()
                    .find(|user| user.handle() == Some(handle))
                    .cloned()
            })
            .collect())
    }
}
