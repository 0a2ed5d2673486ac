//! Authentication and profile orchestration.

use crate::error::{
    ConflictReason, EntityKind, RepositoryError, TrackerError, TrackerResult, UniqueConstraint,
};
use crate::identity::{
    domain::{ExternalIdentity, ProfileUpdate, User},
    ports::UserRepository,
};
use crate::ids::UserId;
use mockable::Clock;
use std::sync::Arc;
use tracing::{debug, info};

/// Creates and refreshes users from verified external identities.
#[derive(Clone)]
pub struct IdentityService<S, C>
where
    S: UserRepository,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    clock: Arc<C>,
}

impl<S, C> IdentityService<S, C>
where
    S: UserRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new identity service.
    #[must_use]
    pub const fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        Self { store, clock }
    }

    /// Returns the user for `identity`, registering it on first sight.
    ///
    /// Existing users have their profile refreshed from the identity. The
    /// asserted handle is taken from any other user still holding it.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Storage`] on persistence failure.
    pub async fn authenticate(&self, identity: ExternalIdentity) -> TrackerResult<User> {
        match self.sign_in(identity.clone()).await {
            // A concurrent login claimed the same handle; the retry releases it.
            Err(TrackerError::Conflict(ConflictReason::Unique(UniqueConstraint::Handle))) => {
                debug!(
                    external_id = identity.external_id(),
                    "handle claimed concurrently, retrying"
                );
                self.sign_in(identity).await
            }
            other => other,
        }
    }

    async fn sign_in(&self, identity: ExternalIdentity) -> TrackerResult<User> {
        if let Some(existing) = self
            .store
            .find_user_by_external_id(identity.external_id())
            .await?
        {
            return self.refresh(existing, identity).await;
        }

        let user = User::register(identity.clone(), &*self.clock);
        match self.store.store_user(&user).await {
            Ok(()) => {
                info!(user_id = %user.id(), external_id = user.external_id(), "registered user");
                Ok(user)
            }
            // A concurrent first login won the insert; fall back to refreshing it.
            Err(RepositoryError::Duplicate(UniqueConstraint::ExternalId)) => {
                let existing = self
                    .store
                    .find_user_by_external_id(identity.external_id())
                    .await?
                    .ok_or_else(|| {
                        TrackerError::not_found(EntityKind::User, identity.external_id())
                    })?;
                self.refresh(existing, identity).await
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Returns the user record for `user_id`.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::NotFound`] when the user does not exist.
    pub async fn me(&self, user_id: UserId) -> TrackerResult<User> {
        self.store
            .find_user(user_id)
            .await?
            .ok_or_else(|| TrackerError::not_found(EntityKind::User, user_id))
    }

    /// Applies user-initiated display changes.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::BadRequest`] for a blank first name or
    /// [`TrackerError::NotFound`] when the user does not exist.
    pub async fn update_profile(
        &self,
        user_id: UserId,
        update: ProfileUpdate,
    ) -> TrackerResult<User> {
        let mut user = self.me(user_id).await?;
        user.apply_profile_update(update, &*self.clock)
            .map_err(TrackerError::bad_request)?;
        self.store.update_user(&user).await?;
        Ok(user)
    }

    async fn refresh(&self, mut user: User, identity: ExternalIdentity) -> TrackerResult<User> {
        user.refresh_from(identity, &*self.clock);
        self.store.update_user(&user).await?;
        debug!(user_id = %user.id(), "refreshed user profile");
        Ok(user)
    }
}
