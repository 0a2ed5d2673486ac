//! Repository port for registered users.

use crate::error::RepositoryResult;
use crate::identity::domain::{Handle, User};
use crate::ids::UserId;
use async_trait::async_trait;

/// User persistence contract.
///
/// Handles come from the identity provider, which is the authority on who
/// holds one. Writing a user with a handle clears that handle from any
/// other user in the same write, so a recycled handle never blocks the
/// user who now holds it.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Stores a newly registered user.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::RepositoryError::Duplicate`] when the external
    /// identity is already registered.
    async fn store_user(&self, user: &User) -> RepositoryResult<()>;

    /// Persists profile changes of an existing user.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::RepositoryError::NotFound`] when the user does
    /// not exist.
    async fn update_user(&self, user: &User) -> RepositoryResult<()>;

    /// Finds a user by internal identifier.
    async fn find_user(&self, id: UserId) -> RepositoryResult<Option<User>>;

    /// Finds a user by provider-assigned identifier.
    async fn find_user_by_external_id(&self, external_id: i64) -> RepositoryResult<Option<User>>;

    /// Returns the users owning any of `handles`.
    ///
    /// Handles without a registered user are omitted; order is unspecified.
    async fn find_users_by_handles(&self, handles: &[Handle]) -> RepositoryResult<Vec<User>>;
}
