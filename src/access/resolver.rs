//! Membership lookup.

use crate::error::TrackerResult;
use crate::ids::{UserId, WorkspaceId};
use crate::workspace::{domain::Membership, ports::MembershipRepository};
use std::sync::Arc;

/// Answers "is this user a member of this workspace, and with which role".
///
/// Reads current state on every call so a role change is effective for the
/// very next request.
#[derive(Clone)]
pub struct MembershipResolver<S>
where
    S: MembershipRepository,
{
    store: Arc<S>,
}

impl<S> MembershipResolver<S>
where
    S: MembershipRepository,
{
    /// Creates a resolver over `store`.
    #[must_use]
    pub const fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Returns the membership of `user_id` in `workspace_id`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::TrackerError::Storage`] on persistence failure.
    pub async fn resolve(
        &self,
        workspace_id: WorkspaceId,
        user_id: UserId,
    ) -> TrackerResult<Option<Membership>> {
        Ok(self.store.find_membership(workspace_id, user_id).await?)
    }
}
