//! Repository ports for workspaces and their memberships.

use crate::error::RepositoryResult;
use crate::ids::{UserId, WorkspaceId};
use crate::workspace::domain::{InviteCode, Membership, Workspace};
use async_trait::async_trait;

/// Workspace persistence contract.
#[async_trait]
pub trait WorkspaceRepository: Send + Sync {
    /// Stores a new workspace together with its owner membership.
    ///
    /// Both rows are written atomically.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::RepositoryError::Duplicate`] when the invite
    /// code collides with another workspace.
    async fn create_workspace(
        &self,
        workspace: &Workspace,
        owner: &Membership,
    ) -> RepositoryResult<()>;

    /// Persists changes to an existing workspace.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::RepositoryError::NotFound`] when the workspace
    /// does not exist, or `Duplicate` on an invite-code collision.
    async fn update_workspace(&self, workspace: &Workspace) -> RepositoryResult<()>;

    /// Deletes a workspace and everything it owns.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::RepositoryError::NotFound`] when the workspace
    /// does not exist.
    async fn delete_workspace(&self, id: WorkspaceId) -> RepositoryResult<()>;

    /// Finds a workspace by identifier.
    async fn find_workspace(&self, id: WorkspaceId) -> RepositoryResult<Option<Workspace>>;

    /// Finds the workspace currently holding `code`.
    async fn find_workspace_by_invite_code(
        &self,
        code: &InviteCode,
    ) -> RepositoryResult<Option<Workspace>>;

    /// Lists the workspaces `user_id` is a member of, newest first.
    async fn list_workspaces_for_user(&self, user_id: UserId) -> RepositoryResult<Vec<Workspace>>;
}

/// Membership persistence contract.
#[async_trait]
pub trait MembershipRepository: Send + Sync {
    /// Reads the membership of `user_id` in `workspace_id`.
    ///
    /// Always reads current state; implementations must not cache.
    async fn find_membership(
        &self,
        workspace_id: WorkspaceId,
        user_id: UserId,
    ) -> RepositoryResult<Option<Membership>>;

    /// Stores a new membership.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::RepositoryError::Duplicate`] with
    /// [`crate::error::UniqueConstraint::MembershipPair`] when the pair exists.
    async fn add_membership(&self, membership: &Membership) -> RepositoryResult<()>;

    /// Persists a role change.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::RepositoryError::NotFound`] when the membership
    /// does not exist.
    async fn update_membership(&self, membership: &Membership) -> RepositoryResult<()>;

    /// Removes a membership.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::RepositoryError::NotFound`] when the membership
    /// does not exist.
    async fn remove_membership(
        &self,
        workspace_id: WorkspaceId,
        user_id: UserId,
    ) -> RepositoryResult<()>;

    /// Lists the memberships of a workspace in join order.
    async fn list_memberships(&self, workspace_id: WorkspaceId)
    -> RepositoryResult<Vec<Membership>>;

    /// Lists the memberships held by a user.
    async fn list_memberships_for_user(&self, user_id: UserId)
    -> RepositoryResult<Vec<Membership>>;
}
