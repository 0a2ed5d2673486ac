//! Workspace, membership and invite orchestration.

use crate::access::{AccessGuard, MANAGE_ROLES, OWNER_ROLES, OwnershipStore};
use crate::error::{
    ConflictReason, EntityKind, ForbiddenReason, RepositoryError, TrackerError, TrackerResult,
    UniqueConstraint,
};
use crate::identity::ports::UserRepository;
use crate::ids::{UserId, WorkspaceId};
use crate::workspace::domain::{
    ColumnTemplate, InviteCode, Membership, Workspace, WorkspaceChanges, WorkspaceName,
    WorkspaceRole, WorkspaceSettings, WorkingDays,
};
use mockable::Clock;
use std::sync::Arc;
use tracing::{info, warn};

/// Invite codes are random; a collision is retried this many times.
const INVITE_CODE_ATTEMPTS: usize = 3;

/// Request payload for creating a workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateWorkspaceRequest {
    name: String,
    description: Option<String>,
    default_columns: Option<Vec<String>>,
    working_days: Option<Vec<i16>>,
    default_reminder_offset_minutes: Option<i32>,
}

impl CreateWorkspaceRequest {
    /// Creates a request with the required name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            default_columns: None,
            working_days: None,
            default_reminder_offset_minutes: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the column template seeded into new boards.
    #[must_use]
    pub fn with_default_columns(mut self, columns: impl IntoIterator<Item = String>) -> Self {
        self.default_columns = Some(columns.into_iter().collect());
        self
    }

    /// Sets the working weekdays.
    #[must_use]
    pub fn with_working_days(mut self, days: impl IntoIterator<Item = i16>) -> Self {
        self.working_days = Some(days.into_iter().collect());
        self
    }

    /// Sets the default reminder offset in minutes.
    #[must_use]
    pub const fn with_default_reminder_offset(mut self, minutes: i32) -> Self {
        self.default_reminder_offset_minutes = Some(minutes);
        self
    }

    fn into_parts(self) -> TrackerResult<(WorkspaceName, WorkspaceSettings)> {
        let name = WorkspaceName::new(&self.name).map_err(TrackerError::bad_request)?;
        let defaults = WorkspaceSettings::default();
        let settings = WorkspaceSettings {
            description: self.description,
            default_columns: self
                .default_columns
                .map(ColumnTemplate::new)
                .transpose()
                .map_err(TrackerError::bad_request)?
                .unwrap_or(defaults.default_columns),
            working_days: self
                .working_days
                .map(WorkingDays::new)
                .transpose()
                .map_err(TrackerError::bad_request)?
                .unwrap_or(defaults.working_days),
            default_reminder_offset_minutes: self
                .default_reminder_offset_minutes
                .unwrap_or(defaults.default_reminder_offset_minutes),
        };
        settings.validate().map_err(TrackerError::bad_request)?;
        Ok((name, settings))
    }
}

/// Workspace lifecycle and membership coordinator.
#[derive(Clone)]
pub struct WorkspaceService<S, C>
where
    S: OwnershipStore + UserRepository,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    guard: AccessGuard<S>,
    clock: Arc<C>,
}

impl<S, C> WorkspaceService<S, C>
where
    S: OwnershipStore + UserRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new workspace service.
    #[must_use]
    pub fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        let guard = AccessGuard::new(Arc::clone(&store));
        Self {
            store,
            guard,
            clock,
        }
    }

    /// Creates a workspace; the creator becomes its `OWNER` member.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::BadRequest`] for invalid settings.
    pub async fn create(
        &self,
        owner_id: UserId,
        request: CreateWorkspaceRequest,
    ) -> TrackerResult<Workspace> {
        let (name, settings) = request.into_parts()?;
        let mut workspace = Workspace::new(name, owner_id, settings, &*self.clock);
        let owner = Membership::new(
            workspace.id(),
            owner_id,
            WorkspaceRole::Owner,
            &*self.clock,
        );

        let mut attempt = 1;
        loop {
            match self.store.create_workspace(&workspace, &owner).await {
                Ok(()) => break,
                Err(RepositoryError::Duplicate(UniqueConstraint::InviteCode))
                    if attempt < INVITE_CODE_ATTEMPTS =>
                {
                    warn!(attempt, "invite code collision, regenerating");
                    workspace.regenerate_invite_code(&*self.clock);
                    attempt += 1;
                }
                Err(err) => return Err(err.into()),
            }
        }
        info!(workspace_id = %workspace.id(), %owner_id, "created workspace");
        Ok(workspace)
    }

    /// Lists the workspaces `user_id` belongs to.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Storage`] on persistence failure.
    pub async fn list(&self, user_id: UserId) -> TrackerResult<Vec<Workspace>> {
        Ok(self.store.list_workspaces_for_user(user_id).await?)
    }

    /// Returns a workspace the user belongs to.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::NotFound`] or [`TrackerError::Forbidden`].
    pub async fn get(&self, user_id: UserId, workspace_id: WorkspaceId) -> TrackerResult<Workspace> {
        let workspace = self.load(workspace_id).await?;
        self.guard.require_membership(workspace_id, user_id).await?;
        Ok(workspace)
    }

    /// Renames or reconfigures a workspace. Requires `OWNER` or `ADMIN`.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::NotFound`], [`TrackerError::Forbidden`] or
    /// [`TrackerError::BadRequest`] for invalid settings.
    pub async fn update(
        &self,
        user_id: UserId,
        workspace_id: WorkspaceId,
        changes: WorkspaceChanges,
    ) -> TrackerResult<Workspace> {
        let mut workspace = self.load(workspace_id).await?;
        self.guard
            .require_role(workspace_id, user_id, MANAGE_ROLES)
            .await?;
        workspace
            .apply_changes(changes, &*self.clock)
            .map_err(TrackerError::bad_request)?;
        self.store.update_workspace(&workspace).await?;
        info!(%workspace_id, %user_id, "updated workspace");
        Ok(workspace)
    }

    /// Deletes a workspace and everything it owns. Requires `OWNER`.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::NotFound`] or [`TrackerError::Forbidden`].
    pub async fn delete(&self, user_id: UserId, workspace_id: WorkspaceId) -> TrackerResult<()> {
        self.load(workspace_id).await?;
        self.guard
            .require_role(workspace_id, user_id, OWNER_ROLES)
            .await?;
        self.store.delete_workspace(workspace_id).await?;
        info!(%workspace_id, %user_id, "deleted workspace");
        Ok(())
    }

    /// Adds `member_id` with `role`. Requires `OWNER` or `ADMIN`.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Conflict`] when the user is already a member,
    /// [`TrackerError::BadRequest`] when granting `OWNER`, and
    /// [`TrackerError::NotFound`] for an unknown workspace or user.
    pub async fn add_member(
        &self,
        actor_id: UserId,
        workspace_id: WorkspaceId,
        member_id: UserId,
        role: WorkspaceRole,
    ) -> TrackerResult<Membership> {
        self.load(workspace_id).await?;
        self.guard
            .require_role(workspace_id, actor_id, MANAGE_ROLES)
            .await?;
        reject_owner_grant(role)?;
        self.store
            .find_user(member_id)
            .await?
            .ok_or_else(|| TrackerError::not_found(EntityKind::User, member_id))?;
        self.insert_membership(workspace_id, member_id, role).await
    }

    /// Lists the members of a workspace.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::NotFound`] or [`TrackerError::Forbidden`].
    pub async fn list_members(
        &self,
        user_id: UserId,
        workspace_id: WorkspaceId,
    ) -> TrackerResult<Vec<Membership>> {
        self.load(workspace_id).await?;
        self.guard.require_membership(workspace_id, user_id).await?;
        Ok(self.store.list_memberships(workspace_id).await?)
    }

    /// Changes a member's role. Requires `OWNER` or `ADMIN`.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Forbidden`] when targeting the owner,
    /// [`TrackerError::BadRequest`] when granting `OWNER`, or
    /// [`TrackerError::NotFound`] when the target is not a member.
    pub async fn change_role(
        &self,
        actor_id: UserId,
        workspace_id: WorkspaceId,
        member_id: UserId,
        role: WorkspaceRole,
    ) -> TrackerResult<Membership> {
        let workspace = self.load(workspace_id).await?;
        self.guard
            .require_role(workspace_id, actor_id, MANAGE_ROLES)
            .await?;
        reject_owner_target(&workspace, member_id)?;
        reject_owner_grant(role)?;
        let mut membership = self.load_membership(workspace_id, member_id).await?;
        membership.set_role(role);
        self.store.update_membership(&membership).await?;
        info!(%workspace_id, %member_id, role = role.as_str(), "changed member role");
        Ok(membership)
    }

    /// Removes a member. Requires `OWNER` or `ADMIN`.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Forbidden`] when targeting the owner or
    /// [`TrackerError::NotFound`] when the target is not a member.
    pub async fn remove_member(
        &self,
        actor_id: UserId,
        workspace_id: WorkspaceId,
        member_id: UserId,
    ) -> TrackerResult<()> {
        let workspace = self.load(workspace_id).await?;
        self.guard
            .require_role(workspace_id, actor_id, MANAGE_ROLES)
            .await?;
        reject_owner_target(&workspace, member_id)?;
        self.load_membership(workspace_id, member_id).await?;
        self.store
            .remove_membership(workspace_id, member_id)
            .await?;
        info!(%workspace_id, %member_id, "removed member");
        Ok(())
    }

    /// Leaves a workspace. The owner cannot leave.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Forbidden`] for the owner or non-members.
    pub async fn leave(&self, user_id: UserId, workspace_id: WorkspaceId) -> TrackerResult<()> {
        let workspace = self.load(workspace_id).await?;
        self.guard.require_membership(workspace_id, user_id).await?;
        reject_owner_target(&workspace, user_id)?;
        self.store.remove_membership(workspace_id, user_id).await?;
        info!(%workspace_id, %user_id, "member left workspace");
        Ok(())
    }

    /// Joins the workspace holding `code` as a `MEMBER`.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::NotFound`] when no workspace holds the code
    /// and [`TrackerError::Conflict`] when the user is already a member.
    pub async fn join_by_invite_code(
        &self,
        user_id: UserId,
        code: &str,
    ) -> TrackerResult<Membership> {
        let not_found = || TrackerError::not_found(EntityKind::InviteCode, code);
        let code = InviteCode::parse(code).map_err(|_| not_found())?;
        let workspace = self
            .store
            .find_workspace_by_invite_code(&code)
            .await?
            .ok_or_else(not_found)?;
        self.insert_membership(workspace.id(), user_id, WorkspaceRole::Member)
            .await
    }

    /// Replaces the invite code. Requires `OWNER` or `ADMIN`.
    ///
    /// The previous code stops working immediately.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::NotFound`] or [`TrackerError::Forbidden`].
    pub async fn regenerate_invite_code(
        &self,
        user_id: UserId,
        workspace_id: WorkspaceId,
    ) -> TrackerResult<Workspace> {
        let mut workspace = self.load(workspace_id).await?;
        self.guard
            .require_role(workspace_id, user_id, MANAGE_ROLES)
            .await?;
        let mut attempt = 1;
        loop {
            workspace.regenerate_invite_code(&*self.clock);
            match self.store.update_workspace(&workspace).await {
                Ok(()) => break,
                Err(RepositoryError::Duplicate(UniqueConstraint::InviteCode))
                    if attempt < INVITE_CODE_ATTEMPTS =>
                {
                    warn!(attempt, "invite code collision, regenerating");
                    attempt += 1;
                }
                Err(err) => return Err(err.into()),
            }
        }
        info!(%workspace_id, %user_id, "regenerated invite code");
        Ok(workspace)
    }

    async fn load(&self, workspace_id: WorkspaceId) -> TrackerResult<Workspace> {
        self.store
            .find_workspace(workspace_id)
            .await?
            .ok_or_else(|| TrackerError::not_found(EntityKind::Workspace, workspace_id))
    }

    async fn load_membership(
        &self,
        workspace_id: WorkspaceId,
        user_id: UserId,
    ) -> TrackerResult<Membership> {
        self.store
            .find_membership(workspace_id, user_id)
            .await?
            .ok_or_else(|| TrackerError::not_found(EntityKind::Membership, user_id))
    }

    async fn insert_membership(
        &self,
        workspace_id: WorkspaceId,
        user_id: UserId,
        role: WorkspaceRole,
    ) -> TrackerResult<Membership> {
        if self
            .store
            .find_membership(workspace_id, user_id)
            .await?
            .is_some()
        {
            return Err(TrackerError::Conflict(ConflictReason::Unique(
                UniqueConstraint::MembershipPair,
            )));
        }
        let membership = Membership::new(workspace_id, user_id, role, &*self.clock);
        // The unique (workspace, user) index settles concurrent joins.
        self.store.add_membership(&membership).await?;
        info!(%workspace_id, %user_id, role = role.as_str(), "added member");
        Ok(membership)
    }
}

fn reject_owner_grant(role: WorkspaceRole) -> TrackerResult<()> {
    if role == WorkspaceRole::Owner {
        return Err(TrackerError::bad_request(
            "the owner role cannot be granted",
        ));
    }
    Ok(())
}

fn reject_owner_target(workspace: &Workspace, user_id: UserId) -> TrackerResult<()> {
    if workspace.owner_id() == user_id {
        return Err(TrackerError::Forbidden(
            ForbiddenReason::OwnerMembershipImmutable,
        ));
    }
    Ok(())
}
