//! Ownership-chain resolution and role checks.

use super::{AccessScope, MembershipResolver, Resource};
use crate::board::ports::BoardRepository;
use crate::comment::ports::CommentRepository;
use crate::error::{EntityKind, ForbiddenReason, TrackerError, TrackerResult};
use crate::ids::{UserId, WorkspaceId};
use crate::project::ports::ProjectRepository;
use crate::reminder::ports::ReminderRepository;
use crate::task::ports::TaskRepository;
use crate::workspace::{
    domain::{Membership, WorkspaceRole},
    ports::{MembershipRepository, WorkspaceRepository},
};
use std::sync::Arc;
use tracing::debug;

/// Roles allowed to change workspace content.
pub const WRITE_ROLES: &[WorkspaceRole] = &[
    WorkspaceRole::Owner,
    WorkspaceRole::Admin,
    WorkspaceRole::Member,
];

/// Roles allowed to manage workspace settings, members and invites.
pub const MANAGE_ROLES: &[WorkspaceRole] = &[WorkspaceRole::Owner, WorkspaceRole::Admin];

/// Roles allowed to delete a workspace.
pub const OWNER_ROLES: &[WorkspaceRole] = &[WorkspaceRole::Owner];

/// Storage capabilities needed to walk every ownership chain.
pub trait OwnershipStore:
    MembershipRepository
    + WorkspaceRepository
    + ProjectRepository
    + BoardRepository
    + TaskRepository
    + CommentRepository
    + ReminderRepository
{
}

impl<T> OwnershipStore for T where
    T: MembershipRepository
        + WorkspaceRepository
        + ProjectRepository
        + BoardRepository
        + TaskRepository
        + CommentRepository
        + ReminderRepository
{
}

/// Decides whether a user may act on a resource.
#[derive(Clone)]
pub struct AccessGuard<S>
where
    S: OwnershipStore,
{
    store: Arc<S>,
    resolver: MembershipResolver<S>,
}

impl<S> AccessGuard<S>
where
    S: OwnershipStore,
{
    /// Creates a guard over `store`.
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        let resolver = MembershipResolver::new(Arc::clone(&store));
        Self { store, resolver }
    }

    /// Walks `resource` up to its owning workspace.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::NotFound`] naming the first missing link.
    pub async fn resolve(&self, resource: Resource) -> TrackerResult<AccessScope> {
        let mut current = resource;
        loop {
            current = match current {
                Resource::Workspace(id) => {
                    self.store
                        .find_workspace(id)
                        .await?
                        .ok_or_else(|| TrackerError::not_found(EntityKind::Workspace, id))?;
                    return Ok(AccessScope {
                        workspace_id: id,
                        project_id: None,
                        visibility: None,
                    });
                }
                Resource::Project(id) => {
                    let project = self
                        .store
                        .find_project(id)
                        .await?
                        .ok_or_else(|| TrackerError::not_found(EntityKind::Project, id))?;
                    return Ok(AccessScope {
                        workspace_id: project.workspace_id(),
                        project_id: Some(id),
                        visibility: Some(project.visibility()),
                    });
                }
                Resource::Board(id) => self
                    .store
                    .find_board(id)
                    .await?
                    .map(|board| Resource::Project(board.project_id()))
                    .ok_or_else(|| TrackerError::not_found(EntityKind::Board, id))?,
                Resource::Column(id) => self
                    .store
                    .find_column(id)
                    .await?
                    .map(|column| Resource::Board(column.board_id()))
                    .ok_or_else(|| TrackerError::not_found(EntityKind::Column, id))?,
                Resource::Task(id) => self
                    .store
                    .find_task(id)
                    .await?
                    .map(|task| Resource::Project(task.project_id()))
                    .ok_or_else(|| TrackerError::not_found(EntityKind::Task, id))?,
                Resource::Comment(id) => self
                    .store
                    .find_comment(id)
                    .await?
                    .map(|comment| Resource::Task(comment.task_id()))
                    .ok_or_else(|| TrackerError::not_found(EntityKind::Comment, id))?,
                Resource::Reminder(id) => self
                    .store
                    .find_reminder(id)
                    .await?
                    .map(|reminder| Resource::Task(reminder.task_id()))
                    .ok_or_else(|| TrackerError::not_found(EntityKind::Reminder, id))?,
            };
        }
    }

    /// Requires `user_id` to be a member of `workspace_id`.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Forbidden`] when no membership resolves.
    pub async fn require_membership(
        &self,
        workspace_id: WorkspaceId,
        user_id: UserId,
    ) -> TrackerResult<Membership> {
        let Some(membership) = self.resolver.resolve(workspace_id, user_id).await? else {
            debug!(%workspace_id, %user_id, "access denied: not a member");
            return Err(TrackerError::Forbidden(ForbiddenReason::NotAMember));
        };
        Ok(membership)
    }

    /// Requires `user_id` to hold one of `allowed` in `workspace_id`.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Forbidden`] when the user is not a member or
    /// holds another role.
    pub async fn require_role(
        &self,
        workspace_id: WorkspaceId,
        user_id: UserId,
        allowed: &[WorkspaceRole],
    ) -> TrackerResult<Membership> {
        let membership = self.require_membership(workspace_id, user_id).await?;
        if !allowed.contains(&membership.role()) {
            debug!(
                %workspace_id,
                %user_id,
                role = membership.role().as_str(),
                "access denied: insufficient role"
            );
            return Err(TrackerError::Forbidden(ForbiddenReason::InsufficientRole {
                actual: membership.role(),
            }));
        }
        Ok(membership)
    }

    /// Authorizes a read of `resource`.
    ///
    /// Resources inside a `PUBLIC_READONLY` project are readable by any
    /// authenticated user; everything else requires membership.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::NotFound`] for a broken chain or
    /// [`TrackerError::Forbidden`] for a non-member.
    pub async fn authorize_read(
        &self,
        user_id: UserId,
        resource: Resource,
    ) -> TrackerResult<AccessScope> {
        let scope = self.resolve(resource).await?;
        if scope.is_publicly_readable() {
            return Ok(scope);
        }
        self.require_membership(scope.workspace_id, user_id).await?;
        Ok(scope)
    }

    /// Authorizes a change to `resource` by a member with a writing role.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::NotFound`] for a broken chain or
    /// [`TrackerError::Forbidden`] for non-members and viewers.
    pub async fn authorize_write(
        &self,
        user_id: UserId,
        resource: Resource,
    ) -> TrackerResult<AccessScope> {
        let scope = self.resolve(resource).await?;
        self.require_role(scope.workspace_id, user_id, WRITE_ROLES)
            .await?;
        Ok(scope)
    }

    /// Authorizes an action on `resource` open to every member, viewers
    /// included.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::NotFound`] for a broken chain or
    /// [`TrackerError::Forbidden`] for a non-member.
    pub async fn authorize_member(
        &self,
        user_id: UserId,
        resource: Resource,
    ) -> TrackerResult<(AccessScope, Membership)> {
        let scope = self.resolve(resource).await?;
        let membership = self.require_membership(scope.workspace_id, user_id).await?;
        Ok((scope, membership))
    }
}
