//! In-memory workspace and membership tables.

use super::{InMemoryStore, replace};
use crate::error::{EntityKind, RepositoryError, RepositoryResult, UniqueConstraint};
use crate::ids::{UserId, WorkspaceId};
use crate::workspace::{
    domain::{InviteCode, Membership, Workspace},
    ports::{MembershipRepository, WorkspaceRepository},
};
use async_trait::async_trait;

fn check_invite_code(workspaces: &[Workspace], workspace: &Workspace) -> RepositoryResult<()> {
    let taken = workspaces.iter().any(|other| {
        other.id() != workspace.id() && other.invite_code() == workspace.invite_code()
    });
    if taken {
        return Err(RepositoryError::Duplicate(UniqueConstraint::InviteCode));
    }
    Ok(())
}

#[async_trait]
impl WorkspaceRepository for InMemoryStore {
    async fn create_workspace(
        &self,
        workspace: &Workspace,
        owner: &Membership,
    ) -> RepositoryResult<()> {
        let mut state = self.write()?;
        if state.has_workspace(workspace.id()) {
            return Err(RepositoryError::Duplicate(UniqueConstraint::PrimaryKey));
        }
        check_invite_code(&state.workspaces, workspace)?;
        state.workspaces.push(workspace.clone());
        state.memberships.push(owner.clone());
        Ok(())
    }

    async fn update_workspace(&self, workspace: &Workspace) -> RepositoryResult<()> {
        let mut state = self.write()?;
        check_invite_code(&state.workspaces, workspace)?;
        if !replace(&mut state.workspaces, workspace, |other| {
            other.id() == workspace.id()
        }) {
            return Err(RepositoryError::not_found(
                EntityKind::Workspace,
                workspace.id(),
            ));
        }
        Ok(())
    }

    async fn delete_workspace(&self, id: WorkspaceId) -> RepositoryResult<()> {
        let mut state = self.write()?;
        if !state.has_workspace(id) {
            return Err(RepositoryError::not_found(EntityKind::Workspace, id));
        }
        state.remove_workspace(id);
        Ok(())
    }

    async fn find_workspace(&self, id: WorkspaceId) -> RepositoryResult<Option<Workspace>> {
        let state = self.read()?;
        Ok(state
            .workspaces
            .iter()
            .find(|workspace| workspace.id() == id)
            .cloned())
    }

    async fn find_workspace_by_invite_code(
        &self,
        code: &InviteCode,
    ) -> RepositoryResult<Option<Workspace>> {
        let state = self.read()?;
        Ok(state
            .workspaces
            .iter()
            .find(|workspace| workspace.invite_code() == code)
            .cloned())
    }

    async fn list_workspaces_for_user(&self, user_id: UserId) -> RepositoryResult<Vec<Workspace>> {
        let state = self.read()?;
        let mut workspaces: Vec<Workspace> = state
            .workspaces
            .iter()
            .rev()
            .filter(|workspace| state.is_member(workspace.id(), user_id))
            .cloned()
            .collect();
        workspaces.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(workspaces)
    }
}

#[async_trait]
impl MembershipRepository for InMemoryStore {
    async fn find_membership(
        &self,
        workspace_id: WorkspaceId,
        user_id: UserId,
    ) -> RepositoryResult<Option<Membership>> {
        let state = self.read()?;
        Ok(state
            .memberships
            .iter()
            .find(|m| m.workspace_id() == workspace_id && m.user_id() == user_id)
            .cloned())
    }

    async fn add_membership(&self, membership: &Membership) -> RepositoryResult<()> {
        let mut state = self.write()?;
        if !state.has_workspace(membership.workspace_id()) {
            return Err(RepositoryError::not_found(
                EntityKind::Workspace,
                membership.workspace_id(),
            ));
        }
        if state.is_member(membership.workspace_id(), membership.user_id()) {
            return Err(RepositoryError::Duplicate(UniqueConstraint::MembershipPair));
        }
        state.memberships.push(membership.clone());
        Ok(())
    }

    async fn update_membership(&self, membership: &Membership) -> RepositoryResult<()> {
        let mut state = self.write()?;
        if !replace(&mut state.memberships, membership, |m| {
            m.workspace_id() == membership.workspace_id() && m.user_id() == membership.user_id()
        }) {
            return Err(RepositoryError::not_found(
                EntityKind::Membership,
                membership.user_id(),
            ));
        }
        Ok(())
    }

    async fn remove_membership(
        &self,
        workspace_id: WorkspaceId,
        user_id: UserId,
    ) -> RepositoryResult<()> {
        let mut state = self.write()?;
        if !state.is_member(workspace_id, user_id) {
            return Err(RepositoryError::not_found(EntityKind::Membership, user_id));
        }
        state
            .memberships
            .retain(|m| !(m.workspace_id() == workspace_id && m.user_id() == user_id));
        Ok(())
    }

    async fn list_memberships(&self, workspace_id: WorkspaceId) -> RepositoryResult<Vec<Membership>> {
        let state = self.read()?;
        Ok(state
            .memberships
            .iter()
            .filter(|m| m.workspace_id() == workspace_id)
            .cloned()
            .collect())
    }

    async fn list_memberships_for_user(&self, user_id: UserId) -> RepositoryResult<Vec<Membership>> {
        let state = self.read()?;
        Ok(state
            .memberships
            .iter()
            .filter(|m| m.user_id() == user_id)
            .cloned()
            .collect())
    }
}
