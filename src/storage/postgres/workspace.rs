//! Workspace and membership tables.

use super::{
    PostgresStore, expect_affected, missing_parent,
    models::{MembershipRow, WorkspaceRow},
    schema::{workspace_members, workspaces},
};
use crate::error::{EntityKind, RepositoryError, RepositoryResult};
use crate::ids::{UserId, WorkspaceId};
use crate::workspace::{
    domain::{InviteCode, Membership, Workspace},
    ports::{MembershipRepository, WorkspaceRepository},
};
use async_trait::async_trait;
use diesel::prelude::*;

#[async_trait]
impl WorkspaceRepository for PostgresStore {
    async fn create_workspace(
        &self,
        workspace: &Workspace,
        owner: &Membership,
    ) -> RepositoryResult<()> {
        let workspace_row = WorkspaceRow::from(workspace);
        let owner_row = MembershipRow::from(owner);
        self.run(move |connection| {
            connection.transaction::<_, RepositoryError, _>(|tx| {
                diesel::insert_into(workspaces::table)
                    .values(&workspace_row)
                    .execute(tx)
                    .map_err(missing_parent(EntityKind::User, workspace_row.owner_id))?;
                diesel::insert_into(workspace_members::table)
                    .values(&owner_row)
                    .execute(tx)?;
                Ok(())
            })
        })
        .await
    }

    async fn update_workspace(&self, workspace: &Workspace) -> RepositoryResult<()> {
        let row = WorkspaceRow::from(workspace);
        self.run(move |connection| {
            let affected = diesel::update(workspaces::table.find(row.id))
                .set(&row)
                .execute(connection)?;
            expect_affected(affected, EntityKind::Workspace, row.id)
        })
        .await
    }

    async fn delete_workspace(&self, id: WorkspaceId) -> RepositoryResult<()> {
        self.run(move |connection| {
            let affected =
                diesel::delete(workspaces::table.find(id.into_inner())).execute(connection)?;
            expect_affected(affected, EntityKind::Workspace, id)
        })
        .await
    }

    async fn find_workspace(&self, id: WorkspaceId) -> RepositoryResult<Option<Workspace>> {
        self.run(move |connection| {
            workspaces::table
                .find(id.into_inner())
                .select(WorkspaceRow::as_select())
                .first(connection)
                .optional()?
                .map(WorkspaceRow::into_domain)
                .transpose()
        })
        .await
    }

    async fn find_workspace_by_invite_code(
        &self,
        code: &InviteCode,
    ) -> RepositoryResult<Option<Workspace>> {
        let code = code.as_str().to_owned();
        self.run(move |connection| {
            workspaces::table
                .filter(workspaces::invite_code.eq(code))
                .select(WorkspaceRow::as_select())
                .first(connection)
                .optional()?
                .map(WorkspaceRow::into_domain)
                .transpose()
        })
        .await
    }

    async fn list_workspaces_for_user(&self, user_id: UserId) -> RepositoryResult<Vec<Workspace>> {
        self.run(move |connection| {
            let member_of = workspace_members::table
                .filter(workspace_members::user_id.eq(user_id.into_inner()))
                .select(workspace_members::workspace_id);
            let rows = workspaces::table
                .filter(workspaces::id.eq_any(member_of))
                .order(workspaces::created_at.desc())
                .select(WorkspaceRow::as_select())
                .load(connection)?;
            rows.into_iter().map(WorkspaceRow::into_domain).collect()
        })
        .await
    }
}

#[async_trait]
impl MembershipRepository for PostgresStore {
    async fn find_membership(
        &self,
        workspace_id: WorkspaceId,
        user_id: UserId,
    ) -> RepositoryResult<Option<Membership>> {
        self.run(move |connection| {
            workspace_members::table
                .find((workspace_id.into_inner(), user_id.into_inner()))
                .select(MembershipRow::as_select())
                .first(connection)
                .optional()?
                .map(MembershipRow::into_domain)
                .transpose()
        })
        .await
    }

    async fn add_membership(&self, membership: &Membership) -> RepositoryResult<()> {
        let row = MembershipRow::from(membership);
        self.run(move |connection| {
            diesel::insert_into(workspace_members::table)
                .values(&row)
                .execute(connection)
                .map_err(missing_parent(EntityKind::Workspace, row.workspace_id))?;
            Ok(())
        })
        .await
    }

    async fn update_membership(&self, membership: &Membership) -> RepositoryResult<()> {
        let row = MembershipRow::from(membership);
        self.run(move |connection| {
            let affected =
                diesel::update(workspace_members::table.find((row.workspace_id, row.user_id)))
                    .set(workspace_members::role.eq(&row.role))
                    .execute(connection)?;
            expect_affected(affected, EntityKind::Membership, row.user_id)
        })
        .await
    }

    async fn remove_membership(
        &self,
        workspace_id: WorkspaceId,
        user_id: UserId,
    ) -> RepositoryResult<()> {
        self.run(move |connection| {
            let affected = diesel::delete(
                workspace_members::table.find((workspace_id.into_inner(), user_id.into_inner())),
            )
            .execute(connection)?;
            expect_affected(affected, EntityKind::Membership, user_id)
        })
        .await
    }

    async fn list_memberships(
        &self,
        workspace_id: WorkspaceId,
    ) -> RepositoryResult<Vec<Membership>> {
        self.run(move |connection| {
            let rows = workspace_members::table
                .filter(workspace_members::workspace_id.eq(workspace_id.into_inner()))
                .order(workspace_members::joined_at.asc())
                .select(MembershipRow::as_select())
                .load(connection)?;
            rows.into_iter().map(MembershipRow::into_domain).collect()
        })
        .await
    }

    async fn list_memberships_for_user(
        &self,
        user_id: UserId,
    ) -> RepositoryResult<Vec<Membership>> {
        self.run(move |connection| {
            let rows = workspace_members::table
                .filter(workspace_members::user_id.eq(user_id.into_inner()))
                .order(workspace_members::joined_at.asc())
                .select(MembershipRow::as_select())
                .load(connection)?;
            rows.into_iter().map(MembershipRow::into_domain).collect()
        })
        .await
    }
}
