//! Project table access.

use super::{PostgresStore, expect_affected, missing_parent, models::ProjectRow, schema::projects};
use crate::error::{EntityKind, RepositoryResult};
use crate::ids::{ProjectId, WorkspaceId};
use crate::project::{domain::Project, ports::ProjectRepository};
use async_trait::async_trait;
use diesel::prelude::*;

#[async_trait]
impl ProjectRepository for PostgresStore {
    async fn store_project(&self, project: &Project) -> RepositoryResult<()> {
        let row = ProjectRow::from(project);
        self.run(move |connection| {
            diesel::insert_into(projects::table)
                .values(&row)
                .execute(connection)
                .map_err(missing_parent(EntityKind::Workspace, row.workspace_id))?;
            Ok(())
        })
        .await
    }

    async fn update_project(&self, project: &Project) -> RepositoryResult<()> {
        let row = ProjectRow::from(project);
        self.run(move |connection| {
            let affected = diesel::update(projects::table.find(row.id))
                .set(&row)
                .execute(connection)?;
            expect_affected(affected, EntityKind::Project, row.id)
        })
        .await
    }

    async fn delete_project(&self, id: ProjectId) -> RepositoryResult<()> {
        self.run(move |connection| {
            let affected =
                diesel::delete(projects::table.find(id.into_inner())).execute(connection)?;
            expect_affected(affected, EntityKind::Project, id)
        })
        .await
    }

    async fn find_project(&self, id: ProjectId) -> RepositoryResult<Option<Project>> {
        self.run(move |connection| {
            projects::table
                .find(id.into_inner())
                .select(ProjectRow::as_select())
                .first(connection)
                .optional()?
                .map(ProjectRow::into_domain)
                .transpose()
        })
        .await
    }

    async fn list_projects(&self, workspace_id: WorkspaceId) -> RepositoryResult<Vec<Project>> {
        self.run(move |connection| {
            let rows = projects::table
                .filter(projects::workspace_id.eq(workspace_id.into_inner()))
                .order(projects::created_at.desc())
                .select(ProjectRow::as_select())
                .load(connection)?;
            rows.into_iter().map(ProjectRow::into_domain).collect()
        })
        .await
    }
}
