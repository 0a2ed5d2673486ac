//! In-memory project table.

use super::{InMemoryStore, replace};
use crate::error::{EntityKind, RepositoryError, RepositoryResult, UniqueConstraint};
use crate::ids::{ProjectId, WorkspaceId};
use crate::project::{domain::Project, ports::ProjectRepository};
use async_trait::async_trait;

#[async_trait]
impl ProjectRepository for InMemoryStore {
    async fn store_project(&self, project: &Project) -> RepositoryResult<()> {
        let mut state = self.write()?;
        if !state.has_workspace(project.workspace_id()) {
            return Err(RepositoryError::not_found(
                EntityKind::Workspace,
                project.workspace_id(),
            ));
        }
        if state.has_project(project.id()) {
            return Err(RepositoryError::Duplicate(UniqueConstraint::PrimaryKey));
        }
        state.projects.push(project.clone());
        Ok(())
    }

    async fn update_project(&self, project: &Project) -> RepositoryResult<()> {
        let mut state = self.write()?;
        if !replace(&mut state.projects, project, |other| other.id() == project.id()) {
            return Err(RepositoryError::not_found(EntityKind::Project, project.id()));
        }
        Ok(())
    }

    async fn delete_project(&self, id: ProjectId) -> RepositoryResult<()> {
        let mut state = self.write()?;
        if !state.has_project(id) {
            return Err(RepositoryError::not_found(EntityKind::Project, id));
        }
        state.remove_project(id);
        Ok(())
    }

    async fn find_project(&self, id: ProjectId) -> RepositoryResult<Option<Project>> {
        let state = self.read()?;
        Ok(state.projects.iter().find(|project| project.id() == id).cloned())
    }

    async fn list_projects(&self, workspace_id: WorkspaceId) -> RepositoryResult<Vec<Project>> {
        let state = self.read()?;
        let mut projects: Vec<Project> = state
            .projects
            .iter()
            .rev()
            .filter(|project| project.workspace_id() == workspace_id)
            .cloned()
            .collect();
        projects.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(projects)
    }
}
