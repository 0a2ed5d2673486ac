//! Repository port for projects.

use crate::error::RepositoryResult;
use crate::ids::{ProjectId, WorkspaceId};
use crate::project::domain::Project;
use async_trait::async_trait;

/// Project persistence contract.
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Stores a new project.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::RepositoryError::NotFound`] when the workspace
    /// no longer exists.
    async fn store_project(&self, project: &Project) -> RepositoryResult<()>;

    /// Persists changes to an existing project.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::RepositoryError::NotFound`] when the project
    /// does not exist.
    async fn update_project(&self, project: &Project) -> RepositoryResult<()>;

    /// Deletes a project with its boards, columns and tasks.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::RepositoryError::NotFound`] when the project
    /// does not exist.
    async fn delete_project(&self, id: ProjectId) -> RepositoryResult<()>;

    /// Finds a project by identifier.
    async fn find_project(&self, id: ProjectId) -> RepositoryResult<Option<Project>>;

    /// Lists the projects of a workspace, newest first.
    async fn list_projects(&self, workspace_id: WorkspaceId) -> RepositoryResult<Vec<Project>>;
}
