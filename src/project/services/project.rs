//! Project lifecycle coordinator.

use crate::access::{AccessGuard, OwnershipStore, Resource, WRITE_ROLES};
use crate::error::{EntityKind, TrackerError, TrackerResult};
use crate::ids::{ProjectId, UserId, WorkspaceId};
use crate::project::domain::{Project, ProjectChanges, ProjectName, ProjectVisibility};
use mockable::Clock;
use std::sync::Arc;
use tracing::info;

/// Request payload for creating a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateProjectRequest {
    /// Project name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Visibility; defaults to `TEAM`.
    pub visibility: Option<ProjectVisibility>,
}

impl CreateProjectRequest {
    /// Creates a request with the required name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            visibility: None,
        }
    }

    /// Sets the visibility.
    #[must_use]
    pub const fn with_visibility(mut self, visibility: ProjectVisibility) -> Self {
        self.visibility = Some(visibility);
        self
    }
}

/// Project coordinator.
#[derive(Clone)]
pub struct ProjectService<S, C>
where
    S: OwnershipStore,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    guard: AccessGuard<S>,
    clock: Arc<C>,
}

impl<S, C> ProjectService<S, C>
where
    S: OwnershipStore,
    C: Clock + Send + Sync,
{
    /// Creates a new project service.
    #[must_use]
    pub fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        let guard = AccessGuard::new(Arc::clone(&store));
        Self {
            store,
            guard,
            clock,
        }
    }

    /// Creates a project in `workspace_id`.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::NotFound`], [`TrackerError::Forbidden`] or
    /// [`TrackerError::BadRequest`] for a blank name.
    pub async fn create(
        &self,
        user_id: UserId,
        workspace_id: WorkspaceId,
        request: CreateProjectRequest,
    ) -> TrackerResult<Project> {
        self.guard
            .authorize_write(user_id, Resource::Workspace(workspace_id))
            .await?;
        let name = ProjectName::new(&request.name).map_err(TrackerError::bad_request)?;
        let project = Project::new(
            workspace_id,
            name,
            request.description,
            request.visibility.unwrap_or_default(),
            &*self.clock,
        );
        self.store.store_project(&project).await?;
        info!(project_id = %project.id(), %workspace_id, "created project");
        Ok(project)
    }

    /// Lists the projects of a workspace the user belongs to.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::NotFound`] or [`TrackerError::Forbidden`].
    pub async fn list(
        &self,
        user_id: UserId,
        workspace_id: WorkspaceId,
    ) -> TrackerResult<Vec<Project>> {
        self.guard
            .authorize_member(user_id, Resource::Workspace(workspace_id))
            .await?;
        Ok(self.store.list_projects(workspace_id).await?)
    }

    /// Returns a readable project.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::NotFound`] or [`TrackerError::Forbidden`].
    pub async fn get(&self, user_id: UserId, project_id: ProjectId) -> TrackerResult<Project> {
        self.guard
            .authorize_read(user_id, Resource::Project(project_id))
            .await?;
        self.load(project_id).await
    }

    /// Applies field-wise changes.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::NotFound`] or [`TrackerError::Forbidden`].
    pub async fn update(
        &self,
        user_id: UserId,
        project_id: ProjectId,
        changes: ProjectChanges,
    ) -> TrackerResult<Project> {
        let mut project = self.load(project_id).await?;
        self.guard
            .require_role(project.workspace_id(), user_id, WRITE_ROLES)
            .await?;
        project.apply_changes(changes, &*self.clock);
        self.store.update_project(&project).await?;
        info!(%project_id, %user_id, "updated project");
        Ok(project)
    }

    /// Deletes a project with its boards, tasks and their children.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::NotFound`] or [`TrackerError::Forbidden`].
    pub async fn delete(&self, user_id: UserId, project_id: ProjectId) -> TrackerResult<()> {
        let project = self.load(project_id).await?;
        self.guard
            .require_role(project.workspace_id(), user_id, WRITE_ROLES)
            .await?;
        self.store.delete_project(project_id).await?;
        info!(%project_id, %user_id, "deleted project");
        Ok(())
    }

    async fn load(&self, project_id: ProjectId) -> TrackerResult<Project> {
        self.store
            .find_project(project_id)
            .await?
            .ok_or_else(|| TrackerError::not_found(EntityKind::Project, project_id))
    }
}
