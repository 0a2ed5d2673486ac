//! Project aggregate.

use super::{ParseProjectVisibilityError, ProjectDomainError};
use crate::ids::{ProjectId, WorkspaceId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Validated project name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectName(String);

impl ProjectName {
    /// Creates a validated project name.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectDomainError::EmptyName`] for a blank name.
    pub fn new(value: impl AsRef<str>) -> Result<Self, ProjectDomainError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ProjectDomainError::EmptyName);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Who may read a project.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectVisibility {
    /// Workspace members only.
    Private,
    /// Workspace members only.
    #[default]
    Team,
    /// Any authenticated user may read; members write.
    PublicReadonly,
}

impl ProjectVisibility {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Private => "private",
            Self::Team => "team",
            Self::PublicReadonly => "public_readonly",
        }
    }

    /// Returns whether non-members may read the project.
    #[must_use]
    pub const fn is_publicly_readable(self) -> bool {
        matches!(self, Self::PublicReadonly)
    }
}

impl TryFrom<&str> for ProjectVisibility {
    type Error = ParseProjectVisibilityError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "private" => Ok(Self::Private),
            "team" => Ok(Self::Team),
            "public_readonly" => Ok(Self::PublicReadonly),
            _ => Err(ParseProjectVisibilityError(value.to_owned())),
        }
    }
}

/// Field-wise project changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectChanges {
    /// New name.
    pub name: Option<ProjectName>,
    /// New description; `Some(None)` clears it.
    pub description: Option<Option<String>>,
    /// New visibility.
    pub visibility: Option<ProjectVisibility>,
}

/// Project aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    id: ProjectId,
    workspace_id: WorkspaceId,
    name: ProjectName,
    description: Option<String>,
    visibility: ProjectVisibility,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedProjectData {
    /// Persisted identifier.
    pub id: ProjectId,
    /// Owning workspace.
    pub workspace_id: WorkspaceId,
    /// Persisted name.
    pub name: ProjectName,
    /// Persisted description.
    pub description: Option<String>,
    /// Persisted visibility.
    pub visibility: ProjectVisibility,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Creates a project inside `workspace_id`.
    #[must_use]
    pub fn new(
        workspace_id: WorkspaceId,
        name: ProjectName,
        description: Option<String>,
        visibility: ProjectVisibility,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        Self {
            id: ProjectId::new(),
            workspace_id,
            name,
            description,
            visibility,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a project from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedProjectData) -> Self {
        Self {
            id: data.id,
            workspace_id: data.workspace_id,
            name: data.name,
            description: data.description,
            visibility: data.visibility,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Applies field-wise changes.
    pub fn apply_changes(&mut self, changes: ProjectChanges, clock: &impl Clock) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(description) = changes.description {
            self.description = description;
        }
        if let Some(visibility) = changes.visibility {
            self.visibility = visibility;
        }
        self.updated_at = clock.utc();
    }

    /// Returns the project identifier.
    #[must_use]
    pub const fn id(&self) -> ProjectId {
        self.id
    }

    /// Returns the owning workspace.
    #[must_use]
    pub const fn workspace_id(&self) -> WorkspaceId {
        self.workspace_id
    }

    /// Returns the project name.
    #[must_use]
    pub const fn name(&self) -> &ProjectName {
        &self.name
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the visibility.
    #[must_use]
    pub const fn visibility(&self) -> ProjectVisibility {
        self.visibility
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}
