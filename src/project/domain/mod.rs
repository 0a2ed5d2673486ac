//! Domain model for projects.

mod error;
mod project;

pub use error::{ParseProjectVisibilityError, ProjectDomainError};
pub use project::{PersistedProjectData, Project, ProjectChanges, ProjectName, ProjectVisibility};
