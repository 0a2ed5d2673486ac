//! Workspace orchestration services.

mod workspace;

pub use workspace::{CreateWorkspaceRequest, WorkspaceService};
