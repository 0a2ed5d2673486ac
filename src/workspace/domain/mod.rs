//! Domain model for workspaces, invite codes, and memberships.

mod error;
mod role;
mod workspace;

pub use error::{ParseWorkspaceRoleError, WorkspaceDomainError};
pub use role::{Membership, WorkspaceRole};
pub use workspace::{
    ColumnTemplate, InviteCode, PersistedWorkspaceData, Workspace, WorkspaceChanges,
    WorkspaceName, WorkspaceSettings, WorkingDays,
};
