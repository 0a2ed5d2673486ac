//! Workspace roles and memberships.

use super::ParseWorkspaceRoleError;
use crate::ids::{UserId, WorkspaceId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Workspace-scoped permission level, strongest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkspaceRole {
    /// Creator of the workspace.
    Owner,
    /// Manages settings and members.
    Admin,
    /// Reads and writes workspace content.
    Member,
    /// Reads workspace content only.
    Viewer,
}

impl WorkspaceRole {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Admin => "admin",
            Self::Member => "member",
            Self::Viewer => "viewer",
        }
    }
}

impl TryFrom<&str> for WorkspaceRole {
    type Error = ParseWorkspaceRoleError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "owner" => Ok(Self::Owner),
            "admin" => Ok(Self::Admin),
            "member" => Ok(Self::Member),
            "viewer" => Ok(Self::Viewer),
            _ => Err(ParseWorkspaceRoleError(value.to_owned())),
        }
    }
}

/// A `(workspace, user, role)` fact granting access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    workspace_id: WorkspaceId,
    user_id: UserId,
    role: WorkspaceRole,
    joined_at: DateTime<Utc>,
}

impl Membership {
    /// Creates a membership starting now.
    #[must_use]
    pub fn new(
        workspace_id: WorkspaceId,
        user_id: UserId,
        role: WorkspaceRole,
        clock: &impl Clock,
    ) -> Self {
        Self {
            workspace_id,
            user_id,
            role,
            joined_at: clock.utc(),
        }
    }

    /// Reconstructs a membership from persisted storage.
    #[must_use]
    pub const fn from_persisted(
        workspace_id: WorkspaceId,
        user_id: UserId,
        role: WorkspaceRole,
        joined_at: DateTime<Utc>,
    ) -> Self {
        Self {
            workspace_id,
            user_id,
            role,
            joined_at,
        }
    }

    /// Returns the workspace.
    #[must_use]
    pub const fn workspace_id(&self) -> WorkspaceId {
        self.workspace_id
    }

    /// Returns the member.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the granted role.
    #[must_use]
    pub const fn role(&self) -> WorkspaceRole {
        self.role
    }

    /// Returns when the membership was created.
    #[must_use]
    pub const fn joined_at(&self) -> DateTime<Utc> {
        self.joined_at
    }

    /// Changes the granted role.
    pub const fn set_role(&mut self, role: WorkspaceRole) {
        self.role = role;
    }
}
