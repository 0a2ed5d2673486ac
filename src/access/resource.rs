//! Guarded resources and the scope they resolve to.

use crate::error::EntityKind;
use crate::ids::{BoardId, ColumnId, CommentId, ProjectId, ReminderId, TaskId, WorkspaceId};
use crate::project::domain::ProjectVisibility;
use std::fmt;

/// A resource whose access is decided by its owning workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    /// A workspace itself.
    Workspace(WorkspaceId),
    /// A project.
    Project(ProjectId),
    /// A board.
    Board(BoardId),
    /// A board column.
    Column(ColumnId),
    /// A task.
    Task(TaskId),
    /// A comment.
    Comment(CommentId),
    /// A reminder.
    Reminder(ReminderId),
}

impl Resource {
    /// Returns the entity family of the resource.
    #[must_use]
    pub const fn kind(self) -> EntityKind {
        match self {
            Self::Workspace(_) => EntityKind::Workspace,
            Self::Project(_) => EntityKind::Project,
            Self::Board(_) => EntityKind::Board,
            Self::Column(_) => EntityKind::Column,
            Self::Task(_) => EntityKind::Task,
            Self::Comment(_) => EntityKind::Comment,
            Self::Reminder(_) => EntityKind::Reminder,
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Workspace(id) => write!(f, "workspace {id}"),
            Self::Project(id) => write!(f, "project {id}"),
            Self::Board(id) => write!(f, "board {id}"),
            Self::Column(id) => write!(f, "column {id}"),
            Self::Task(id) => write!(f, "task {id}"),
            Self::Comment(id) => write!(f, "comment {id}"),
            Self::Reminder(id) => write!(f, "reminder {id}"),
        }
    }
}

/// Where a resource sits in the ownership tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessScope {
    /// Owning workspace.
    pub workspace_id: WorkspaceId,
    /// Owning project, for resources below the workspace level.
    pub project_id: Option<ProjectId>,
    /// Visibility of the owning project.
    pub visibility: Option<ProjectVisibility>,
}

impl AccessScope {
    /// Returns whether non-members may read resources in this scope.
    #[must_use]
    pub fn is_publicly_readable(&self) -> bool {
        self.visibility
            .is_some_and(ProjectVisibility::is_publicly_readable)
    }
}
