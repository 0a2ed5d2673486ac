//! Task listing filters.

use super::{TaskDomainError, TaskPriority, TaskStatus, TaskType};
use crate::ids::{ProjectId, UserId};
use chrono::{DateTime, Utc};

/// Optional equality filters applied when listing a project's tasks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// Only tasks assigned to this user.
    pub assignee_id: Option<UserId>,
    /// Only tasks with this status.
    pub status: Option<TaskStatus>,
    /// Only tasks with this priority.
    pub priority: Option<TaskPriority>,
    /// Only tasks of this kind.
    pub task_type: Option<TaskType>,
}

/// Inclusive due-date window for calendar views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DueWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    project_id: Option<ProjectId>,
}

impl DueWindow {
    /// Creates a window covering `[start, end]`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvertedRange`] when `end < start`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, TaskDomainError> {
        if end < start {
            return Err(TaskDomainError::InvertedRange);
        }
        Ok(Self {
            start,
            end,
            project_id: None,
        })
    }

    /// Restricts the window to one project.
    #[must_use]
    pub const fn in_project(mut self, project_id: ProjectId) -> Self {
        self.project_id = Some(project_id);
        self
    }

    /// Returns the window start.
    #[must_use]
    pub const fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Returns the window end.
    #[must_use]
    pub const fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Returns the project restriction, if any.
    #[must_use]
    pub const fn project_id(&self) -> Option<ProjectId> {
        self.project_id
    }

    /// Returns whether `due` falls inside the window.
    #[must_use]
    pub fn contains(&self, due: DateTime<Utc>) -> bool {
        self.start <= due && due <= self.end
    }
}
