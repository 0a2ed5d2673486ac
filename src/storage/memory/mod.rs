//! In-memory store for tests and local runs.
//!
//! All tables sit behind one `RwLock`, so every port method, including the
//! multi-row writes (task plus activity entry, workspace plus owner
//! membership), is atomic. Foreign keys, cascades and unique indexes mirror
//! the Postgres schema.

mod board;
mod comment;
mod identity;
mod mention;
mod notification;
mod project;
mod reminder;
mod task;
mod workspace;

use crate::board::domain::{Board, BoardColumn};
use crate::comment::domain::Comment;
use crate::error::{RepositoryError, RepositoryResult};
use crate::identity::domain::User;
use crate::ids::{BoardId, ColumnId, CommentId, ProjectId, TaskId, UserId, WorkspaceId};
use crate::mention::domain::{Mention, MentionTarget};
use crate::notification::domain::Notification;
use crate::project::domain::Project;
use crate::reminder::domain::Reminder;
use crate::task::domain::{ActivityEntry, PersistedTaskData, Task};
use crate::workspace::domain::{Membership, Workspace};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Thread-safe in-memory implementation of every repository port.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<State>>,
}

/// Tables are kept in insertion order so equal timestamps sort stably.
#[derive(Debug, Default)]
struct State {
    users: Vec<User>,
    workspaces: Vec<Workspace>,
    memberships: Vec<Membership>,
    projects: Vec<Project>,
    boards: Vec<Board>,
    columns: Vec<BoardColumn>,
    tasks: Vec<Task>,
    activity: Vec<ActivityEntry>,
    comments: Vec<Comment>,
    mentions: Vec<Mention>,
    notifications: Vec<Notification>,
    reminders: Vec<Reminder>,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RepositoryResult<RwLockReadGuard<'_, State>> {
        self.state
            .read()
            .map_err(|err| RepositoryError::persistence(std::io::Error::other(err.to_string())))
    }

    fn write(&self) -> RepositoryResult<RwLockWriteGuard<'_, State>> {
        self.state
            .write()
            .map_err(|err| RepositoryError::persistence(std::io::Error::other(err.to_string())))
    }
}

/// Replaces the row matching `matches`, returning whether one existed.
fn replace<T: Clone>(rows: &mut [T], row: &T, matches: impl Fn(&T) -> bool) -> bool {
    let Some(slot) = rows.iter_mut().find(|existing| matches(existing)) else {
        return false;
    };
    *slot = row.clone();
    true
}

impl State {
    fn is_member(&self, workspace_id: WorkspaceId, user_id: UserId) -> bool {
        self.memberships
            .iter()
            .any(|m| m.workspace_id() == workspace_id && m.user_id() == user_id)
    }

    fn project_workspace(&self, project_id: ProjectId) -> Option<WorkspaceId> {
        self.projects
            .iter()
            .find(|project| project.id() == project_id)
            .map(Project::workspace_id)
    }

    /// Returns whether `user_id` belongs to the workspace owning `task`.
    fn can_see_task(&self, user_id: UserId, task: &Task) -> bool {
        self.project_workspace(task.project_id())
            .is_some_and(|workspace_id| self.is_member(workspace_id, user_id))
    }

    fn has_workspace(&self, id: WorkspaceId) -> bool {
        self.workspaces.iter().any(|workspace| workspace.id() == id)
    }

    fn has_project(&self, id: ProjectId) -> bool {
        self.projects.iter().any(|project| project.id() == id)
    }

    fn has_board(&self, id: BoardId) -> bool {
        self.boards.iter().any(|board| board.id() == id)
    }

    fn has_task(&self, id: TaskId) -> bool {
        self.tasks.iter().any(|task| task.id() == id)
    }

    fn has_comment(&self, id: CommentId) -> bool {
        self.comments.iter().any(|comment| comment.id() == id)
    }

    fn remove_workspace(&mut self, id: WorkspaceId) {
        let projects: Vec<ProjectId> = self
            .projects
            .iter()
            .filter(|project| project.workspace_id() == id)
            .map(Project::id)
            .collect();
        for project_id in projects {
            self.remove_project(project_id);
        }
        self.memberships.retain(|m| m.workspace_id() != id);
        self.workspaces.retain(|workspace| workspace.id() != id);
    }

    fn remove_project(&mut self, id: ProjectId) {
        let boards: Vec<BoardId> = self
            .boards
            .iter()
            .filter(|board| board.project_id() == id)
            .map(Board::id)
            .collect();
        for board_id in boards {
            self.remove_board(board_id);
        }
        let tasks: Vec<TaskId> = self
            .tasks
            .iter()
            .filter(|task| task.project_id() == id)
            .map(Task::id)
            .collect();
        for task_id in tasks {
            self.remove_task(task_id);
        }
        self.projects.retain(|project| project.id() != id);
    }

    fn remove_board(&mut self, id: BoardId) {
        let columns: Vec<ColumnId> = self
            .columns
            .iter()
            .filter(|column| column.board_id() == id)
            .map(BoardColumn::id)
            .collect();
        for column_id in columns {
            self.remove_column(column_id);
        }
        self.boards.retain(|board| board.id() != id);
    }

    fn remove_column(&mut self, id: ColumnId) {
        for task in &mut self.tasks {
            if task.column_id() == Some(id) {
                *task = unfiled(task);
            }
        }
        self.columns.retain(|column| column.id() != id);
    }

    fn remove_task(&mut self, id: TaskId) {
        let comments: Vec<CommentId> = self
            .comments
            .iter()
            .filter(|comment| comment.task_id() == id)
            .map(Comment::id)
            .collect();
        for comment_id in comments {
            self.remove_comment(comment_id);
        }
        self.mentions
            .retain(|mention| mention.target() != MentionTarget::Task(id));
        self.notifications
            .retain(|notification| notification.task_id() != Some(id));
        self.reminders.retain(|reminder| reminder.task_id() != id);
        self.activity.retain(|entry| entry.task_id() != id);
        self.tasks.retain(|task| task.id() != id);
    }

    fn remove_comment(&mut self, id: CommentId) {
        self.mentions
            .retain(|mention| mention.target() != MentionTarget::Comment(id));
        for comment in &mut self.comments {
            if comment.parent_id() == Some(id) {
                *comment = comment::orphaned(comment);
            }
        }
        self.comments.retain(|comment| comment.id() != id);
    }
}

/// Returns a copy of `task` with its column cleared, as `ON DELETE SET NULL`
/// would leave it.
fn unfiled(task: &Task) -> Task {
    Task::from_persisted(PersistedTaskData {
        id: task.id(),
        project_id: task.project_id(),
        column_id: None,
        title: task.title().clone(),
        description: task.description().map(ToOwned::to_owned),
        status: task.status(),
        priority: task.priority(),
        task_type: task.task_type(),
        assignee_id: task.assignee_id(),
        reporter_id: task.reporter_id(),
        due_date: task.due_date(),
        tags: task.tags().to_vec(),
        position: task.position(),
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    })
}
