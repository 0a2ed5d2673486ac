//! Diesel row models and their domain conversions.
//!
//! Rows are validated on the way out of the database: a value the domain
//! would reject surfaces as `RepositoryError::InvalidPersistedData`.

use super::schema::{
    activity_logs, board_columns, boards, comments, mentions, notifications, projects, reminders,
    tasks, users, workspace_members, workspaces,
};
use crate::board::domain::{
    Board, BoardColumn, BoardName, ColumnName, PersistedBoardData, PersistedColumnData,
};
use crate::comment::domain::{Comment, CommentBody, PersistedCommentData};
use crate::error::{RepositoryError, RepositoryResult};
use crate::identity::domain::{Handle, PersistedUserData, User};
use crate::ids::{
    ActivityId, BoardId, ColumnId, CommentId, MentionId, NotificationId, ProjectId, ReminderId,
    TaskId, UserId, WorkspaceId,
};
use crate::mention::domain::{Mention, MentionContext, MentionTarget};
use crate::notification::domain::{Notification, NotificationType};
use crate::project::domain::{PersistedProjectData, Project, ProjectName, ProjectVisibility};
use crate::reminder::domain::{PersistedReminderData, Reminder, ReminderStatus};
use crate::task::domain::{
    ActivityAction, ActivityEntry, PersistedTaskData, Task, TaskPriority, TaskStatus, TaskTitle,
    TaskType,
};
use crate::workspace::domain::{
    ColumnTemplate, InviteCode, Membership, PersistedWorkspaceData, Workspace, WorkspaceName,
    WorkspaceRole, WorkspaceSettings, WorkingDays,
};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;
use uuid::Uuid;

fn invalid(err: impl std::error::Error + Send + Sync + 'static) -> RepositoryError {
    RepositoryError::invalid_persisted_data(err)
}

/// User row.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub struct UserRow {
    pub id: Uuid,
    pub external_id: i64,
    pub handle: Option<String>,
    pub first_name: String,
    pub last_name: Option<String>,
    pub avatar_url: Option<String>,
    pub language_code: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserRow {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().into_inner(),
            external_id: user.external_id(),
            handle: user.handle().map(|handle| handle.as_str().to_owned()),
            first_name: user.first_name().to_owned(),
            last_name: user.last_name().map(ToOwned::to_owned),
            avatar_url: user.avatar_url().map(ToOwned::to_owned),
            language_code: user.language_code().map(ToOwned::to_owned),
            created_at: user.created_at(),
            updated_at: user.updated_at(),
        }
    }
}

impl UserRow {
    /// Converts the row into a domain user.
    pub fn into_domain(self) -> RepositoryResult<User> {
        let handle = self.handle.map(Handle::new).transpose().map_err(invalid)?;
        Ok(User::from_persisted(PersistedUserData {
            id: UserId::from_uuid(self.id),
            external_id: self.external_id,
            handle,
            first_name: self.first_name,
            last_name: self.last_name,
            avatar_url: self.avatar_url,
            language_code: self.language_code,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }))
    }
}

/// Workspace row with flattened settings.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = workspaces)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub struct WorkspaceRow {
    pub id: Uuid,
    pub name: String,
    pub owner_id: Uuid,
    pub invite_code: String,
    pub description: Option<String>,
    pub default_columns: Vec<String>,
    pub working_days: Vec<i16>,
    pub default_reminder_offset_minutes: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Workspace> for WorkspaceRow {
    fn from(workspace: &Workspace) -> Self {
        let settings = workspace.settings();
        Self {
            id: workspace.id().into_inner(),
            name: workspace.name().as_str().to_owned(),
            owner_id: workspace.owner_id().into_inner(),
            invite_code: workspace.invite_code().as_str().to_owned(),
            description: settings.description.clone(),
            default_columns: settings.default_columns.names().to_vec(),
            working_days: settings.working_days.days().to_vec(),
            default_reminder_offset_minutes: settings.default_reminder_offset_minutes,
            created_at: workspace.created_at(),
            updated_at: workspace.updated_at(),
        }
    }
}

impl WorkspaceRow {
    /// Converts the row into a domain workspace.
    pub fn into_domain(self) -> RepositoryResult<Workspace> {
        let settings = WorkspaceSettings {
            description: self.description,
            default_columns: ColumnTemplate::new(self.default_columns).map_err(invalid)?,
            working_days: WorkingDays::new(self.working_days).map_err(invalid)?,
            default_reminder_offset_minutes: self.default_reminder_offset_minutes,
        };
        Ok(Workspace::from_persisted(PersistedWorkspaceData {
            id: WorkspaceId::from_uuid(self.id),
            name: WorkspaceName::new(&self.name).map_err(invalid)?,
            owner_id: UserId::from_uuid(self.owner_id),
            invite_code: InviteCode::parse(&self.invite_code).map_err(invalid)?,
            settings,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }))
    }
}

/// Membership row.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = workspace_members)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MembershipRow {
    pub workspace_id: Uuid,
    pub user_id: Uuid,
    pub role: String,
    pub joined_at: DateTime<Utc>,
}

impl From<&Membership> for MembershipRow {
    fn from(membership: &Membership) -> Self {
        Self {
            workspace_id: membership.workspace_id().into_inner(),
            user_id: membership.user_id().into_inner(),
            role: membership.role().as_str().to_owned(),
            joined_at: membership.joined_at(),
        }
    }
}

impl MembershipRow {
    /// Converts the row into a domain membership.
    pub fn into_domain(self) -> RepositoryResult<Membership> {
        let role = WorkspaceRole::try_from(self.role.as_str()).map_err(invalid)?;
        Ok(Membership::from_persisted(
            WorkspaceId::from_uuid(self.workspace_id),
            UserId::from_uuid(self.user_id),
            role,
            self.joined_at,
        ))
    }
}

/// Project row.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = projects)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub struct ProjectRow {
    pub id: Uuid,
    pub workspace_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub visibility: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Project> for ProjectRow {
    fn from(project: &Project) -> Self {
        Self {
            id: project.id().into_inner(),
            workspace_id: project.workspace_id().into_inner(),
            name: project.name().as_str().to_owned(),
            description: project.description().map(ToOwned::to_owned),
            visibility: project.visibility().as_str().to_owned(),
            created_at: project.created_at(),
            updated_at: project.updated_at(),
        }
    }
}

impl ProjectRow {
    /// Converts the row into a domain project.
    pub fn into_domain(self) -> RepositoryResult<Project> {
        Ok(Project::from_persisted(PersistedProjectData {
            id: ProjectId::from_uuid(self.id),
            workspace_id: WorkspaceId::from_uuid(self.workspace_id),
            name: ProjectName::new(&self.name).map_err(invalid)?,
            description: self.description,
            visibility: ProjectVisibility::try_from(self.visibility.as_str()).map_err(invalid)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }))
    }
}

/// Board row.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = boards)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct BoardRow {
    pub id: Uuid,
    pub project_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Board> for BoardRow {
    fn from(board: &Board) -> Self {
        Self {
            id: board.id().into_inner(),
            project_id: board.project_id().into_inner(),
            name: board.name().as_str().to_owned(),
            created_at: board.created_at(),
            updated_at: board.updated_at(),
        }
    }
}

impl BoardRow {
    /// Converts the row into a domain board.
    pub fn into_domain(self) -> RepositoryResult<Board> {
        Ok(Board::from_persisted(PersistedBoardData {
            id: BoardId::from_uuid(self.id),
            project_id: ProjectId::from_uuid(self.project_id),
            name: BoardName::new(&self.name).map_err(invalid)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }))
    }
}

/// Column row.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = board_columns)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ColumnRow {
    pub id: Uuid,
    pub board_id: Uuid,
    pub name: String,
    pub position: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&BoardColumn> for ColumnRow {
    fn from(column: &BoardColumn) -> Self {
        Self {
            id: column.id().into_inner(),
            board_id: column.board_id().into_inner(),
            name: column.name().as_str().to_owned(),
            position: column.position(),
            created_at: column.created_at(),
            updated_at: column.updated_at(),
        }
    }
}

impl ColumnRow {
    /// Converts the row into a domain column.
    pub fn into_domain(self) -> RepositoryResult<BoardColumn> {
        Ok(BoardColumn::from_persisted(PersistedColumnData {
            id: ColumnId::from_uuid(self.id),
            board_id: BoardId::from_uuid(self.board_id),
            name: ColumnName::new(&self.name).map_err(invalid)?,
            position: self.position,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }))
    }
}

/// Task row.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub struct TaskRow {
    pub id: Uuid,
    pub project_id: Uuid,
    pub column_id: Option<Uuid>,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub priority: String,
    pub task_type: String,
    pub assignee_id: Option<Uuid>,
    pub reporter_id: Uuid,
    pub due_date: Option<DateTime<Utc>>,
    pub tags: Vec<String>,
    pub position: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Task> for TaskRow {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id().into_inner(),
            project_id: task.project_id().into_inner(),
            column_id: task.column_id().map(ColumnId::into_inner),
            title: task.title().as_str().to_owned(),
            description: task.description().map(ToOwned::to_owned),
            status: task.status().as_str().to_owned(),
            priority: task.priority().as_str().to_owned(),
            task_type: task.task_type().as_str().to_owned(),
            assignee_id: task.assignee_id().map(UserId::into_inner),
            reporter_id: task.reporter_id().into_inner(),
            due_date: task.due_date(),
            tags: task.tags().to_vec(),
            position: task.position(),
            created_at: task.created_at(),
            updated_at: task.updated_at(),
        }
    }
}

impl TaskRow {
    /// Converts the row into a domain task.
    pub fn into_domain(self) -> RepositoryResult<Task> {
        Ok(Task::from_persisted(PersistedTaskData {
            id: TaskId::from_uuid(self.id),
            project_id: ProjectId::from_uuid(self.project_id),
            column_id: self.column_id.map(ColumnId::from_uuid),
            title: TaskTitle::new(&self.title).map_err(invalid)?,
            description: self.description,
            status: TaskStatus::try_from(self.status.as_str()).map_err(invalid)?,
            priority: TaskPriority::try_from(self.priority.as_str()).map_err(invalid)?,
            task_type: TaskType::try_from(self.task_type.as_str()).map_err(invalid)?,
            assignee_id: self.assignee_id.map(UserId::from_uuid),
            reporter_id: UserId::from_uuid(self.reporter_id),
            due_date: self.due_date,
            tags: self.tags,
            position: self.position,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }))
    }
}

/// Activity log row.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = activity_logs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ActivityRow {
    pub id: Uuid,
    pub task_id: Uuid,
    pub user_id: Uuid,
    pub action: String,
    pub details: Value,
    pub created_at: DateTime<Utc>,
}

impl From<&ActivityEntry> for ActivityRow {
    fn from(entry: &ActivityEntry) -> Self {
        Self {
            id: entry.id().into_inner(),
            task_id: entry.task_id().into_inner(),
            user_id: entry.user_id().into_inner(),
            action: entry.action().as_str().to_owned(),
            details: entry.details().clone(),
            created_at: entry.created_at(),
        }
    }
}

impl ActivityRow {
    /// Converts the row into a domain activity entry.
    pub fn into_domain(self) -> RepositoryResult<ActivityEntry> {
        let action = ActivityAction::try_from(self.action.as_str()).map_err(invalid)?;
        Ok(ActivityEntry::from_persisted(
            ActivityId::from_uuid(self.id),
            TaskId::from_uuid(self.task_id),
            UserId::from_uuid(self.user_id),
            action,
            self.details,
            self.created_at,
        ))
    }
}

/// Comment row.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = comments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub struct CommentRow {
    pub id: Uuid,
    pub task_id: Uuid,
    pub author_id: Uuid,
    pub parent_id: Option<Uuid>,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Comment> for CommentRow {
    fn from(comment: &Comment) -> Self {
        Self {
            id: comment.id().into_inner(),
            task_id: comment.task_id().into_inner(),
            author_id: comment.author_id().into_inner(),
            parent_id: comment.parent_id().map(CommentId::into_inner),
            body: comment.body().as_str().to_owned(),
            created_at: comment.created_at(),
            updated_at: comment.updated_at(),
        }
    }
}

impl CommentRow {
    /// Converts the row into a domain comment.
    pub fn into_domain(self) -> RepositoryResult<Comment> {
        Ok(Comment::from_persisted(PersistedCommentData {
            id: CommentId::from_uuid(self.id),
            task_id: TaskId::from_uuid(self.task_id),
            author_id: UserId::from_uuid(self.author_id),
            parent_id: self.parent_id.map(CommentId::from_uuid),
            body: CommentBody::new(self.body).map_err(invalid)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }))
    }
}

/// Mention row.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = mentions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MentionRow {
    pub id: Uuid,
    pub context: String,
    pub task_id: Option<Uuid>,
    pub comment_id: Option<Uuid>,
    pub mentioned_user_id: Uuid,
    pub notified: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&Mention> for MentionRow {
    fn from(mention: &Mention) -> Self {
        let target = mention.target();
        Self {
            id: mention.id().into_inner(),
            context: target.context().as_str().to_owned(),
            task_id: target.task_id().map(TaskId::into_inner),
            comment_id: target.comment_id().map(CommentId::into_inner),
            mentioned_user_id: mention.mentioned_user_id().into_inner(),
            notified: mention.notified(),
            created_at: mention.created_at(),
        }
    }
}

impl MentionRow {
    /// Converts the row into a domain mention.
    pub fn into_domain(self) -> RepositoryResult<Mention> {
        let context = MentionContext::try_from(self.context.as_str()).map_err(invalid)?;
        let target = match (context, self.task_id, self.comment_id) {
            (MentionContext::Task, Some(task_id), None) => {
                MentionTarget::Task(TaskId::from_uuid(task_id))
            }
            (MentionContext::Comment, None, Some(comment_id)) => {
                MentionTarget::Comment(CommentId::from_uuid(comment_id))
            }
            _ => {
                return Err(invalid(std::io::Error::other(format!(
                    "mention {} has targets inconsistent with context {}",
                    self.id,
                    context.as_str()
                ))));
            }
        };
        Ok(Mention::from_persisted(
            MentionId::from_uuid(self.id),
            target,
            UserId::from_uuid(self.mentioned_user_id),
            self.notified,
            self.created_at,
        ))
    }
}

/// Notification row.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = notifications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NotificationRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub task_id: Option<Uuid>,
    pub notification_type: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&Notification> for NotificationRow {
    fn from(notification: &Notification) -> Self {
        Self {
            id: notification.id().into_inner(),
            user_id: notification.user_id().into_inner(),
            task_id: notification.task_id().map(TaskId::into_inner),
            notification_type: notification.notification_type().as_str().to_owned(),
            message: notification.message().to_owned(),
            is_read: notification.is_read(),
            created_at: notification.created_at(),
        }
    }
}

impl NotificationRow {
    /// Converts the row into a domain notification.
    pub fn into_domain(self) -> RepositoryResult<Notification> {
        let notification_type =
            NotificationType::try_from(self.notification_type.as_str()).map_err(invalid)?;
        Ok(Notification::from_persisted(
            NotificationId::from_uuid(self.id),
            UserId::from_uuid(self.user_id),
            self.task_id.map(TaskId::from_uuid),
            notification_type,
            self.message,
            self.is_read,
            self.created_at,
        ))
    }
}

/// Reminder row.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = reminders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ReminderRow {
    pub id: Uuid,
    pub task_id: Uuid,
    pub user_id: Uuid,
    pub remind_at: DateTime<Utc>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Reminder> for ReminderRow {
    fn from(reminder: &Reminder) -> Self {
        Self {
            id: reminder.id().into_inner(),
            task_id: reminder.task_id().into_inner(),
            user_id: reminder.user_id().into_inner(),
            remind_at: reminder.remind_at(),
            status: reminder.status().as_str().to_owned(),
            created_at: reminder.created_at(),
            updated_at: reminder.updated_at(),
        }
    }
}

impl ReminderRow {
    /// Converts the row into a domain reminder.
    pub fn into_domain(self) -> RepositoryResult<Reminder> {
        Ok(Reminder::from_persisted(PersistedReminderData {
            id: ReminderId::from_uuid(self.id),
            task_id: TaskId::from_uuid(self.task_id),
            user_id: UserId::from_uuid(self.user_id),
            remind_at: self.remind_at,
            status: ReminderStatus::try_from(self.status.as_str()).map_err(invalid)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }))
    }
}
