//! Task aggregate root and its closed attribute sets.

use super::{
    ParseTaskPriorityError, ParseTaskStatusError, ParseTaskTypeError, TaskChanges, TaskDomainError,
    TaskMove, TrackedField,
};
use crate::ids::{ColumnId, ProjectId, TaskId, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Validated task title.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskTitle(String);

impl TaskTitle {
    const MAX_LEN: usize = 500;

    /// Creates a validated task title.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] for a blank title or
    /// [`TaskDomainError::TitleTooLong`] past 500 characters.
    pub fn new(value: impl AsRef<str>) -> Result<Self, TaskDomainError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TaskDomainError::EmptyTitle);
        }
        if trimmed.chars().count() > Self::MAX_LEN {
            return Err(TaskDomainError::TitleTooLong { max: Self::MAX_LEN });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the title.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

macro_rules! closed_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $error:ident, default = $default:ident,
        { $($(#[$vmeta:meta])* $variant:ident => $text:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $(
                $(#[$vmeta])*
                $variant,
            )+
        }

        impl $name {
            /// Returns the canonical storage representation.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }
        }

        impl TryFrom<&str> for $name {
            type Error = $error;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                let normalized = value.trim().to_ascii_lowercase();
                match normalized.as_str() {
                    $($text => Ok(Self::$variant),)+
                    _ => Err($error(value.to_owned())),
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::$default
            }
        }
    };
}

closed_enum!(
    /// Workflow status of a task.
    TaskStatus, ParseTaskStatusError, default = Todo,
    {
        /// Not started.
        Todo => "todo",
        /// Being worked on.
        InProgress => "in_progress",
        /// Finished.
        Done => "done",
    }
);

closed_enum!(
    /// Urgency of a task.
    TaskPriority, ParseTaskPriorityError, default = Medium,
    {
        /// Can wait.
        Low => "low",
        /// Normal urgency.
        Medium => "medium",
        /// Should be done soon.
        High => "high",
        /// Drop everything.
        Urgent => "urgent",
    }
);

closed_enum!(
    /// Kind of work a task represents.
    TaskType, ParseTaskTypeError, default = Task,
    {
        /// Generic piece of work.
        Task => "task",
        /// Defect report.
        Bug => "bug",
        /// New capability.
        Feature => "feature",
        /// User story.
        Story => "story",
    }
);

/// Attributes of a task being created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    /// Title.
    pub title: TaskTitle,
    /// Free-form description.
    pub description: Option<String>,
    /// Initial status.
    pub status: TaskStatus,
    /// Initial priority.
    pub priority: TaskPriority,
    /// Kind of work.
    pub task_type: TaskType,
    /// Column the task is filed in.
    pub column_id: Option<ColumnId>,
    /// Assigned workspace member.
    pub assignee_id: Option<UserId>,
    /// Due date.
    pub due_date: Option<DateTime<Utc>>,
    /// Free-form tags.
    pub tags: Vec<String>,
    /// Ordering within the column.
    pub position: i32,
}

impl NewTask {
    /// Creates attributes with defaults for everything but the title.
    #[must_use]
    pub fn new(title: TaskTitle) -> Self {
        Self {
            title,
            description: None,
            status: TaskStatus::default(),
            priority: TaskPriority::default(),
            task_type: TaskType::default(),
            column_id: None,
            assignee_id: None,
            due_date: None,
            tags: Vec::new(),
            position: 0,
        }
    }
}

/// Field-wise task changes. `None` leaves a field untouched; for nullable
/// fields `Some(None)` clears the value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    /// New title.
    pub title: Option<TaskTitle>,
    /// New description.
    pub description: Option<Option<String>>,
    /// New status.
    pub status: Option<TaskStatus>,
    /// New priority.
    pub priority: Option<TaskPriority>,
    /// New kind.
    pub task_type: Option<TaskType>,
    /// New assignee.
    pub assignee_id: Option<Option<UserId>>,
    /// New column.
    pub column_id: Option<Option<ColumnId>>,
    /// New due date.
    pub due_date: Option<Option<DateTime<Utc>>>,
    /// New tag list.
    pub tags: Option<Vec<String>>,
    /// New position.
    pub position: Option<i32>,
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    project_id: ProjectId,
    column_id: Option<ColumnId>,
    title: TaskTitle,
    description: Option<String>,
    status: TaskStatus,
    priority: TaskPriority,
    #[serde(rename = "type")]
    task_type: TaskType,
    assignee_id: Option<UserId>,
    reporter_id: UserId,
    due_date: Option<DateTime<Utc>>,
    tags: Vec<String>,
    position: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted identifier.
    pub id: TaskId,
    /// Owning project.
    pub project_id: ProjectId,
    /// Column the task is filed in.
    pub column_id: Option<ColumnId>,
    /// Persisted title.
    pub title: TaskTitle,
    /// Persisted description.
    pub description: Option<String>,
    /// Persisted status.
    pub status: TaskStatus,
    /// Persisted priority.
    pub priority: TaskPriority,
    /// Persisted kind.
    pub task_type: TaskType,
    /// Assigned user.
    pub assignee_id: Option<UserId>,
    /// Creating user.
    pub reporter_id: UserId,
    /// Persisted due date.
    pub due_date: Option<DateTime<Utc>>,
    /// Persisted tags.
    pub tags: Vec<String>,
    /// Ordering within the column.
    pub position: i32,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a task reported by `reporter_id` inside `project_id`.
    #[must_use]
    pub fn new(
        project_id: ProjectId,
        reporter_id: UserId,
        attributes: NewTask,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        Self {
            id: TaskId::new(),
            project_id,
            column_id: attributes.column_id,
            title: attributes.title,
            description: attributes.description,
            status: attributes.status,
            priority: attributes.priority,
            task_type: attributes.task_type,
            assignee_id: attributes.assignee_id,
            reporter_id,
            due_date: attributes.due_date,
            tags: attributes.tags,
            position: attributes.position,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            project_id: data.project_id,
            column_id: data.column_id,
            title: data.title,
            description: data.description,
            status: data.status,
            priority: data.priority,
            task_type: data.task_type,
            assignee_id: data.assignee_id,
            reporter_id: data.reporter_id,
            due_date: data.due_date,
            tags: data.tags,
            position: data.position,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Applies `patch` and returns the tracked fields that actually changed.
    ///
    /// Fields present in the patch but equal to the current value are not
    /// reported. `position` is applied but never tracked.
    pub fn apply_patch(&mut self, patch: TaskPatch, clock: &impl Clock) -> TaskChanges {
        let mut changes = TaskChanges::default();
        track(&mut changes, TrackedField::Title, &mut self.title, patch.title);
        track(
            &mut changes,
            TrackedField::Description,
            &mut self.description,
            patch.description,
        );
        track(&mut changes, TrackedField::Status, &mut self.status, patch.status);
        track(
            &mut changes,
            TrackedField::Priority,
            &mut self.priority,
            patch.priority,
        );
        track(&mut changes, TrackedField::Type, &mut self.task_type, patch.task_type);
        track(
            &mut changes,
            TrackedField::AssigneeId,
            &mut self.assignee_id,
            patch.assignee_id,
        );
        track(
            &mut changes,
            TrackedField::ColumnId,
            &mut self.column_id,
            patch.column_id,
        );
        track(&mut changes, TrackedField::DueDate, &mut self.due_date, patch.due_date);
        track(&mut changes, TrackedField::Tags, &mut self.tags, patch.tags);

        let repositioned = match patch.position {
            Some(position) if position != self.position => {
                self.position = position;
                true
            }
            _ => false,
        };
        if repositioned || !changes.is_empty() {
            self.updated_at = clock.utc();
        }
        changes
    }

    /// Files the task in `column_id` at `position` and returns the move record.
    pub fn move_to(&mut self, column_id: ColumnId, position: i32, clock: &impl Clock) -> TaskMove {
        let record = TaskMove {
            from_column_id: self.column_id,
            to_column_id: column_id,
            from_position: self.position,
            to_position: position,
        };
        self.column_id = Some(column_id);
        self.position = position;
        self.updated_at = clock.utc();
        record
    }

    /// Returns the creation summary logged with a `task_created` entry.
    #[must_use]
    pub fn creation_details(&self) -> Value {
        json!({ "title": self.title })
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owning project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the column the task is filed in, if any.
    #[must_use]
    pub const fn column_id(&self) -> Option<ColumnId> {
        self.column_id
    }

    /// Returns the title.
    #[must_use]
    pub const fn title(&self) -> &TaskTitle {
        &self.title
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> TaskPriority {
        self.priority
    }

    /// Returns the kind of work.
    #[must_use]
    pub const fn task_type(&self) -> TaskType {
        self.task_type
    }

    /// Returns the assignee, if any.
    #[must_use]
    pub const fn assignee_id(&self) -> Option<UserId> {
        self.assignee_id
    }

    /// Returns the creating user.
    #[must_use]
    pub const fn reporter_id(&self) -> UserId {
        self.reporter_id
    }

    /// Returns the due date, if any.
    #[must_use]
    pub const fn due_date(&self) -> Option<DateTime<Utc>> {
        self.due_date
    }

    /// Returns the tags.
    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Returns the ordering within the column.
    #[must_use]
    pub const fn position(&self) -> i32 {
        self.position
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

fn track<T>(changes: &mut TaskChanges, field: TrackedField, current: &mut T, next: Option<T>)
where
    T: PartialEq + Serialize,
{
    if let Some(next) = next.filter(|value| *value != *current) {
        changes.record(field, json!(&*current), json!(&next));
        *current = next;
    }
}
