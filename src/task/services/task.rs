//! Task mutation coordinator and activity feed.

use crate::access::{AccessGuard, OwnershipStore, Resource};
use crate::error::{EntityKind, TrackerError, TrackerResult};
use crate::hooks::{CommitEvent, HookChain};
use crate::identity::ports::UserRepository;
use crate::ids::{ColumnId, ProjectId, TaskId, UserId, WorkspaceId};
use crate::task::domain::{
    ActivityAction, ActivityEntry, NewTask, Task, TaskDomainError, TaskFilter, TaskPatch,
};
use mockable::Clock;
use std::sync::Arc;
use tracing::{debug, info};

/// Target of a task move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveTaskRequest {
    /// Destination column; must belong to the task's project.
    pub column_id: ColumnId,
    /// Position within the destination column.
    pub position: i32,
}

/// Task coordinator.
///
/// Every write is authorized against the owning workspace, validated
/// against the cross-entity rules, committed together with its activity
/// entry, and then handed to the post-commit hooks.
#[derive(Clone)]
pub struct TaskService<S, C>
where
    S: OwnershipStore + UserRepository,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    guard: AccessGuard<S>,
    clock: Arc<C>,
    hooks: HookChain,
}

impl<S, C> TaskService<S, C>
where
    S: OwnershipStore + UserRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new task service dispatching to `hooks`.
    #[must_use]
    pub fn new(store: Arc<S>, clock: Arc<C>, hooks: HookChain) -> Self {
        let guard = AccessGuard::new(Arc::clone(&store));
        Self {
            store,
            guard,
            clock,
            hooks,
        }
    }

    /// Creates a task reported by `user_id`.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::NotFound`] for a missing project, column or
    /// assignee, [`TrackerError::Forbidden`] for non-writers, and
    /// [`TrackerError::BadRequest`] when the column lies outside the project,
    /// the assignee is not a workspace member or the position is negative.
    pub async fn create(
        &self,
        user_id: UserId,
        project_id: ProjectId,
        attributes: NewTask,
    ) -> TrackerResult<Task> {
        let scope = self
            .guard
            .authorize_write(user_id, Resource::Project(project_id))
            .await?;
        ensure_position(attributes.position)?;
        if let Some(column_id) = attributes.column_id {
            self.ensure_column_in_project(column_id, project_id).await?;
        }
        if let Some(assignee_id) = attributes.assignee_id {
            self.ensure_assignable(scope.workspace_id, assignee_id)
                .await?;
        }

        let task = Task::new(project_id, user_id, attributes, &*self.clock);
        let entry = ActivityEntry::record(
            task.id(),
            user_id,
            ActivityAction::TaskCreated,
            task.creation_details(),
            &*self.clock,
        );
        self.store.create_task(&task, &entry).await?;
        info!(task_id = %task.id(), %project_id, %user_id, "created task");

        self.hooks
            .dispatch(&CommitEvent::TaskCreated {
                actor: user_id,
                task: task.clone(),
            })
            .await;
        Ok(task)
    }

    /// Returns a readable task.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::NotFound`] or [`TrackerError::Forbidden`].
    pub async fn get(&self, user_id: UserId, task_id: TaskId) -> TrackerResult<Task> {
        self.guard
            .authorize_read(user_id, Resource::Task(task_id))
            .await?;
        self.load(task_id).await
    }

    /// Lists the tasks of a readable project matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::NotFound`] or [`TrackerError::Forbidden`].
    pub async fn list(
        &self,
        user_id: UserId,
        project_id: ProjectId,
        filter: TaskFilter,
    ) -> TrackerResult<Vec<Task>> {
        self.guard
            .authorize_read(user_id, Resource::Project(project_id))
            .await?;
        Ok(self.store.list_tasks(project_id, &filter).await?)
    }

    /// Lists tasks assigned to `user_id` across their workspaces.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Storage`] on persistence failure.
    pub async fn mine(&self, user_id: UserId) -> TrackerResult<Vec<Task>> {
        Ok(self.store.list_tasks_assigned_to(user_id).await?)
    }

    /// Applies `patch`, logging a `task_updated` entry with the field diff.
    ///
    /// A patch that changes no tracked field writes no activity entry.
    ///
    /// # Errors
    ///
    /// Same as [`Self::create`].
    pub async fn update(
        &self,
        user_id: UserId,
        task_id: TaskId,
        patch: TaskPatch,
    ) -> TrackerResult<Task> {
        let scope = self
            .guard
            .authorize_write(user_id, Resource::Task(task_id))
            .await?;
        let mut task = self.load(task_id).await?;
        if let Some(position) = patch.position {
            ensure_position(position)?;
        }
        if let Some(Some(column_id)) = patch.column_id {
            self.ensure_column_in_project(column_id, task.project_id())
                .await?;
        }
        if let Some(Some(assignee_id)) = patch.assignee_id {
            self.ensure_assignable(scope.workspace_id, assignee_id)
                .await?;
        }

        let before = task.clone();
        let changes = task.apply_patch(patch, &*self.clock);
        if task == before {
            debug!(%task_id, "task update changed nothing");
            return Ok(task);
        }
        let entry = (!changes.is_empty()).then(|| {
            ActivityEntry::record(
                task_id,
                user_id,
                ActivityAction::TaskUpdated,
                changes.to_details(),
                &*self.clock,
            )
        });
        self.store.update_task(&task, entry.as_ref()).await?;
        info!(%task_id, %user_id, fields = changes.changes().len(), "updated task");

        if !changes.is_empty() {
            self.hooks
                .dispatch(&CommitEvent::TaskUpdated {
                    actor: user_id,
                    before: Box::new(before),
                    after: Box::new(task.clone()),
                })
                .await;
        }
        Ok(task)
    }

    /// Files the task in another column, logging a `task_moved` entry.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::BadRequest`] when the column belongs to a
    /// different project or the position is negative; the task is left
    /// unchanged.
    pub async fn move_task(
        &self,
        user_id: UserId,
        task_id: TaskId,
        request: MoveTaskRequest,
    ) -> TrackerResult<Task> {
        self.guard
            .authorize_write(user_id, Resource::Task(task_id))
            .await?;
        let mut task = self.load(task_id).await?;
        ensure_position(request.position)?;
        self.ensure_column_in_project(request.column_id, task.project_id())
            .await?;

        let record = task.move_to(request.column_id, request.position, &*self.clock);
        let entry = ActivityEntry::record(
            task_id,
            user_id,
            ActivityAction::TaskMoved,
            record.to_details(),
            &*self.clock,
        );
        self.store.update_task(&task, Some(&entry)).await?;
        info!(
            %task_id,
            %user_id,
            column_id = %request.column_id,
            position = request.position,
            "moved task"
        );
        Ok(task)
    }

    /// Deletes a task with its comments, mentions, reminders and activity.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::NotFound`] or [`TrackerError::Forbidden`].
    pub async fn delete(&self, user_id: UserId, task_id: TaskId) -> TrackerResult<()> {
        self.guard
            .authorize_write(user_id, Resource::Task(task_id))
            .await?;
        let task = self.load(task_id).await?;
        self.store.delete_task(task_id).await?;
        // The activity trail cascades with the task, so the deletion is
        // recorded in the service log instead.
        info!(
            %task_id,
            %user_id,
            action = ActivityAction::TaskDeleted.as_str(),
            title = task.title().as_str(),
            "deleted task"
        );
        Ok(())
    }

    /// Returns the activity trail of a readable task, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::NotFound`] or [`TrackerError::Forbidden`].
    pub async fn activity(
        &self,
        user_id: UserId,
        task_id: TaskId,
    ) -> TrackerResult<Vec<ActivityEntry>> {
        self.guard
            .authorize_read(user_id, Resource::Task(task_id))
            .await?;
        Ok(self.store.list_activity(task_id).await?)
    }

    async fn load(&self, task_id: TaskId) -> TrackerResult<Task> {
        self.store
            .find_task(task_id)
            .await?
            .ok_or_else(|| TrackerError::not_found(EntityKind::Task, task_id))
    }

    async fn ensure_column_in_project(
        &self,
        column_id: ColumnId,
        project_id: ProjectId,
    ) -> TrackerResult<()> {
        let column = self
            .store
            .find_column(column_id)
            .await?
            .ok_or_else(|| TrackerError::not_found(EntityKind::Column, column_id))?;
        let board = self
            .store
            .find_board(column.board_id())
            .await?
            .ok_or_else(|| TrackerError::not_found(EntityKind::Board, column.board_id()))?;
        if board.project_id() != project_id {
            return Err(TrackerError::bad_request(format!(
                "column {column_id} does not belong to project {project_id}"
            )));
        }
        Ok(())
    }

    async fn ensure_assignable(
        &self,
        workspace_id: WorkspaceId,
        assignee_id: UserId,
    ) -> TrackerResult<()> {
        self.store
            .find_user(assignee_id)
            .await?
            .ok_or_else(|| TrackerError::not_found(EntityKind::User, assignee_id))?;
        if self
            .store
            .find_membership(workspace_id, assignee_id)
            .await?
            .is_none()
        {
            return Err(TrackerError::bad_request(format!(
                "assignee {assignee_id} is not a member of workspace {workspace_id}"
            )));
        }
        Ok(())
    }
}

fn ensure_position(position: i32) -> TrackerResult<()> {
    if position < 0 {
        return Err(TrackerError::bad_request(TaskDomainError::NegativePosition(
            position,
        )));
    }
    Ok(())
}
