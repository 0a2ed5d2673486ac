use super::extract::{JsonBody, PathParams, QueryParams};
use super::{AppState, auth::CurrentUser, double_option, error::ApiResult};
use crate::error::{TrackerError, TrackerResult};
use crate::ids::{ColumnId, ProjectId, TaskId, UserId};
use crate::storage::TrackerStore;
use crate::task::domain::{
    ActivityEntry, NewTask, Task, TaskFilter, TaskPatch, TaskPriority, TaskStatus, TaskTitle,
    TaskType,
};
use crate::task::services::MoveTaskRequest;
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(super) struct CreateTaskBody {
    title: String,
    description: Option<String>,
    status: Option<TaskStatus>,
    priority: Option<TaskPriority>,
    #[serde(rename = "type")]
    task_type: Option<TaskType>,
    column_id: Option<ColumnId>,
    assignee_id: Option<UserId>,
    due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    tags: Vec<String>,
    position: Option<i32>,
}

impl CreateTaskBody {
    fn into_new_task(self) -> TrackerResult<NewTask> {
        let title = TaskTitle::new(&self.title).map_err(TrackerError::bad_request)?;
        let mut task = NewTask::new(title);
        task.description = self.description;
        task.status = self.status.unwrap_or_default();
        task.priority = self.priority.unwrap_or_default();
        task.task_type = self.task_type.unwrap_or_default();
        task.column_id = self.column_id;
        task.assignee_id = self.assignee_id;
        task.due_date = self.due_date;
        task.tags = self.tags;
        task.position = self.position.unwrap_or_default();
        Ok(task)
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct UpdateTaskBody {
    title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    description: Option<Option<String>>,
    status: Option<TaskStatus>,
    priority: Option<TaskPriority>,
    #[serde(rename = "type")]
    task_type: Option<TaskType>,
    #[serde(default, deserialize_with = "double_option")]
    assignee_id: Option<Option<UserId>>,
    #[serde(default, deserialize_with = "double_option")]
    column_id: Option<Option<ColumnId>>,
    #[serde(default, deserialize_with = "double_option")]
    due_date: Option<Option<DateTime<Utc>>>,
    tags: Option<Vec<String>>,
    position: Option<i32>,
}

impl UpdateTaskBody {
    fn into_patch(self) -> TrackerResult<TaskPatch> {
        Ok(TaskPatch {
            title: self
                .title
                .map(TaskTitle::new)
                .transpose()
                .map_err(TrackerError::bad_request)?,
            description: self.description,
            status: self.status,
            priority: self.priority,
            task_type: self.task_type,
            assignee_id: self.assignee_id,
            column_id: self.column_id,
            due_date: self.due_date,
            tags: self.tags,
            position: self.position,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct MoveTaskBody {
    column_id: ColumnId,
    position: i32,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct TaskListQuery {
    assignee_id: Option<UserId>,
    status: Option<TaskStatus>,
    priority: Option<TaskPriority>,
    #[serde(rename = "type")]
    task_type: Option<TaskType>,
}

impl From<TaskListQuery> for TaskFilter {
    fn from(query: TaskListQuery) -> Self {
        Self {
            assignee_id: query.assignee_id,
            status: query.status,
            priority: query.priority,
            task_type: query.task_type,
        }
    }
}

pub(super) async fn create<S: TrackerStore>(
    State(state): State<AppState<S>>,
    user: CurrentUser,
    PathParams(project_id): PathParams<ProjectId>,
    JsonBody(body): JsonBody<CreateTaskBody>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let attributes = body.into_new_task()?;
    let task = state.tasks.create(user.id(), project_id, attributes).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

pub(super) async fn list<S: TrackerStore>(
    State(state): State<AppState<S>>,
    user: CurrentUser,
    PathParams(project_id): PathParams<ProjectId>,
    QueryParams(query): QueryParams<TaskListQuery>,
) -> ApiResult<Json<Vec<Task>>> {
    let tasks = state
        .tasks
        .list(user.id(), project_id, query.into())
        .await?;
    Ok(Json(tasks))
}

pub(super) async fn mine<S: TrackerStore>(
    State(state): State<AppState<S>>,
    user: CurrentUser,
) -> ApiResult<Json<Vec<Task>>> {
    Ok(Json(state.tasks.mine(user.id()).await?))
}

pub(super) async fn get<S: TrackerStore>(
    State(state): State<AppState<S>>,
    user: CurrentUser,
    PathParams(task_id): PathParams<TaskId>,
) -> ApiResult<Json<Task>> {
    Ok(Json(state.tasks.get(user.id(), task_id).await?))
}

pub(super) async fn update<S: TrackerStore>(
    State(state): State<AppState<S>>,
    user: CurrentUser,
    PathParams(task_id): PathParams<TaskId>,
    JsonBody(body): JsonBody<UpdateTaskBody>,
) -> ApiResult<Json<Task>> {
    let patch = body.into_patch()?;
    Ok(Json(state.tasks.update(user.id(), task_id, patch).await?))
}

pub(super) async fn move_task<S: TrackerStore>(
    State(state): State<AppState<S>>,
    user: CurrentUser,
    PathParams(task_id): PathParams<TaskId>,
    JsonBody(body): JsonBody<MoveTaskBody>,
) -> ApiResult<Json<Task>> {
    let request = MoveTaskRequest {
        column_id: body.column_id,
        position: body.position,
    };
    Ok(Json(state.tasks.move_task(user.id(), task_id, request).await?))
}

pub(super) async fn delete<S: TrackerStore>(
    State(state): State<AppState<S>>,
    user: CurrentUser,
    PathParams(task_id): PathParams<TaskId>,
) -> ApiResult<StatusCode> {
    state.tasks.delete(user.id(), task_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub(super) async fn activity<S: TrackerStore>(
    State(state): State<AppState<S>>,
    user: CurrentUser,
    PathParams(task_id): PathParams<TaskId>,
) -> ApiResult<Json<Vec<ActivityEntry>>> {
    Ok(Json(state.tasks.activity(user.id(), task_id).await?))
}
