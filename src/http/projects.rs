use super::extract::{JsonBody, PathParams};
use super::{AppState, auth::CurrentUser, double_option, error::ApiResult};
use crate::error::TrackerError;
use crate::ids::{ProjectId, WorkspaceId};
use crate::project::domain::{Project, ProjectChanges, ProjectName, ProjectVisibility};
use crate::project::services::CreateProjectRequest;
use crate::storage::TrackerStore;
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(super) struct CreateProjectBody {
    name: String,
    description: Option<String>,
    visibility: Option<ProjectVisibility>,
}

#[derive(Debug, Deserialize)]
pub(super) struct UpdateProjectBody {
    name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    description: Option<Option<String>>,
    visibility: Option<ProjectVisibility>,
}

pub(super) async fn create<S: TrackerStore>(
    State(state): State<AppState<S>>,
    user: CurrentUser,
    PathParams(workspace_id): PathParams<WorkspaceId>,
    JsonBody(body): JsonBody<CreateProjectBody>,
) -> ApiResult<(StatusCode, Json<Project>)> {
    let request = CreateProjectRequest {
        name: body.name,
        description: body.description,
        visibility: body.visibility,
    };
    let project = state
        .projects
        .create(user.id(), workspace_id, request)
        .await?;
    Ok((StatusCode::CREATED, Json(project)))
}

pub(super) async fn list<S: TrackerStore>(
    State(state): State<AppState<S>>,
    user: CurrentUser,
    PathParams(workspace_id): PathParams<WorkspaceId>,
) -> ApiResult<Json<Vec<Project>>> {
    Ok(Json(state.projects.list(user.id(), workspace_id).await?))
}

pub(super) async fn get<S: TrackerStore>(
    State(state): State<AppState<S>>,
    user: CurrentUser,
    PathParams(project_id): PathParams<ProjectId>,
) -> ApiResult<Json<Project>> {
    Ok(Json(state.projects.get(user.id(), project_id).await?))
}

pub(super) async fn update<S: TrackerStore>(
    State(state): State<AppState<S>>,
    user: CurrentUser,
    PathParams(project_id): PathParams<ProjectId>,
    JsonBody(body): JsonBody<UpdateProjectBody>,
) -> ApiResult<Json<Project>> {
    let changes = ProjectChanges {
        name: body
            .name
            .map(ProjectName::new)
            .transpose()
            .map_err(TrackerError::bad_request)?,
        description: body.description,
        visibility: body.visibility,
    };
    let project = state
        .projects
        .update(user.id(), project_id, changes)
        .await?;
    Ok(Json(project))
}

pub(super) async fn delete<S: TrackerStore>(
    State(state): State<AppState<S>>,
    user: CurrentUser,
    PathParams(project_id): PathParams<ProjectId>,
) -> ApiResult<StatusCode> {
    state.projects.delete(user.id(), project_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
