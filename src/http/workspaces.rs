use super::extract::{JsonBody, PathParams};
use super::{AppState, auth::CurrentUser, double_option, error::ApiResult};
use crate::error::{TrackerError, TrackerResult};
use crate::ids::{UserId, WorkspaceId};
use crate::storage::TrackerStore;
use crate::workspace::domain::{
    ColumnTemplate, Membership, WorkingDays, Workspace, WorkspaceChanges, WorkspaceName,
    WorkspaceRole,
};
use crate::workspace::services::CreateWorkspaceRequest;
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(super) struct CreateWorkspaceBody {
    name: String,
    description: Option<String>,
    default_columns: Option<Vec<String>>,
    working_days: Option<Vec<i16>>,
    default_reminder_offset_minutes: Option<i32>,
}

impl CreateWorkspaceBody {
    fn into_request(self) -> CreateWorkspaceRequest {
        let mut request = CreateWorkspaceRequest::new(self.name);
        if let Some(description) = self.description {
            request = request.with_description(description);
        }
        if let Some(columns) = self.default_columns {
            request = request.with_default_columns(columns);
        }
        if let Some(days) = self.working_days {
            request = request.with_working_days(days);
        }
        if let Some(minutes) = self.default_reminder_offset_minutes {
            request = request.with_default_reminder_offset(minutes);
        }
        request
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct UpdateWorkspaceBody {
    name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    description: Option<Option<String>>,
    default_columns: Option<Vec<String>>,
    working_days: Option<Vec<i16>>,
    default_reminder_offset_minutes: Option<i32>,
}

impl UpdateWorkspaceBody {
    fn into_changes(self) -> TrackerResult<WorkspaceChanges> {
        Ok(WorkspaceChanges {
            name: self
                .name
                .map(WorkspaceName::new)
                .transpose()
                .map_err(TrackerError::bad_request)?,
            description: self.description,
            default_columns: self
                .default_columns
                .map(ColumnTemplate::new)
                .transpose()
                .map_err(TrackerError::bad_request)?,
            working_days: self
                .working_days
                .map(WorkingDays::new)
                .transpose()
                .map_err(TrackerError::bad_request)?,
            default_reminder_offset_minutes: self.default_reminder_offset_minutes,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct AddMemberBody {
    user_id: UserId,
    role: Option<WorkspaceRole>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ChangeRoleBody {
    role: WorkspaceRole,
}

#[derive(Debug, Deserialize)]
pub(super) struct JoinBody {
    invite_code: String,
}

pub(super) async fn create<S: TrackerStore>(
    State(state): State<AppState<S>>,
    user: CurrentUser,
    JsonBody(body): JsonBody<CreateWorkspaceBody>,
) -> ApiResult<(StatusCode, Json<Workspace>)> {
    let workspace = state
        .workspaces
        .create(user.id(), body.into_request())
        .await?;
    Ok((StatusCode::CREATED, Json(workspace)))
}

pub(super) async fn list<S: TrackerStore>(
    State(state): State<AppState<S>>,
    user: CurrentUser,
) -> ApiResult<Json<Vec<Workspace>>> {
    Ok(Json(state.workspaces.list(user.id()).await?))
}

pub(super) async fn get<S: TrackerStore>(
    State(state): State<AppState<S>>,
    user: CurrentUser,
    PathParams(workspace_id): PathParams<WorkspaceId>,
) -> ApiResult<Json<Workspace>> {
    Ok(Json(state.workspaces.get(user.id(), workspace_id).await?))
}

pub(super) async fn update<S: TrackerStore>(
    State(state): State<AppState<S>>,
    user: CurrentUser,
    PathParams(workspace_id): PathParams<WorkspaceId>,
    JsonBody(body): JsonBody<UpdateWorkspaceBody>,
) -> ApiResult<Json<Workspace>> {
    let changes = body.into_changes()?;
    let workspace = state
        .workspaces
        .update(user.id(), workspace_id, changes)
        .await?;
    Ok(Json(workspace))
}

pub(super) async fn delete<S: TrackerStore>(
    State(state): State<AppState<S>>,
    user: CurrentUser,
    PathParams(workspace_id): PathParams<WorkspaceId>,
) -> ApiResult<StatusCode> {
    state.workspaces.delete(user.id(), workspace_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub(super) async fn list_members<S: TrackerStore>(
    State(state): State<AppState<S>>,
    user: CurrentUser,
    PathParams(workspace_id): PathParams<WorkspaceId>,
) -> ApiResult<Json<Vec<Membership>>> {
    Ok(Json(
        state.workspaces.list_members(user.id(), workspace_id).await?,
    ))
}

pub(super) async fn add_member<S: TrackerStore>(
    State(state): State<AppState<S>>,
    user: CurrentUser,
    PathParams(workspace_id): PathParams<WorkspaceId>,
    JsonBody(body): JsonBody<AddMemberBody>,
) -> ApiResult<(StatusCode, Json<Membership>)> {
    let role = body.role.unwrap_or(WorkspaceRole::Member);
    let membership = state
        .workspaces
        .add_member(user.id(), workspace_id, body.user_id, role)
        .await?;
    Ok((StatusCode::CREATED, Json(membership)))
}

pub(super) async fn change_role<S: TrackerStore>(
    State(state): State<AppState<S>>,
    user: CurrentUser,
    PathParams((workspace_id, member_id)): PathParams<(WorkspaceId, UserId)>,
    JsonBody(body): JsonBody<ChangeRoleBody>,
) -> ApiResult<Json<Membership>> {
    let membership = state
        .workspaces
        .change_role(user.id(), workspace_id, member_id, body.role)
        .await?;
    Ok(Json(membership))
}

pub(super) async fn remove_member<S: TrackerStore>(
    State(state): State<AppState<S>>,
    user: CurrentUser,
    PathParams((workspace_id, member_id)): PathParams<(WorkspaceId, UserId)>,
) -> ApiResult<StatusCode> {
    state
        .workspaces
        .remove_member(user.id(), workspace_id, member_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub(super) async fn regenerate_invite<S: TrackerStore>(
    State(state): State<AppState<S>>,
    user: CurrentUser,
    PathParams(workspace_id): PathParams<WorkspaceId>,
) -> ApiResult<Json<Workspace>> {
    let workspace = state
        .workspaces
        .regenerate_invite_code(user.id(), workspace_id)
        .await?;
    Ok(Json(workspace))
}

pub(super) async fn join<S: TrackerStore>(
    State(state): State<AppState<S>>,
    user: CurrentUser,
    JsonBody(body): JsonBody<JoinBody>,
) -> ApiResult<(StatusCode, Json<Membership>)> {
    let membership = state
        .workspaces
        .join_by_invite_code(user.id(), &body.invite_code)
        .await?;
    Ok((StatusCode::CREATED, Json(membership)))
}

pub(super) async fn leave<S: TrackerStore>(
    State(state): State<AppState<S>>,
    user: CurrentUser,
    PathParams(workspace_id): PathParams<WorkspaceId>,
) -> ApiResult<StatusCode> {
    state.workspaces.leave(user.id(), workspace_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
