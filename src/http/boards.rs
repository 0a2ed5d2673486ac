use super::extract::{JsonBody, PathParams};
use super::{AppState, auth::CurrentUser, error::ApiResult};
use crate::board::domain::{Board, BoardColumn};
use crate::board::services::{BoardWithColumns, CreateBoardRequest};
use crate::ids::{BoardId, ColumnId, ProjectId};
use crate::storage::TrackerStore;
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(super) struct CreateBoardBody {
    name: String,
    #[serde(default)]
    seed_columns: bool,
}

#[derive(Debug, Deserialize)]
pub(super) struct RenameBoardBody {
    name: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct CreateColumnBody {
    name: String,
    position: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub(super) struct UpdateColumnBody {
    name: Option<String>,
    position: Option<i32>,
}

pub(super) async fn create<S: TrackerStore>(
    State(state): State<AppState<S>>,
    user: CurrentUser,
    PathParams(project_id): PathParams<ProjectId>,
    JsonBody(body): JsonBody<CreateBoardBody>,
) -> ApiResult<(StatusCode, Json<BoardWithColumns>)> {
    let request = CreateBoardRequest {
        name: body.name,
        seed_columns: body.seed_columns,
    };
    let board = state.boards.create(user.id(), project_id, request).await?;
    Ok((StatusCode::CREATED, Json(board)))
}

pub(super) async fn list<S: TrackerStore>(
    State(state): State<AppState<S>>,
    user: CurrentUser,
    PathParams(project_id): PathParams<ProjectId>,
) -> ApiResult<Json<Vec<Board>>> {
    Ok(Json(state.boards.list(user.id(), project_id).await?))
}

pub(super) async fn get<S: TrackerStore>(
    State(state): State<AppState<S>>,
    user: CurrentUser,
    PathParams(board_id): PathParams<BoardId>,
) -> ApiResult<Json<BoardWithColumns>> {
    Ok(Json(state.boards.get(user.id(), board_id).await?))
}

pub(super) async fn rename<S: TrackerStore>(
    State(state): State<AppState<S>>,
    user: CurrentUser,
    PathParams(board_id): PathParams<BoardId>,
    JsonBody(body): JsonBody<RenameBoardBody>,
) -> ApiResult<Json<Board>> {
    let board = state.boards.rename(user.id(), board_id, &body.name).await?;
    Ok(Json(board))
}

pub(super) async fn delete<S: TrackerStore>(
    State(state): State<AppState<S>>,
    user: CurrentUser,
    PathParams(board_id): PathParams<BoardId>,
) -> ApiResult<StatusCode> {
    state.boards.delete(user.id(), board_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub(super) async fn create_column<S: TrackerStore>(
    State(state): State<AppState<S>>,
    user: CurrentUser,
    PathParams(board_id): PathParams<BoardId>,
    JsonBody(body): JsonBody<CreateColumnBody>,
) -> ApiResult<(StatusCode, Json<BoardColumn>)> {
    let column = state
        .boards
        .create_column(user.id(), board_id, &body.name, body.position)
        .await?;
    Ok((StatusCode::CREATED, Json(column)))
}

pub(super) async fn update_column<S: TrackerStore>(
    State(state): State<AppState<S>>,
    user: CurrentUser,
    PathParams(column_id): PathParams<ColumnId>,
    JsonBody(body): JsonBody<UpdateColumnBody>,
) -> ApiResult<Json<BoardColumn>> {
    let column = state
        .boards
        .update_column(user.id(), column_id, body.name.as_deref(), body.position)
        .await?;
    Ok(Json(column))
}

pub(super) async fn delete_column<S: TrackerStore>(
    State(state): State<AppState<S>>,
    user: CurrentUser,
    PathParams(column_id): PathParams<ColumnId>,
) -> ApiResult<StatusCode> {
    state.boards.delete_column(user.id(), column_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
