use super::extract::{JsonBody, PathParams};
use super::{AppState, auth::CurrentUser, error::ApiResult};
use crate::comment::domain::Comment;
use crate::ids::{CommentId, TaskId};
use crate::storage::TrackerStore;
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(super) struct CreateCommentBody {
    body: String,
    parent_id: Option<CommentId>,
}

#[derive(Debug, Deserialize)]
pub(super) struct UpdateCommentBody {
    body: String,
}

pub(super) async fn create<S: TrackerStore>(
    State(state): State<AppState<S>>,
    user: CurrentUser,
    PathParams(task_id): PathParams<TaskId>,
    JsonBody(payload): JsonBody<CreateCommentBody>,
) -> ApiResult<(StatusCode, Json<Comment>)> {
    let comment = state
        .comments
        .create(user.id(), task_id, &payload.body, payload.parent_id)
        .await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

pub(super) async fn list<S: TrackerStore>(
    State(state): State<AppState<S>>,
    user: CurrentUser,
    PathParams(task_id): PathParams<TaskId>,
) -> ApiResult<Json<Vec<Comment>>> {
    Ok(Json(state.comments.list(user.id(), task_id).await?))
}

pub(super) async fn update<S: TrackerStore>(
    State(state): State<AppState<S>>,
    user: CurrentUser,
    PathParams(comment_id): PathParams<CommentId>,
    JsonBody(payload): JsonBody<UpdateCommentBody>,
) -> ApiResult<Json<Comment>> {
    let comment = state
        .comments
        .update(user.id(), comment_id, &payload.body)
        .await?;
    Ok(Json(comment))
}

pub(super) async fn delete<S: TrackerStore>(
    State(state): State<AppState<S>>,
    user: CurrentUser,
    PathParams(comment_id): PathParams<CommentId>,
) -> ApiResult<StatusCode> {
    state.comments.delete(user.id(), comment_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
