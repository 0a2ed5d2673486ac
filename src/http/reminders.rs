use super::extract::{JsonBody, PathParams};
use super::{AppState, auth::CurrentUser, error::ApiResult};
use crate::ids::{ReminderId, TaskId};
use crate::reminder::domain::Reminder;
use crate::storage::TrackerStore;
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(super) struct CreateReminderBody {
    task_id: TaskId,
    remind_at: DateTime<Utc>,
}

pub(super) async fn create<S: TrackerStore>(
    State(state): State<AppState<S>>,
    user: CurrentUser,
    JsonBody(body): JsonBody<CreateReminderBody>,
) -> ApiResult<(StatusCode, Json<Reminder>)> {
    let reminder = state
        .reminders
        .create(user.id(), body.task_id, body.remind_at)
        .await?;
    Ok((StatusCode::CREATED, Json(reminder)))
}

pub(super) async fn list<S: TrackerStore>(
    State(state): State<AppState<S>>,
    user: CurrentUser,
) -> ApiResult<Json<Vec<Reminder>>> {
    Ok(Json(state.reminders.list(user.id()).await?))
}

pub(super) async fn get<S: TrackerStore>(
    State(state): State<AppState<S>>,
    user: CurrentUser,
    PathParams(reminder_id): PathParams<ReminderId>,
) -> ApiResult<Json<Reminder>> {
    Ok(Json(state.reminders.get(user.id(), reminder_id).await?))
}

pub(super) async fn cancel<S: TrackerStore>(
    State(state): State<AppState<S>>,
    user: CurrentUser,
    PathParams(reminder_id): PathParams<ReminderId>,
) -> ApiResult<Json<Reminder>> {
    Ok(Json(state.reminders.cancel(user.id(), reminder_id).await?))
}
