use super::extract::QueryParams;
use super::{AppState, auth::CurrentUser, error::ApiResult};
use crate::ids::ProjectId;
use crate::storage::TrackerStore;
use crate::task::domain::Task;
use axum::Json;
use axum::extract::State;
use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(super) struct CalendarQuery {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    project_id: Option<ProjectId>,
}

pub(super) async fn due<S: TrackerStore>(
    State(state): State<AppState<S>>,
    user: CurrentUser,
    QueryParams(query): QueryParams<CalendarQuery>,
) -> ApiResult<Json<Vec<Task>>> {
    let tasks = state
        .calendar
        .due_between(user.id(), query.start, query.end, query.project_id)
        .await?;
    Ok(Json(tasks))
}
