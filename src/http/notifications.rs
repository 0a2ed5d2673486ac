use super::extract::{PathParams, QueryParams};
use super::{AppState, auth::CurrentUser, error::ApiResult};
use crate::ids::NotificationId;
use crate::notification::domain::Notification;
use crate::storage::TrackerStore;
use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
pub(super) struct ListQuery {
    #[serde(default)]
    unread_only: bool,
}

#[derive(Debug, Serialize)]
pub(super) struct MarkAllReadResponse {
    updated: u64,
}

pub(super) async fn list<S: TrackerStore>(
    State(state): State<AppState<S>>,
    user: CurrentUser,
    QueryParams(query): QueryParams<ListQuery>,
) -> ApiResult<Json<Vec<Notification>>> {
    let notifications = state
        .notifications
        .list(user.id(), query.unread_only)
        .await?;
    Ok(Json(notifications))
}

pub(super) async fn mark_read<S: TrackerStore>(
    State(state): State<AppState<S>>,
    user: CurrentUser,
    PathParams(notification_id): PathParams<NotificationId>,
) -> ApiResult<Json<Notification>> {
    let notification = state
        .notifications
        .mark_read(user.id(), notification_id)
        .await?;
    Ok(Json(notification))
}

pub(super) async fn mark_all_read<S: TrackerStore>(
    State(state): State<AppState<S>>,
    user: CurrentUser,
) -> ApiResult<Json<MarkAllReadResponse>> {
    let updated = state.notifications.mark_all_read(user.id()).await?;
    Ok(Json(MarkAllReadResponse { updated }))
}
