use super::extract::JsonBody;
use super::{AppState, auth::CurrentUser, double_option, error::ApiResult};
use crate::identity::domain::{ProfileUpdate, User};
use crate::storage::TrackerStore;
use axum::Json;
use axum::extract::State;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(super) struct UpdateProfileBody {
    first_name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    last_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    language_code: Option<Option<String>>,
}

pub(super) async fn me(CurrentUser(user): CurrentUser) -> Json<User> {
    Json(user)
}

pub(super) async fn update_me<S: TrackerStore>(
    State(state): State<AppState<S>>,
    user: CurrentUser,
    JsonBody(body): JsonBody<UpdateProfileBody>,
) -> ApiResult<Json<User>> {
    let update = ProfileUpdate {
        first_name: body.first_name,
        last_name: body.last_name,
        language_code: body.language_code,
    };
    let user = state.identity.update_profile(user.id(), update).await?;
    Ok(Json(user))
}
