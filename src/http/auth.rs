//! Init-data authentication extractor.
//!
//! Clients send `Authorization: tma <initData>`. The payload is verified
//! against the bot token, then the asserted identity is registered or
//! refreshed before the handler runs.

use super::{AppState, error::ApiError};
use crate::identity::domain::User;
use crate::ids::UserId;
use crate::storage::TrackerStore;
use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::{header::AUTHORIZATION, request::Parts};
use mockable::Clock;

const SCHEME: &str = "tma";

/// The authenticated caller.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl CurrentUser {
    /// Returns the caller's identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.0.id()
    }
}

/// Extracts the init data from an `Authorization` header value.
fn init_data(header: &str) -> Option<&str> {
    let (scheme, payload) = header.trim().split_once(' ')?;
    let payload = payload.trim();
    (scheme.eq_ignore_ascii_case(SCHEME) && !payload.is_empty()).then_some(payload)
}

#[async_trait]
impl<S> FromRequestParts<AppState<S>> for CurrentUser
where
    S: TrackerStore,
{
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<S>,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("missing authorization header".to_owned()))?;
        let payload = init_data(header).ok_or_else(|| {
            ApiError::Unauthorized("expected 'tma <initData>' authorization".to_owned())
        })?;
        let identity = state.verifier.verify(payload, state.clock.utc())?;
        let user = state.identity.authenticate(identity).await?;
        Ok(Self(user))
    }
}
