//! Extractors whose rejections render as `bad_request` API errors.

use super::error::ApiError;
use crate::error::TrackerError;
use async_trait::async_trait;
use axum::Json;
use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

/// JSON request body.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

/// Path parameters.
#[derive(Debug, Clone)]
pub struct PathParams<T>(pub T);

/// Query string parameters.
#[derive(Debug, Clone)]
pub struct QueryParams<T>(pub T);

fn malformed(message: String) -> ApiError {
    ApiError::Tracker(TrackerError::bad_request(message))
}

#[async_trait]
impl<T, St> FromRequest<St> for JsonBody<T>
where
    T: DeserializeOwned,
    St: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(request: Request, state: &St) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(request, state)
            .await
            .map_err(|rejection| malformed(rejection.body_text()))?;
        Ok(Self(value))
    }
}

#[async_trait]
impl<T, St> FromRequestParts<St> for PathParams<T>
where
    T: DeserializeOwned + Send,
    St: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &St) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| malformed(rejection.body_text()))?;
        Ok(Self(value))
    }
}

#[async_trait]
impl<T, St> FromRequestParts<St> for QueryParams<T>
where
    T: DeserializeOwned,
    St: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &St) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| malformed(rejection.body_text()))?;
        Ok(Self(value))
    }
}
