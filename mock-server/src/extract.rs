//! Body and query extractors whose rejections carry a `{"detail": ...}` body.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        FromRequest, FromRequestParts, Query, Request,
    },
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;

use crate::DetailError;

/// `Json<T>` with backend-shaped rejections.
pub struct ApiJson<T>(pub T);

/// `Query<T>` with backend-shaped rejections.
pub struct ApiQuery<T>(pub T);

impl From<JsonRejection> for DetailError {
    fn from(rejection: JsonRejection) -> Self {
        DetailError::new(rejection.status(), rejection.body_text())
    }
}

impl From<QueryRejection> for DetailError {
    fn from(rejection: QueryRejection) -> Self {
        DetailError::new(rejection.status(), rejection.body_text())
    }
}

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = DetailError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = DetailError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await?;
        Ok(Self(value))
    }
}
