//! Axum extractors shared by the API handlers

use crate::core::auth::{AuthContext, AuthProvider};
use crate::core::error::BlogError;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use std::sync::Arc;

/// The caller of the current request.
///
/// Missing credentials resolve to [`AuthContext::Anonymous`]; credentials
/// that fail verification reject the request with 401 even on read-only
/// endpoints.
#[derive(Debug, Clone)]
pub struct Identity(pub AuthContext);

impl<S> FromRequestParts<S> for Identity
where
    Arc<dyn AuthProvider>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = BlogError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let provider = <Arc<dyn AuthProvider> as FromRef<S>>::from_ref(state);
        let context = provider.extract_context(&parts.headers).await?;
        Ok(Identity(context))
    }
}
