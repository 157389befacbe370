//! Axum extractor for validated payloads

use crate::core::error::{BlogError, ValidationError};
use axum::{
    Json,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use validator::Validate;

/// Axum extractor that deserializes and validates a JSON body
///
/// # Usage
///
/// ```rust,ignore
/// pub async fn create_article(
///     Validated(input): Validated<ArticleInput>,
/// ) -> BlogResult<Json<ArticleRepresentation>> {
///     // input already passed its field rules
/// }
/// ```
///
/// Malformed JSON and validation failures are both rejected with
/// `400 VALIDATION_ERROR`; only the latter carries per-field details.
#[derive(Debug)]
pub struct Validated<T>(pub T);

impl<S, T> FromRequest<S> for Validated<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = BlogError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload) = Json::<T>::from_request(req, state).await.map_err(|e| {
            ValidationError::InvalidJson {
                message: e.body_text(),
            }
        })?;

        payload.validate()?;
        Ok(Validated(payload))
    }
}
