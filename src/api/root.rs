//! Root discovery endpoint

use crate::api::AppState;
use crate::core::extractors::Identity;
use crate::core::hyperlink::Links;
use axum::{Json, extract::State};
use serde_json::{Map, Value};

/// GET /
///
/// One absolute collection URL per registered resource key.
pub async fn api_root(
    State(state): State<AppState>,
    Identity(_): Identity,
    links: Links,
) -> Json<Map<String, Value>> {
    Json(
        state
            .directory
            .iter()
            .map(|(key, resource)| (key.clone(), Value::String(links.collection_named(resource))))
            .collect(),
    )
}
