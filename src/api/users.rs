//! Read-only handlers for `/users/`

use crate::api::AppState;
use crate::api::serializers::UserRepresentation;
use crate::core::error::{BlogResult, UserError, ValidationError};
use crate::core::extractors::Identity;
use crate::core::hyperlink::Links;
use crate::entities::{Article, UserId};
use crate::server::registry::ResourceDescriptor;
use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use std::collections::HashMap;

/// GET /users/
pub async fn list_users(
    State(state): State<AppState>,
    Identity(_): Identity,
    links: Links,
) -> BlogResult<Json<Vec<UserRepresentation>>> {
    let users = state.users.list().await?;

    // list() is already in creation order, grouping keeps it
    let mut owned: HashMap<UserId, Vec<Article>> = HashMap::new();
    for article in state.articles.list().await? {
        owned.entry(article.owner_id).or_default().push(article);
    }

    tracing::debug!(count = users.len(), "listing users");

    Ok(Json(
        users
            .into_iter()
            .map(|user| {
                let articles = owned.remove(&user.id).unwrap_or_default();
                UserRepresentation::new(user, &articles, &links)
            })
            .collect(),
    ))
}

/// GET /users/{id}/
pub async fn retrieve_user(
    State(state): State<AppState>,
    Identity(_): Identity,
    links: Links,
    Path(id): Path<String>,
) -> BlogResult<Json<UserRepresentation>> {
    let id: UserId = id
        .parse()
        .map_err(|_| ValidationError::InvalidId { value: id.clone() })?;

    let user = state
        .users
        .get(id)
        .await?
        .ok_or(UserError::NotFound { id })?;
    let articles = state.articles.list_by_owner(id).await?;

    Ok(Json(UserRepresentation::new(user, &articles, &links)))
}

/// Read-only routes for `/users/`
pub struct UserResource;

impl ResourceDescriptor for UserResource {
    fn name(&self) -> &str {
        "users"
    }

    fn build_routes(&self) -> Router<AppState> {
        Router::new()
            .route("/users/", get(list_users))
            .route("/users/{id}/", get(retrieve_user))
    }
}
