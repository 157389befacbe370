//! Handlers for `/articles/`
//!
//! Reads are public. Writes go through three gates, in order:
//! authentication (401), lookup by slug (404), ownership (403). Payload
//! validation only runs once the caller is allowed to write.

use crate::api::AppState;
use crate::api::serializers::{ArticleInput, ArticlePatch, ArticleRepresentation};
use crate::core::auth::{AuthContext, AuthPolicy};
use crate::core::error::{ArticleError, BlogError, BlogResult};
use crate::core::extractors::Identity;
use crate::core::hyperlink::Links;
use crate::core::validation::Validated;
use crate::entities::{Article, ArticleChanges, UserId};
use crate::server::registry::ResourceDescriptor;
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use std::collections::HashMap;

/// Check a write policy, logging refusals
fn authorize(
    policy: AuthPolicy,
    context: &AuthContext,
    owner: Option<UserId>,
    action: &str,
) -> BlogResult<()> {
    policy.enforce(context, owner).inspect_err(|e| {
        tracing::warn!(
            action = action,
            user = context.username().unwrap_or("anonymous"),
            code = e.error_code(),
            "article write refused"
        );
    })
}

async fn load(state: &AppState, slug: &str) -> BlogResult<Article> {
    state.articles.get(slug).await?.ok_or_else(|| {
        ArticleError::NotFound {
            slug: slug.to_string(),
        }
        .into()
    })
}

async fn owner_name(state: &AppState, owner_id: UserId) -> BlogResult<String> {
    state
        .users
        .get(owner_id)
        .await?
        .map(|user| user.username)
        .ok_or_else(|| BlogError::Internal(format!("article owner {} does not exist", owner_id)))
}

async fn represent(
    state: &AppState,
    article: Article,
    links: &Links,
) -> BlogResult<ArticleRepresentation> {
    let owner = owner_name(state, article.owner_id).await?;
    Ok(ArticleRepresentation::new(article, owner, links))
}

/// GET /articles/
pub async fn list_articles(
    State(state): State<AppState>,
    Identity(_): Identity,
    links: Links,
) -> BlogResult<Json<Vec<ArticleRepresentation>>> {
    let articles = state.articles.list().await?;
    let usernames: HashMap<UserId, String> = state
        .users
        .list()
        .await?
        .into_iter()
        .map(|user| (user.id, user.username))
        .collect();

    tracing::debug!(count = articles.len(), "listing articles");

    let representations = articles
        .into_iter()
        .map(|article| {
            let owner = usernames.get(&article.owner_id).cloned().ok_or_else(|| {
                BlogError::Internal(format!("article owner {} does not exist", article.owner_id))
            })?;
            Ok(ArticleRepresentation::new(article, owner, &links))
        })
        .collect::<BlogResult<Vec<_>>>()?;

    Ok(Json(representations))
}

/// GET /articles/{slug}/
pub async fn retrieve_article(
    State(state): State<AppState>,
    Identity(_): Identity,
    links: Links,
    Path(slug): Path<String>,
) -> BlogResult<Json<ArticleRepresentation>> {
    let article = load(&state, &slug).await?;
    tracing::debug!(slug = %slug, "retrieved article");
    Ok(Json(represent(&state, article, &links).await?))
}

/// POST /articles/
pub async fn create_article(
    State(state): State<AppState>,
    Identity(context): Identity,
    links: Links,
    payload: Result<Validated<ArticleInput>, BlogError>,
) -> BlogResult<(StatusCode, Json<ArticleRepresentation>)> {
    authorize(AuthPolicy::Authenticated, &context, None, "create")?;
    let owner_id = context
        .user_id()
        .ok_or_else(|| BlogError::Internal("authenticated context without user".to_string()))?;

    let Validated(input) = payload?;
    let created = state
        .articles
        .create(input.into_new_article(owner_id)?)
        .await?;

    tracing::info!(slug = %created.slug, owner = owner_id, "article created");
    Ok((StatusCode::CREATED, Json(represent(&state, created, &links).await?)))
}

async fn update(
    state: &AppState,
    context: &AuthContext,
    slug: &str,
    changes: impl FnOnce() -> BlogResult<ArticleChanges>,
) -> BlogResult<Article> {
    authorize(AuthPolicy::Authenticated, context, None, "update")?;
    let mut article = load(state, slug).await?;
    authorize(AuthPolicy::Owner, context, Some(article.owner_id), "update")?;

    changes()?.apply(&mut article);
    // the store writes by id and owner, never by the slug looked up above
    let updated = state.articles.update(article).await?;

    tracing::info!(slug = %slug, new_slug = %updated.slug, "article updated");
    Ok(updated)
}

/// PUT /articles/{slug}/
pub async fn update_article(
    State(state): State<AppState>,
    Identity(context): Identity,
    links: Links,
    Path(slug): Path<String>,
    payload: Result<Validated<ArticleInput>, BlogError>,
) -> BlogResult<Json<ArticleRepresentation>> {
    let updated = update(&state, &context, &slug, || {
        let Validated(input) = payload?;
        Ok(input.into_changes())
    })
    .await?;
    Ok(Json(represent(&state, updated, &links).await?))
}

/// PATCH /articles/{slug}/
pub async fn partial_update_article(
    State(state): State<AppState>,
    Identity(context): Identity,
    links: Links,
    Path(slug): Path<String>,
    payload: Result<Validated<ArticlePatch>, BlogError>,
) -> BlogResult<Json<ArticleRepresentation>> {
    let updated = update(&state, &context, &slug, || {
        let Validated(patch) = payload?;
        Ok(patch.into_changes())
    })
    .await?;
    Ok(Json(represent(&state, updated, &links).await?))
}

/// DELETE /articles/{slug}/
pub async fn delete_article(
    State(state): State<AppState>,
    Identity(context): Identity,
    Path(slug): Path<String>,
) -> BlogResult<StatusCode> {
    authorize(AuthPolicy::Authenticated, &context, None, "delete")?;
    let article = load(&state, &slug).await?;
    authorize(AuthPolicy::Owner, &context, Some(article.owner_id), "delete")?;

    state.articles.delete(&article).await?;

    tracing::info!(slug = %slug, "article deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Routes for `/articles/`, also advertised as `snippets` in the root
pub struct ArticleResource;

impl ResourceDescriptor for ArticleResource {
    fn name(&self) -> &str {
        "articles"
    }

    fn aliases(&self) -> &[&'static str] {
        &["snippets"]
    }

    fn build_routes(&self) -> Router<AppState> {
        Router::new()
            .route("/articles/", get(list_articles).post(create_article))
            .route(
                "/articles/{slug}/",
                get(retrieve_article)
                    .put(update_article)
                    .patch(partial_update_article)
                    .delete(delete_article),
            )
    }
}
