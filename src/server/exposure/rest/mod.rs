//! REST API exposure
//!
//! Consumes a `ServerHost` and produces an Axum `Router` with the root
//! directory, every registered resource and the health checks.

use crate::api::AppState;
use crate::api::root::api_root;
use crate::server::host::ServerHost;
use axum::{Json, Router, routing::get};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// REST API exposure implementation
pub struct RestExposure;

impl RestExposure {
    /// Build the REST router from a host
    ///
    /// Returns a fully configured Axum router with:
    /// - Health check routes
    /// - The root hyperlink directory
    /// - Routes of every registered resource
    pub fn build_router(host: ServerHost) -> Router {
        let state = AppState {
            articles: host.articles,
            users: host.users,
            auth: host.auth,
            public_url: host.public_url,
            directory: Arc::new(host.registry.directory()),
        };

        let api_routes = Router::new()
            .route("/", get(api_root))
            .merge(host.registry.build_routes())
            .with_state(state);

        Self::health_routes()
            .merge(api_routes)
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(CorsLayer::permissive()),
            )
    }

    /// Build health check routes
    fn health_routes() -> Router {
        Router::new()
            .route("/health", get(Self::health_check))
            .route("/healthz", get(Self::health_check))
    }

    /// Health check endpoint handler
    async fn health_check() -> Json<Value> {
        Json(json!({
            "status": "ok",
            "service": "blog"
        }))
    }
}
