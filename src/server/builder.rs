//! ServerBuilder for fluent API to build HTTP servers

use super::exposure::RestExposure;
use super::host::ServerHost;
use super::registry::ResourceRegistry;
use crate::api::articles::ArticleResource;
use crate::api::users::UserResource;
use crate::core::auth::{AuthProvider, BasicAuthProvider};
use crate::core::hyperlink::PublicUrl;
use crate::core::service::{ArticleService, UserDirectory};
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Builder for creating the blog HTTP server
///
/// The article and user resources are always registered. The auth provider
/// defaults to HTTP Basic against the configured user directory.
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new()
///     .with_article_service(InMemoryArticleService::new())
///     .with_user_directory(users)
///     .build()?;
/// ```
pub struct ServerBuilder {
    articles: Option<Arc<dyn ArticleService>>,
    users: Option<Arc<dyn UserDirectory>>,
    auth: Option<Arc<dyn AuthProvider>>,
    public_url: Option<String>,
    registry: ResourceRegistry,
}

impl ServerBuilder {
    /// Create a new ServerBuilder
    pub fn new() -> Self {
        let mut registry = ResourceRegistry::new();
        registry.register(Box::new(UserResource));
        registry.register(Box::new(ArticleResource));

        Self {
            articles: None,
            users: None,
            auth: None,
            public_url: None,
            registry,
        }
    }

    /// Set the article service (required)
    pub fn with_article_service(mut self, service: impl ArticleService + 'static) -> Self {
        self.articles = Some(Arc::new(service));
        self
    }

    /// Set the user directory (required)
    pub fn with_user_directory(mut self, users: Arc<dyn UserDirectory>) -> Self {
        self.users = Some(users);
        self
    }

    /// Replace the default Basic auth provider
    pub fn with_auth_provider(mut self, provider: impl AuthProvider + 'static) -> Self {
        self.auth = Some(Arc::new(provider));
        self
    }

    /// Use a fixed base for hyperlinks instead of the request host
    pub fn with_public_url(mut self, url: impl Into<String>) -> Self {
        self.public_url = Some(url.into());
        self
    }

    /// Build the host holding all server state
    pub fn build_host(self) -> Result<ServerHost> {
        let articles = self.articles.ok_or_else(|| {
            anyhow::anyhow!("ArticleService is required. Call .with_article_service()")
        })?;
        let users = self.users.ok_or_else(|| {
            anyhow::anyhow!("UserDirectory is required. Call .with_user_directory()")
        })?;
        let auth = self
            .auth
            .unwrap_or_else(|| Arc::new(BasicAuthProvider::new(users.clone())));

        tracing::debug!(
            resources = ?self.registry.resource_names(),
            public_url = ?self.public_url,
            "server host assembled"
        );

        Ok(ServerHost {
            articles,
            users,
            auth,
            public_url: PublicUrl(self.public_url),
            registry: self.registry,
        })
    }

    /// Build the final REST router
    pub fn build(self) -> Result<Router> {
        Ok(RestExposure::build_router(self.build_host()?))
    }

    /// Serve the application with graceful shutdown
    ///
    /// This will:
    /// - Bind to the provided address
    /// - Start serving requests
    /// - Handle SIGTERM and SIGINT (Ctrl+C) for graceful shutdown
    pub async fn serve(self, addr: &str) -> Result<()> {
        let app = self.build()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Wait for a shutdown signal (SIGTERM or Ctrl+C)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{InMemoryArticleService, InMemoryUserDirectory};

    fn users() -> Arc<dyn UserDirectory> {
        Arc::new(InMemoryUserDirectory::new())
    }

    #[test]
    fn test_builder_registers_blog_resources() {
        let builder = ServerBuilder::new();
        assert_eq!(builder.registry.resource_names(), vec!["users", "articles"]);
    }

    #[test]
    fn test_build_requires_article_service() {
        let err = ServerBuilder::new()
            .with_user_directory(users())
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("ArticleService is required"));
    }

    #[test]
    fn test_build_requires_user_directory() {
        let err = ServerBuilder::new()
            .with_article_service(InMemoryArticleService::new())
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("UserDirectory is required"));
    }

    #[test]
    fn test_build_host_keeps_public_url() {
        let host = ServerBuilder::new()
            .with_article_service(InMemoryArticleService::new())
            .with_user_directory(users())
            .with_public_url("https://blog.example.com")
            .build_host()
            .unwrap();
        assert_eq!(host.public_url.0.as_deref(), Some("https://blog.example.com"));
        assert_eq!(host.registry.directory().len(), 3);
    }

    #[test]
    fn test_build_succeeds() {
        let result = ServerBuilder::new()
            .with_article_service(InMemoryArticleService::new())
            .with_user_directory(users())
            .build();
        assert!(result.is_ok());
    }
}
