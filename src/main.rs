//! Blog API server
//!
//! Reads its configuration from the file named by `BLOG_CONFIG`
//! (default `blog.yaml`), seeds the configured users and serves the API.
//! Log verbosity follows `RUST_LOG` (default `info`).

use anyhow::Result;
use blog::config::{BlogConfig, StorageBackend};
use blog::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = BlogConfig::load()?;

    let mut builder = match config.storage.backend {
        StorageBackend::InMemory => {
            let users = InMemoryUserDirectory::from_seeds(&config.users)?;
            tracing::info!(users = config.users.len(), "using in-memory storage");
            ServerBuilder::new()
                .with_article_service(InMemoryArticleService::new())
                .with_user_directory(Arc::new(users))
        }
        StorageBackend::Postgres => postgres_builder(&config).await?,
    };

    if let Some(url) = &config.server.public_url {
        builder = builder.with_public_url(url);
    }

    builder.serve(&config.server.bind).await
}

#[cfg(feature = "postgres")]
async fn postgres_builder(config: &BlogConfig) -> Result<ServerBuilder> {
    let url = config
        .storage
        .database_url
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("storage.database_url is required for postgres"))?;

    let store = PostgresStore::connect(url).await?;
    store.seed_users(&config.users).await?;

    Ok(ServerBuilder::new()
        .with_article_service(store.clone())
        .with_user_directory(Arc::new(store)))
}

#[cfg(not(feature = "postgres"))]
async fn postgres_builder(_config: &BlogConfig) -> Result<ServerBuilder> {
    anyhow::bail!("the postgres backend requires building with --features postgres")
}
