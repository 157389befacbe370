//! # Blog API
//!
//! A hyperlinked blog publishing backend: authenticated users write
//! articles, everybody can read them, and only the owner of an article may
//! change or delete it.
//!
//! ## Features
//!
//! - **Slug addressing**: articles live at `/articles/{slug}/`, the slug is
//!   derived from the title unless the author picks one
//! - **Ownership**: writes need HTTP Basic credentials, updates and deletes
//!   need the caller to own the article
//! - **Hyperlinked JSON**: every representation carries absolute URLs
//! - **Pluggable storage**: in-memory by default, PostgreSQL behind the
//!   `postgres` feature
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use blog::prelude::*;
//!
//! let users = InMemoryUserDirectory::new();
//! users.add_user("alice", "wonderland")?;
//!
//! ServerBuilder::new()
//!     .with_article_service(InMemoryArticleService::new())
//!     .with_user_directory(Arc::new(users))
//!     .serve("127.0.0.1:8000")
//!     .await?;
//! ```

pub mod api;
pub mod config;
pub mod core;
pub mod entities;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        auth::{AuthContext, AuthPolicy, AuthProvider, BasicAuthProvider},
        entity::Entity,
        error::{BlogError, BlogResult},
        hyperlink::Links,
        service::{ArticleService, UserDirectory},
    };

    // === Entities ===
    pub use crate::entities::{Article, ArticleChanges, NewArticle, User, UserId};

    // === API ===
    pub use crate::api::{
        AppState,
        serializers::{ArticleInput, ArticlePatch, ArticleRepresentation, UserRepresentation},
    };

    // === Storage ===
    pub use crate::storage::{InMemoryArticleService, InMemoryUserDirectory};
    #[cfg(feature = "postgres")]
    pub use crate::storage::PostgresStore;

    // === Config ===
    pub use crate::config::{BlogConfig, StorageBackend, UserSeed};

    // === Server ===
    pub use crate::server::ServerBuilder;

    // === External dependencies ===
    pub use anyhow::Result;
    pub use std::sync::Arc;
}
