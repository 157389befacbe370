//! Core module containing the domain-independent building blocks of the API

pub mod auth;
pub mod entity;
pub mod error;
pub mod extractors;
pub mod hyperlink;
pub mod service;
pub mod slug;
pub mod validation;

pub use auth::{AuthContext, AuthPolicy, AuthProvider, BasicAuthProvider};
pub use entity::Entity;
pub use error::{BlogError, BlogResult};
pub use extractors::Identity;
pub use hyperlink::{Links, PublicUrl};
pub use service::{ArticleService, UserDirectory};
pub use validation::Validated;
