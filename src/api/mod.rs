//! HTTP surface of the blog: state, handlers and serializers

pub mod articles;
pub mod root;
pub mod serializers;
pub mod users;

use crate::core::auth::AuthProvider;
use crate::core::hyperlink::PublicUrl;
use crate::core::service::{ArticleService, UserDirectory};
use axum::extract::FromRef;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub articles: Arc<dyn ArticleService>,
    pub users: Arc<dyn UserDirectory>,
    pub auth: Arc<dyn AuthProvider>,
    pub public_url: PublicUrl,
    /// Root directory entries: key -> collection path segment
    pub directory: Arc<Vec<(String, String)>>,
}

impl FromRef<AppState> for Arc<dyn AuthProvider> {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}

impl FromRef<AppState> for PublicUrl {
    fn from_ref(state: &AppState) -> Self {
        state.public_url.clone()
    }
}
