//! Server host holding everything the HTTP exposure needs
//!
//! The builder assembles the host; the exposure turns it into a router.

use crate::core::auth::AuthProvider;
use crate::core::hyperlink::PublicUrl;
use crate::core::service::{ArticleService, UserDirectory};
use crate::server::registry::ResourceRegistry;
use std::sync::Arc;

/// Host context containing all server state
pub struct ServerHost {
    /// Article persistence
    pub articles: Arc<dyn ArticleService>,

    /// User accounts, read-only
    pub users: Arc<dyn UserDirectory>,

    /// Resolves request credentials
    pub auth: Arc<dyn AuthProvider>,

    /// Overrides the request-derived hyperlink base when set
    pub public_url: PublicUrl,

    /// Registered resources and their routes
    pub registry: ResourceRegistry,
}
