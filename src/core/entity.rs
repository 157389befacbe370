//! Entity trait shared by the resources exposed over the API

/// Base trait for every resource the API exposes.
///
/// The plural resource name is the collection path segment
/// (`/articles/`) and [`Entity::lookup_key`] is the path segment that
/// addresses one instance (`/articles/{lookup_key}/`).
pub trait Entity: Clone + Send + Sync + 'static {
    /// The plural resource name used in URLs (e.g., "articles", "users")
    fn resource_name() -> &'static str;

    /// Public identifier of this instance in URLs
    fn lookup_key(&self) -> String;
}
