//! Resource registry for managing resource descriptors and their routes

use crate::api::AppState;
use axum::Router;

/// Trait that describes how to route one top-level resource
///
/// Each resource (articles, users) implements this to provide its routes
/// and the keys it is advertised under in the root directory.
pub trait ResourceDescriptor: Send + Sync {
    /// The collection path segment (e.g., "articles")
    fn name(&self) -> &str;

    /// Extra root directory keys pointing at the same collection
    fn aliases(&self) -> &[&'static str] {
        &[]
    }

    /// Build the routes for this resource
    ///
    /// Should return a Router with routes like:
    /// - GET /{name}/
    /// - GET /{name}/{key}/
    fn build_routes(&self) -> Router<AppState>;
}

/// Registry for all resources in the application
///
/// Registration order is kept so the root directory is stable.
#[derive(Default)]
pub struct ResourceRegistry {
    descriptors: Vec<Box<dyn ResourceDescriptor>>,
}

impl ResourceRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resource descriptor, replacing any with the same name
    pub fn register(&mut self, descriptor: Box<dyn ResourceDescriptor>) {
        self.descriptors.retain(|d| d.name() != descriptor.name());
        self.descriptors.push(descriptor);
    }

    /// Merge the routes of every registered resource
    pub fn build_routes(&self) -> Router<AppState> {
        self.descriptors
            .iter()
            .fold(Router::new(), |router, d| router.merge(d.build_routes()))
    }

    /// Root directory entries as (key, collection segment) pairs
    pub fn directory(&self) -> Vec<(String, String)> {
        let mut entries = Vec::new();
        for descriptor in &self.descriptors {
            entries.push((descriptor.name().to_string(), descriptor.name().to_string()));
            for alias in descriptor.aliases() {
                entries.push((alias.to_string(), descriptor.name().to_string()));
            }
        }
        entries
    }

    /// Get all registered resource names
    pub fn resource_names(&self) -> Vec<&str> {
        self.descriptors.iter().map(|d| d.name()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockDescriptor {
        name: &'static str,
        aliases: &'static [&'static str],
    }

    impl ResourceDescriptor for MockDescriptor {
        fn name(&self) -> &str {
            self.name
        }

        fn aliases(&self) -> &[&'static str] {
            self.aliases
        }

        fn build_routes(&self) -> Router<AppState> {
            Router::new()
        }
    }

    fn mock(name: &'static str, aliases: &'static [&'static str]) -> Box<MockDescriptor> {
        Box::new(MockDescriptor { name, aliases })
    }

    #[test]
    fn test_new_registry_is_empty() {
        let registry = ResourceRegistry::new();
        assert!(registry.resource_names().is_empty());
        assert!(registry.directory().is_empty());
    }

    #[test]
    fn test_register_keeps_order() {
        let mut registry = ResourceRegistry::new();
        registry.register(mock("users", &[]));
        registry.register(mock("articles", &[]));
        assert_eq!(registry.resource_names(), vec!["users", "articles"]);
    }

    #[test]
    fn test_register_duplicate_replaces() {
        let mut registry = ResourceRegistry::new();
        registry.register(mock("articles", &[]));
        registry.register(mock("articles", &["posts"]));
        assert_eq!(registry.resource_names().len(), 1);
        assert_eq!(registry.directory().len(), 2);
    }

    #[test]
    fn test_directory_includes_aliases() {
        let mut registry = ResourceRegistry::new();
        registry.register(mock("users", &[]));
        registry.register(mock("articles", &["snippets"]));

        assert_eq!(
            registry.directory(),
            vec![
                ("users".to_string(), "users".to_string()),
                ("articles".to_string(), "articles".to_string()),
                ("snippets".to_string(), "articles".to_string()),
            ]
        );
    }

    #[test]
    fn test_build_routes_empty_registry() {
        let registry = ResourceRegistry::new();
        let _router = registry.build_routes();
    }
}
