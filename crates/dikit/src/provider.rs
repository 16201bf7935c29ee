//! Service Provider trait for grouping registrations
//!
//! A `ServiceProvider` bundles the registrations of one component so the
//! application can wire everything in one place.
//!
//! ## Usage
//!
//! ```rust
//! use dikit::{Container, ServiceProvider, ServiceProviderRegistry};
//! use std::sync::Arc;
//!
//! struct Storage;
//!
//! struct StorageServiceProvider;
//!
//! impl ServiceProvider for StorageServiceProvider {
//!     fn name(&self) -> &'static str {
//!         "storage"
//!     }
//!
//!     fn register(&self, container: &Container) {
//!         container.register(|| Arc::new(Storage));
//!     }
//! }
//!
//! let mut registry = ServiceProviderRegistry::new();
//! registry.add(StorageServiceProvider);
//!
//! let container = Container::new();
//! registry.register_all(&container);
//! assert!(container.is_registered::<Storage>());
//! ```

use std::sync::Arc;

use crate::container::Container;

/// Trait for types that register a group of factories with a container
pub trait ServiceProvider: Send + Sync {
    /// Returns the name of this service provider.
    ///
    /// Used for logging and debugging.
    fn name(&self) -> &'static str;

    /// Returns the priority of this service provider.
    ///
    /// Lower values are registered first. Default is 100.
    fn priority(&self) -> u32 {
        100
    }

    /// Register factories with the container.
    fn register(&self, container: &Container);
}

/// Registry for managing service providers.
///
/// Applies providers in priority order. When two providers register the same
/// type and tag, the later one wins.
#[derive(Default)]
pub struct ServiceProviderRegistry {
    providers: Vec<Arc<dyn ServiceProvider>>,
}

impl ServiceProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a service provider to the registry.
    pub fn add<P: ServiceProvider + 'static>(&mut self, provider: P) -> &mut Self {
        self.providers.push(Arc::new(provider));
        self
    }

    pub fn add_shared(&mut self, provider: Arc<dyn ServiceProvider>) -> &mut Self {
        self.providers.push(provider);
        self
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// List provider names in registration order
    pub fn provider_names(&self) -> Vec<&'static str> {
        self.sorted().iter().map(|p| p.name()).collect()
    }

    /// Register all providers with the container.
    pub fn register_all(&self, container: &Container) {
        let sorted = self.sorted();

        tracing::info!("Registering {} service providers", sorted.len());

        for provider in sorted {
            tracing::debug!(
                "Registering provider '{}' (priority: {})",
                provider.name(),
                provider.priority()
            );
            provider.register(container);
        }
    }

    // Stable, so equal priorities keep insertion order
    fn sorted(&self) -> Vec<&Arc<dyn ServiceProvider>> {
        let mut sorted: Vec<_> = self.providers.iter().collect();
        sorted.sort_by_key(|p| p.priority());
        sorted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Marker(&'static str);

    struct TestProvider {
        name: &'static str,
        priority: u32,
    }

    impl ServiceProvider for TestProvider {
        fn name(&self) -> &'static str {
            self.name
        }

        fn priority(&self) -> u32 {
            self.priority
        }

        fn register(&self, container: &Container) {
            let name = self.name;
            container.register(move || Arc::new(Marker(name)));
        }
    }

    #[test]
    fn test_provider_registry() {
        let mut registry = ServiceProviderRegistry::new();
        registry
            .add(TestProvider {
                name: "test1",
                priority: 100,
            })
            .add(TestProvider {
                name: "test2",
                priority: 50,
            });

        assert_eq!(registry.len(), 2);
        assert!(!registry.is_empty());
        assert_eq!(registry.provider_names(), vec!["test2", "test1"]);
    }

    #[test]
    fn test_priority_ordering_last_registration_wins() {
        let mut registry = ServiceProviderRegistry::new();
        registry.add(TestProvider {
            name: "low",
            priority: 200,
        });
        registry.add(TestProvider {
            name: "high",
            priority: 10,
        });
        registry.add_shared(Arc::new(TestProvider {
            name: "medium",
            priority: 100,
        }));

        let container = Container::new();
        registry.register_all(&container);

        // "low" has the largest priority value, so it registers last
        assert_eq!(container.resolve::<Marker>().0, "low");
    }
}
