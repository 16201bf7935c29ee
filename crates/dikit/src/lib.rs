//! Dependency resolution registry
//!
//! This crate provides a service locator keyed by type, with optional tags
//! to choose between implementations and optional scopes to partition
//! instances. Resolved instances are cached weakly: the container never keeps
//! an instance alive on its own, and rebuilds it once every owner is gone.
//!
//! ## Quick Start
//!
//! ```rust
//! use dikit::Container;
//! use std::sync::Arc;
//!
//! struct SessionManager;
//!
//! let container = Container::new();
//! container.register(|| Arc::new(SessionManager));
//!
//! let sessions = container.resolve::<SessionManager>();
//! assert!(Arc::ptr_eq(&sessions, &container.resolve::<SessionManager>()));
//! ```
//!
//! See [`usage`] module for detailed usage examples.

pub mod cache;
pub mod config;
pub mod container;
pub mod error;
pub mod global;
pub mod inject;
pub mod key;
pub mod provider;
pub mod registration;
pub mod registry;
pub mod usage;

pub use cache::InstanceCache;
pub use config::{ContainerConfig, FailureMode};
pub use container::{Container, ContainerBuilder};
pub use error::{DIError, DIResult};
pub use global::{global, init_global};
pub use inject::Inject;
pub use key::{InstanceKey, RegistrationKey, TypeIdentity};
pub use provider::{ServiceProvider, ServiceProviderRegistry};
pub use registration::{
    list_discovered_registrations, register_all_discovered_services, ServiceRegistration,
};
pub use registry::{Factory, FactoryRegistry};

// Re-exported so component crates can submit registrations without a direct
// inventory dependency
pub use inventory;

/// Convenience macro for registering services
#[macro_export]
macro_rules! register_service {
    ($container:expr, $service_type:ty, tag = $tag:expr, $factory:expr) => {
        $container.register_tagged::<$service_type, _>($tag, $factory)
    };
    ($container:expr, $service_type:ty, $factory:expr) => {
        $container.register::<$service_type, _>($factory)
    };
}

/// Convenience macro for resolving services
#[macro_export]
macro_rules! resolve_service {
    ($container:expr, $service_type:ty, tag = $tag:expr, scope = $scope:expr) => {
        $container.resolve_with::<$service_type>(Some($tag), Some($scope))
    };
    ($container:expr, $service_type:ty, tag = $tag:expr) => {
        $container.resolve_tagged::<$service_type>($tag)
    };
    ($container:expr, $service_type:ty, scope = $scope:expr) => {
        $container.resolve_scoped::<$service_type>($scope)
    };
    ($container:expr, $service_type:ty) => {
        $container.resolve::<$service_type>()
    };
}
