//! Auto-discovery service registration using inventory crate
//!
//! Any crate linked into the binary can submit registrations with
//! `inventory::submit!`; they are collected and applied to a container at
//! startup.
//!
//! ## Usage
//!
//! In a component crate:
//!
//! ```rust,ignore
//! use dikit::{Container, ServiceRegistration};
//! use std::sync::Arc;
//!
//! inventory::submit! {
//!     ServiceRegistration::new("storage", |container| {
//!         container.register(|| Arc::new(StorageManager::new()));
//!     })
//! }
//! ```
//!
//! At startup:
//!
//! ```rust,ignore
//! dikit::register_all_discovered_services(dikit::global());
//! ```

use tracing::{debug, info};

use crate::container::Container;

/// A registration descriptor collected via inventory.
pub struct ServiceRegistration {
    /// Name of the service group (e.g., "storage", "network")
    pub name: &'static str,

    /// Registers the group's factories with the container
    pub register_fn: fn(&Container),

    /// Priority for registration order (lower = earlier, default = 100)
    pub priority: u32,
}

impl ServiceRegistration {
    /// Create a new service registration with default priority
    pub const fn new(name: &'static str, register_fn: fn(&Container)) -> Self {
        Self::with_priority(name, register_fn, 100)
    }

    /// Create a new service registration with custom priority
    pub const fn with_priority(name: &'static str, register_fn: fn(&Container), priority: u32) -> Self {
        Self {
            name,
            register_fn,
            priority,
        }
    }
}

inventory::collect!(ServiceRegistration);

/// Apply every discovered registration to the container.
///
/// Registrations run in priority order (lower value first). Returns how many
/// were applied.
pub fn register_all_discovered_services(container: &Container) -> usize {
    let mut registrations: Vec<&ServiceRegistration> =
        inventory::iter::<ServiceRegistration>().collect();

    // Stable sort keeps link order for equal priorities
    registrations.sort_by_key(|r| r.priority);

    info!(
        "Discovered {} service registrations via inventory",
        registrations.len()
    );

    for registration in &registrations {
        debug!(
            "Registering services for '{}' (priority: {})",
            registration.name, registration.priority
        );
        (registration.register_fn)(container);
    }

    registrations.len()
}

/// List all discovered service registration names.
pub fn list_discovered_registrations() -> Vec<&'static str> {
    inventory::iter::<ServiceRegistration>()
        .map(|r| r.name)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    struct DiscoveredService;

    inventory::submit! {
        ServiceRegistration::new("test_service", |container| {
            container.register(|| Arc::new(DiscoveredService));
        })
    }

    #[test]
    fn test_discovered_registrations_include_test() {
        let names = list_discovered_registrations();
        assert!(
            names.contains(&"test_service"),
            "Should discover test_service registration"
        );
    }

    #[test]
    fn test_register_all_discovered() {
        let container = Container::new();
        let applied = register_all_discovered_services(&container);

        assert!(applied >= 1);
        assert!(container.is_registered::<DiscoveredService>());
    }
}
