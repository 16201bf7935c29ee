//! The dependency container
//!
//! [`Container`] composes the [`FactoryRegistry`] and the [`InstanceCache`].
//! Resolution checks the cache first, then builds from the factory registered
//! under the scope-stripped key and caches the result weakly.
//!
//! First-time construction is serialized per instance key: concurrent callers
//! racing on the same key wait on that key's gate, so the factory runs once
//! and every caller receives the same `Arc`. Factories run without holding any
//! registry or cache lock, so they can resolve their own dependencies.
//!
//! That guarantee only lasts while someone owns the instance. The cache is
//! weak: if the caller that built it drops its `Arc` before a waiter re-checks
//! the cache, the waiter finds a dead entry and runs the factory again. Racing
//! callers that discard what they resolve may therefore see several builds.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, error, info, trace, warn};

use crate::cache::InstanceCache;
use crate::config::{ContainerConfig, FailureMode};
use crate::error::{DIError, DIResult};
use crate::key::{InstanceKey, RegistrationKey};
use crate::registry::{Factory, FactoryRegistry};

type Gate = Arc<Mutex<()>>;

/// Dependency container with weakly cached instances
pub struct Container {
    config: ContainerConfig,
    factories: FactoryRegistry,
    instances: InstanceCache,
    gates: Mutex<HashMap<InstanceKey, Gate>>,
}

impl Container {
    /// Create an empty container with default settings
    pub fn new() -> Self {
        Self::with_config(ContainerConfig::default())
    }

    pub fn with_config(config: ContainerConfig) -> Self {
        Self {
            config,
            factories: FactoryRegistry::new(),
            instances: InstanceCache::new(),
            gates: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    // ========================================================================
    // Registration
    // ========================================================================

    /// Register a zero-argument factory for `T`
    pub fn register<T, F>(&self, factory: F)
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn() -> Arc<T> + Send + Sync + 'static,
    {
        self.register_tagged_with::<T, _>(None, move |_| factory());
    }

    /// Register a zero-argument factory for `T` under `tag`
    pub fn register_tagged<T, F>(&self, tag: &str, factory: F)
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn() -> Arc<T> + Send + Sync + 'static,
    {
        self.register_tagged_with::<T, _>(Some(tag), move |_| factory());
    }

    /// Register a factory that receives the resolving container
    pub fn register_with<T, F>(&self, factory: F)
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&Container) -> Arc<T> + Send + Sync + 'static,
    {
        self.register_tagged_with::<T, _>(None, factory);
    }

    /// Register a container-aware factory for `T` under an optional tag
    ///
    /// Any factory previously registered at the same type and tag is replaced.
    /// Instances it already produced stay cached while they are alive.
    pub fn register_tagged_with<T, F>(&self, tag: Option<&str>, factory: F)
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&Container) -> Arc<T> + Send + Sync + 'static,
    {
        let key = RegistrationKey::of::<T>(tag);
        let factory: Factory<T> = Arc::new(factory);
        if self.factories.register(key, factory) {
            warn!(
                container = %self.config.label,
                service = std::any::type_name::<T>(),
                tag,
                "Replaced existing factory"
            );
        }
    }

    /// Register an existing instance as a singleton
    ///
    /// The registry holds a strong reference, so the instance lives as long
    /// as the registration does.
    pub fn register_instance<T>(&self, tag: Option<&str>, instance: Arc<T>)
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.register_tagged_with::<T, _>(tag, move |_| Arc::clone(&instance));
    }

    /// Remove the untagged factory for `T`; a no-op when none is registered
    pub fn unregister<T>(&self)
    where
        T: ?Sized + 'static,
    {
        self.factories.unregister(&RegistrationKey::of::<T>(None));
    }

    pub fn unregister_tagged<T>(&self, tag: &str)
    where
        T: ?Sized + 'static,
    {
        self.factories.unregister(&RegistrationKey::of::<T>(Some(tag)));
    }

    // ========================================================================
    // Resolution
    // ========================================================================

    /// Resolve the untagged, unscoped instance of `T`
    ///
    /// # Panics
    ///
    /// Fails fast per [`FailureMode`] when no factory is registered.
    pub fn resolve<T>(&self) -> Arc<T>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.resolve_with(None, None)
    }

    pub fn resolve_tagged<T>(&self, tag: &str) -> Arc<T>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.resolve_with(Some(tag), None)
    }

    pub fn resolve_scoped<T>(&self, scope: &str) -> Arc<T>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.resolve_with(None, Some(scope))
    }

    /// Resolve `T` for the given tag and scope, failing fast on error
    pub fn resolve_with<T>(&self, tag: Option<&str>, scope: Option<&str>) -> Arc<T>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        match self.try_resolve_with(tag, scope) {
            Ok(instance) => instance,
            Err(err) => self.fail(err),
        }
    }

    pub fn try_resolve<T>(&self) -> DIResult<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.try_resolve_with(None, None)
    }

    /// Resolve `T` for the given tag and scope
    ///
    /// Returns the live cached instance if there is one; otherwise builds one
    /// from the factory registered for `T` and `tag` and caches it under
    /// `scope`.
    pub fn try_resolve_with<T>(&self, tag: Option<&str>, scope: Option<&str>) -> DIResult<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let key = InstanceKey::of::<T>(tag, scope);

        if let Some(instance) = self.instances.get::<T>(&key)? {
            trace!(container = %self.config.label, key = %key, "Resolved from cache");
            return Ok(instance);
        }

        let gate = self.enter_gate(&key);
        let result = {
            let _guard = gate.lock();
            self.build_or_reuse::<T>(&key, tag, scope)
        };
        self.leave_gate(&key, gate);
        result
    }

    fn build_or_reuse<T>(
        &self,
        key: &InstanceKey,
        tag: Option<&str>,
        scope: Option<&str>,
    ) -> DIResult<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        // Another caller may have built it while we waited on the gate
        if let Some(instance) = self.instances.get::<T>(key)? {
            return Ok(instance);
        }

        let factory = self
            .factories
            .lookup::<T>(key.registration_key())?
            .ok_or_else(|| DIError::unregistered(std::any::type_name::<T>(), tag, scope))?;

        let instance = factory(self);
        self.instances.put(key.clone(), &instance);
        debug!(container = %self.config.label, key = %key, "Constructed dependency");
        Ok(instance)
    }

    fn enter_gate(&self, key: &InstanceKey) -> Gate {
        let mut gates = self.gates.lock();
        Arc::clone(gates.entry(key.clone()).or_default())
    }

    fn leave_gate(&self, key: &InstanceKey, gate: Gate) {
        let mut gates = self.gates.lock();
        // Only the map and this caller hold it: nobody else is waiting
        if Arc::strong_count(&gate) == 2 {
            gates.remove(key);
        }
    }

    fn fail(&self, err: DIError) -> ! {
        error!(
            container = %self.config.label,
            error = %err,
            "Unrecoverable dependency resolution failure"
        );
        match self.config.failure_mode {
            FailureMode::Panic => panic!("{err}"),
            FailureMode::Abort => std::process::abort(),
        }
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    /// Check if an untagged factory is registered for `T`
    pub fn is_registered<T>(&self) -> bool
    where
        T: ?Sized + 'static,
    {
        self.factories.contains(&RegistrationKey::of::<T>(None))
    }

    pub fn is_registered_tagged<T>(&self, tag: &str) -> bool
    where
        T: ?Sized + 'static,
    {
        self.factories.contains(&RegistrationKey::of::<T>(Some(tag)))
    }

    /// Get the number of registered factories
    pub fn factory_count(&self) -> usize {
        self.factories.len()
    }

    /// Get the number of cached instances that are still alive
    pub fn cached_count(&self) -> usize {
        self.instances.live_count()
    }

    /// Drop cache entries whose instances are gone
    pub fn prune_cache(&self) -> usize {
        self.instances.prune()
    }

    /// Remove every factory and cache entry
    pub fn clear(&self) {
        self.factories.clear();
        self.instances.clear();
        info!(container = %self.config.label, "Cleared all dependencies from container");
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Container")
            .field("config", &self.config)
            .field("factories", &self.factories.len())
            .field("cached", &self.instances.len())
            .finish()
    }
}

/// Builder for configuring a [`Container`]
pub struct ContainerBuilder {
    container: Container,
}

impl ContainerBuilder {
    pub fn new() -> Self {
        Self::with_config(ContainerConfig::default())
    }

    pub fn with_config(config: ContainerConfig) -> Self {
        Self {
            container: Container::with_config(config),
        }
    }

    pub fn register<T, F>(self, factory: F) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn() -> Arc<T> + Send + Sync + 'static,
    {
        self.container.register(factory);
        self
    }

    pub fn register_tagged<T, F>(self, tag: &str, factory: F) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn() -> Arc<T> + Send + Sync + 'static,
    {
        self.container.register_tagged(tag, factory);
        self
    }

    pub fn register_with<T, F>(self, factory: F) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&Container) -> Arc<T> + Send + Sync + 'static,
    {
        self.container.register_with(factory);
        self
    }

    pub fn register_instance<T>(self, instance: Arc<T>) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.container.register_instance(None, instance);
        self
    }

    pub fn build(self) -> Container {
        self.container
    }
}

impl Default for ContainerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
