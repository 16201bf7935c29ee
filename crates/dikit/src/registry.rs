//! Factory storage keyed by [`RegistrationKey`]

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::container::Container;
use crate::error::{DIError, DIResult};
use crate::key::RegistrationKey;

/// Constructor for instances of `T`
///
/// Factories receive the container that is resolving them so they can pull
/// their own dependencies.
pub type Factory<T> = Arc<dyn Fn(&Container) -> Arc<T> + Send + Sync>;

/// Thread-safe map of type-erased factories
///
/// Each entry is a boxed [`Factory<T>`] for the `T` named by its key.
#[derive(Default)]
pub struct FactoryRegistry {
    factories: RwLock<HashMap<RegistrationKey, Box<dyn Any + Send + Sync>>>,
}

impl FactoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a factory, replacing any previous one at the same key
    ///
    /// Returns `true` when a factory was replaced.
    pub fn register<T>(&self, key: RegistrationKey, factory: Factory<T>) -> bool
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let replaced = self
            .factories
            .write()
            .insert(key.clone(), Box::new(factory))
            .is_some();
        debug!(key = %key, replaced, "Registered factory");
        replaced
    }

    /// Remove the factory at `key`, if any
    ///
    /// Returns `true` when a factory was removed.
    pub fn unregister(&self, key: &RegistrationKey) -> bool {
        let removed = self.factories.write().remove(key).is_some();
        debug!(key = %key, removed, "Unregistered factory");
        removed
    }

    /// Clone out the factory at `key`
    ///
    /// The read lock is released before returning, so callers may invoke the
    /// factory while other threads register or resolve.
    pub fn lookup<T>(&self, key: &RegistrationKey) -> DIResult<Option<Factory<T>>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let factories = self.factories.read();
        let Some(entry) = factories.get(key) else {
            return Ok(None);
        };

        entry
            .downcast_ref::<Factory<T>>()
            .cloned()
            .map(Some)
            .ok_or_else(|| DIError::type_mismatch(std::any::type_name::<T>(), key))
    }

    pub fn contains(&self, key: &RegistrationKey) -> bool {
        self.factories.read().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.factories.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.factories.write().clear();
    }
}
