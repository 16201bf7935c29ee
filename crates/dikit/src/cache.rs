//! Weakly held instance cache keyed by [`InstanceKey`]
//!
//! The cache never owns what it stores. Each entry is a [`Weak`] observer of
//! an instance owned by whoever resolved it; once the last strong owner drops
//! it, the entry reads as a miss and the next resolve builds a fresh instance.

use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use tracing::trace;

use crate::error::{DIError, DIResult};
use crate::key::InstanceKey;

/// Type-erased weak observer
trait WeakEntry: Send + Sync {
    fn is_alive(&self) -> bool;
    fn as_any(&self) -> &dyn Any;
}

impl<T> WeakEntry for Weak<T>
where
    T: ?Sized + Send + Sync + 'static,
{
    fn is_alive(&self) -> bool {
        self.strong_count() > 0
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[derive(Default)]
pub struct InstanceCache {
    entries: RwLock<HashMap<InstanceKey, Box<dyn WeakEntry>>>,
}

impl InstanceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the live instance at `key`
    ///
    /// A dead entry is dropped and reported as absent.
    pub fn get<T>(&self, key: &InstanceKey) -> DIResult<Option<Arc<T>>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        {
            let entries = self.entries.read();
            let Some(entry) = entries.get(key) else {
                return Ok(None);
            };

            let weak = entry
                .as_any()
                .downcast_ref::<Weak<T>>()
                .ok_or_else(|| DIError::type_mismatch(std::any::type_name::<T>(), key))?;

            if let Some(instance) = weak.upgrade() {
                return Ok(Some(instance));
            }
        }

        // Another thread may have republished the key since the read lock
        // was released.
        let mut entries = self.entries.write();
        if entries.get(key).is_some_and(|entry| !entry.is_alive()) {
            entries.remove(key);
            trace!(key = %key, "Dropped dead cache entry");
        }
        Ok(None)
    }

    /// Store a weak observer of `instance`, replacing any previous entry
    pub fn put<T>(&self, key: InstanceKey, instance: &Arc<T>)
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.entries.write().insert(key, Box::new(Arc::downgrade(instance)));
    }

    pub fn remove(&self, key: &InstanceKey) {
        self.entries.write().remove(key);
    }

    /// Number of entries, dead ones included
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of entries whose instance is still alive
    pub fn live_count(&self) -> usize {
        self.entries
            .read()
            .values()
            .filter(|entry| entry.is_alive())
            .count()
    }

    /// Remove every dead entry, returning how many were dropped
    pub fn prune(&self) -> usize {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, entry| entry.is_alive());
        before - entries.len()
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }
}
