//! Lazily injected fields
//!
//! [`Inject<T>`] is a field wrapper that resolves its value the first time it
//! is read and keeps it for the lifetime of the field. Later reads never go
//! back to the container.
//!
//! ```rust
//! use dikit::{Container, Inject};
//! use std::sync::Arc;
//!
//! struct Clock;
//!
//! struct Screen {
//!     clock: Inject<Clock>,
//! }
//!
//! let container = Arc::new(Container::new());
//! container.register(|| Arc::new(Clock));
//!
//! let screen = Screen {
//!     clock: Inject::in_container(Arc::clone(&container)),
//! };
//! assert!(!screen.clock.is_resolved());
//! let _clock: &Clock = &screen.clock;
//! assert!(screen.clock.is_resolved());
//! ```

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::container::Container;
use crate::error::DIResult;
use crate::global::global;

#[derive(Clone)]
enum Source {
    Global,
    Shared(Arc<Container>),
}

/// A field resolved from a container on first read
pub struct Inject<T: ?Sized> {
    tag: Option<String>,
    scope: Option<String>,
    source: Source,
    value: OnceCell<Arc<T>>,
}

impl<T> Inject<T>
where
    T: ?Sized + Send + Sync + 'static,
{
    /// Untagged, unscoped field resolved from the process-wide container
    pub fn new() -> Self {
        Self::with(None, None)
    }

    pub fn tagged(tag: impl Into<String>) -> Self {
        Self::with(Some(tag.into()), None)
    }

    pub fn scoped(scope: impl Into<String>) -> Self {
        Self::with(None, Some(scope.into()))
    }

    pub fn with(tag: Option<String>, scope: Option<String>) -> Self {
        Self {
            tag,
            scope,
            source: Source::Global,
            value: OnceCell::new(),
        }
    }

    /// Untagged, unscoped field resolved from `container`
    pub fn in_container(container: Arc<Container>) -> Self {
        Self::with_container(None, None, container)
    }

    /// Field resolved from `container` instead of the process-wide one
    pub fn with_container(
        tag: Option<String>,
        scope: Option<String>,
        container: Arc<Container>,
    ) -> Self {
        Self {
            tag,
            scope,
            source: Source::Shared(container),
            value: OnceCell::new(),
        }
    }

    /// The injected value, resolved on first call
    ///
    /// # Panics
    ///
    /// Fails fast like [`Container::resolve_with`] when resolution fails.
    pub fn get(&self) -> Arc<T> {
        Arc::clone(self.value_ref())
    }

    /// The injected value, or the resolution error
    ///
    /// A failed attempt leaves the field unresolved.
    pub fn try_get(&self) -> DIResult<Arc<T>> {
        self.value
            .get_or_try_init(|| {
                self.container()
                    .try_resolve_with(self.tag.as_deref(), self.scope.as_deref())
            })
            .map(Arc::clone)
    }

    /// Overwrite the field without touching the container
    pub fn set(&mut self, value: Arc<T>) {
        self.value = OnceCell::with_value(value);
    }

    pub fn is_resolved(&self) -> bool {
        self.value.get().is_some()
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    fn value_ref(&self) -> &Arc<T> {
        self.value.get_or_init(|| {
            self.container()
                .resolve_with(self.tag.as_deref(), self.scope.as_deref())
        })
    }

    fn container(&self) -> &Container {
        match &self.source {
            Source::Global => global(),
            Source::Shared(container) => container.as_ref(),
        }
    }
}

impl<T> Default for Inject<T>
where
    T: ?Sized + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<Arc<T>> for Inject<T>
where
    T: ?Sized + Send + Sync + 'static,
{
    fn from(value: Arc<T>) -> Self {
        let mut inject = Self::new();
        inject.set(value);
        inject
    }
}

impl<T> Deref for Inject<T>
where
    T: ?Sized + Send + Sync + 'static,
{
    type Target = T;

    fn deref(&self) -> &T {
        self.value_ref()
    }
}

impl<T: ?Sized> Clone for Inject<T> {
    fn clone(&self) -> Self {
        Self {
            tag: self.tag.clone(),
            scope: self.scope.clone(),
            source: self.source.clone(),
            value: self.value.clone(),
        }
    }
}

impl<T: ?Sized> fmt::Debug for Inject<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Inject")
            .field("type", &std::any::type_name::<T>())
            .field("tag", &self.tag)
            .field("scope", &self.scope)
            .field("resolved", &self.value.get().is_some())
            .finish()
    }
}
