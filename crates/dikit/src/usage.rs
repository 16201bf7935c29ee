//! # dikit Usage Guide
//!
//! ## Registering and Resolving
//!
//! ```rust
//! use dikit::Container;
//! use std::sync::Arc;
//!
//! struct Database {
//!     url: String,
//! }
//!
//! let container = Container::new();
//! container.register(|| {
//!     Arc::new(Database {
//!         url: "postgres://localhost".to_string(),
//!     })
//! });
//!
//! let db = container.resolve::<Database>();
//! assert_eq!(db.url, "postgres://localhost");
//!
//! // While `db` is alive, every resolve returns the same instance
//! assert!(Arc::ptr_eq(&db, &container.resolve::<Database>()));
//! ```
//!
//! ## Contracts and Implementations
//!
//! Register an implementation under a trait object and resolve the trait
//! without naming the concrete type.
//!
//! ```rust
//! use dikit::Container;
//! use std::sync::Arc;
//!
//! trait Clock: Send + Sync {
//!     fn now(&self) -> u64;
//! }
//!
//! struct FixedClock;
//!
//! impl Clock for FixedClock {
//!     fn now(&self) -> u64 {
//!         42
//!     }
//! }
//!
//! let container = Container::new();
//! container.register::<dyn Clock, _>(|| Arc::new(FixedClock) as Arc<dyn Clock>);
//!
//! assert_eq!(container.resolve::<dyn Clock>().now(), 42);
//! ```
//!
//! ## Tags and Scopes
//!
//! A tag selects between several factories for the same type. A scope
//! partitions instances built from one factory: each scope gets its own.
//!
//! ```rust
//! use dikit::Container;
//! use std::sync::Arc;
//!
//! struct Connection(&'static str);
//!
//! let container = Container::new();
//! container.register_tagged("primary", || Arc::new(Connection("primary")));
//! container.register_tagged("replica", || Arc::new(Connection("replica")));
//!
//! let primary = container.resolve_tagged::<Connection>("primary");
//! let replica = container.resolve_tagged::<Connection>("replica");
//! assert_eq!(primary.0, "primary");
//! assert_eq!(replica.0, "replica");
//!
//! let left = container.resolve_with::<Connection>(Some("primary"), Some("left-pane"));
//! let right = container.resolve_with::<Connection>(Some("primary"), Some("right-pane"));
//! assert!(!Arc::ptr_eq(&left, &right));
//! ```
//!
//! ## Instance Lifetime
//!
//! The container only observes what it builds. Once every owner drops an
//! instance, the next resolve builds a new one, so a scope tied to a screen
//! needs no teardown call.
//!
//! ```rust
//! use dikit::Container;
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! struct ViewModel;
//!
//! let built = Arc::new(AtomicUsize::new(0));
//! let container = Container::new();
//! let counter = Arc::clone(&built);
//! container.register(move || {
//!     counter.fetch_add(1, Ordering::SeqCst);
//!     Arc::new(ViewModel)
//! });
//!
//! let screen = container.resolve_scoped::<ViewModel>("settings");
//! drop(screen);
//! let _screen = container.resolve_scoped::<ViewModel>("settings");
//! assert_eq!(built.load(Ordering::SeqCst), 2);
//! ```
//!
//! ## Handling Missing Registrations
//!
//! `resolve*` treats a missing registration as a wiring defect and fails fast
//! (panic by default, or abort with `DIKIT_FAILURE_MODE=abort`). Use
//! `try_resolve*` when the caller can recover.
//!
//! ```rust
//! use dikit::{Container, DIError};
//!
//! struct Missing;
//!
//! let container = Container::new();
//! let result = container.try_resolve::<Missing>();
//! assert!(matches!(result, Err(DIError::UnregisteredDependency { .. })));
//! ```
//!
//! ## Best Practices
//!
//! 1. **Register at startup** so wiring defects surface immediately
//! 2. **Hold the `Arc`** for as long as the instance should be shared
//! 3. **Use scopes** for instances tied to a screen, request or session
//! 4. **Use `register_instance`** for values that must outlive every owner
