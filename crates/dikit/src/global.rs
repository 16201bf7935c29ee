//! The process-wide container and free-function access to it
//!
//! The global container is created on first use. Its settings come from the
//! `DIKIT_*` environment unless [`init_global`] ran first. Invalid settings
//! are fatal.

use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::error;

use crate::config::ContainerConfig;
use crate::container::Container;
use crate::error::{DIError, DIResult};

static GLOBAL_CONTAINER: OnceCell<Container> = OnceCell::new();

/// The process-wide container
///
/// # Panics
///
/// Panics on first use when the `DIKIT_*` environment holds invalid settings.
/// Nothing is initialized in that case, so a later call tries again.
pub fn global() -> &'static Container {
    GLOBAL_CONTAINER.get_or_init(|| Container::with_config(config_from_env()))
}

fn config_from_env() -> ContainerConfig {
    match ContainerConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!(error = %err, "Invalid container settings in environment");
            panic!("{err}");
        }
    }
}

/// Create the process-wide container with explicit settings
///
/// Fails if the container already exists, including when something resolved
/// from it before this call.
pub fn init_global(config: ContainerConfig) -> DIResult<&'static Container> {
    GLOBAL_CONTAINER
        .set(Container::with_config(config))
        .map_err(|_| DIError::GlobalAlreadyInitialized)?;
    Ok(global())
}

pub fn register<T, F>(factory: F)
where
    T: ?Sized + Send + Sync + 'static,
    F: Fn() -> Arc<T> + Send + Sync + 'static,
{
    global().register(factory);
}

pub fn register_tagged<T, F>(tag: &str, factory: F)
where
    T: ?Sized + Send + Sync + 'static,
    F: Fn() -> Arc<T> + Send + Sync + 'static,
{
    global().register_tagged(tag, factory);
}

pub fn unregister<T>()
where
    T: ?Sized + 'static,
{
    global().unregister::<T>();
}

pub fn unregister_tagged<T>(tag: &str)
where
    T: ?Sized + 'static,
{
    global().unregister_tagged::<T>(tag);
}

pub fn resolve<T>() -> Arc<T>
where
    T: ?Sized + Send + Sync + 'static,
{
    global().resolve()
}

pub fn resolve_with<T>(tag: Option<&str>, scope: Option<&str>) -> Arc<T>
where
    T: ?Sized + Send + Sync + 'static,
{
    global().resolve_with(tag, scope)
}
