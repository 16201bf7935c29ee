//! Shared fixtures for the workspace end-to-end tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use dikit::{Container, Inject, ServiceProvider};

/// Install a test-friendly tracing subscriber; later calls are ignored
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Counts how many times a factory ran
#[derive(Debug, Default)]
pub struct BuildCounter(AtomicUsize);

impl BuildCounter {
    pub fn bump(&self) -> usize {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug)]
pub struct Database {
    pub build: usize,
    pub url: String,
}

/// Reads from the database injected on first use
pub struct UserRepository {
    pub database: Inject<Database>,
}

impl UserRepository {
    pub fn describe(&self, user: &str) -> String {
        format!("{user}@{}", self.database.url)
    }
}

/// Registers the storage fixtures with one shared build counter
pub struct StorageProvider {
    pub url: &'static str,
    pub counter: Arc<BuildCounter>,
}

impl ServiceProvider for StorageProvider {
    fn name(&self) -> &'static str {
        "storage"
    }

    fn priority(&self) -> u32 {
        10
    }

    fn register(&self, container: &Container) {
        let url = self.url;
        let counter = Arc::clone(&self.counter);
        container.register(move || {
            Arc::new(Database {
                build: counter.bump(),
                url: url.to_string(),
            })
        });
    }
}
