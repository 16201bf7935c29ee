//! Resolution from many tokio tasks sharing one container

use std::sync::Arc;
use std::time::Duration;

use dikit::{Container, ContainerBuilder, ContainerConfig, Inject};
use dikit_integration_tests::{init_test_tracing, BuildCounter, Database, UserRepository};

fn container_with_slow_database(counter: &Arc<BuildCounter>) -> Arc<Container> {
    let counter = Arc::clone(counter);
    let container = ContainerBuilder::with_config(ContainerConfig::default().with_label("async"))
        .register(move || {
            // Give racing tasks time to pile up on the same key
            std::thread::sleep(Duration::from_millis(20));
            Arc::new(Database {
                build: counter.bump(),
                url: "postgres://async".to_string(),
            })
        })
        .build();
    Arc::new(container)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_tasks_share_one_instance() {
    init_test_tracing();
    let counter = Arc::new(BuildCounter::default());
    let container = container_with_slow_database(&counter);

    let handles: Vec<_> = (0..32)
        .map(|_| {
            let container = Arc::clone(&container);
            tokio::task::spawn_blocking(move || container.resolve::<Database>())
        })
        .collect();

    let mut resolved = Vec::with_capacity(handles.len());
    for handle in handles {
        resolved.push(handle.await.expect("task panicked"));
    }

    assert_eq!(counter.get(), 1);
    assert!(resolved.iter().all(|db| Arc::ptr_eq(db, &resolved[0])));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_per_request_scopes_across_tasks() {
    init_test_tracing();
    let counter = Arc::new(BuildCounter::default());
    let container = container_with_slow_database(&counter);

    let handles: Vec<_> = (0..8)
        .map(|request| {
            let container = Arc::clone(&container);
            tokio::spawn(async move {
                let scope = format!("request-{}", request % 4);
                let db = container.resolve_scoped::<Database>(&scope);
                tokio::time::sleep(Duration::from_millis(50)).await;
                (scope, db)
            })
        })
        .collect();

    let mut results = Vec::new();
    for handle in handles {
        results.push(handle.await.expect("task panicked"));
    }

    for (scope, db) in &results {
        for (other_scope, other) in &results {
            assert_eq!(scope == other_scope, Arc::ptr_eq(db, other));
        }
    }
    assert_eq!(counter.get(), 4);
}

#[tokio::test]
async fn test_injected_field_moves_between_tasks() {
    init_test_tracing();
    let counter = Arc::new(BuildCounter::default());
    let container = container_with_slow_database(&counter);

    let repository = UserRepository {
        database: Inject::in_container(Arc::clone(&container)),
    };

    let described = tokio::spawn(async move {
        let line = repository.describe("grace");
        (line, repository)
    })
    .await
    .expect("task panicked");

    let (line, repository) = described;
    assert_eq!(line, "grace@postgres://async");
    assert!(repository.database.is_resolved());
    assert_eq!(counter.get(), 1);
}
