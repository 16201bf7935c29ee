//! Concurrent registration and resolution

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc, Barrier};
use std::thread;
use std::time::Duration;

use dikit::*;

struct SlowService {
    id: usize,
}

fn slow_factory(counter: &Arc<AtomicUsize>) -> impl Fn() -> Arc<SlowService> + Send + Sync {
    let counter = Arc::clone(counter);
    move || {
        let id = counter.fetch_add(1, Ordering::SeqCst) + 1;
        // Widen the window in which racing callers could double-construct
        thread::sleep(Duration::from_millis(20));
        Arc::new(SlowService { id })
    }
}

#[test]
fn test_exactly_once_construction_under_race() {
    let container = Arc::new(Container::new());
    let counter = Arc::new(AtomicUsize::new(0));
    container.register(slow_factory(&counter));

    let thread_count = 16;
    let barrier = Arc::new(Barrier::new(thread_count));
    let (tx, rx) = mpsc::channel();

    for _ in 0..thread_count {
        let container = Arc::clone(&container);
        let barrier = Arc::clone(&barrier);
        let tx = tx.clone();

        thread::spawn(move || {
            barrier.wait();
            let resolved = container.resolve::<SlowService>();
            tx.send(resolved).unwrap();
        });
    }
    drop(tx);

    let results: Vec<Arc<SlowService>> = rx.iter().collect();
    assert_eq!(results.len(), thread_count);
    assert_eq!(counter.load(Ordering::SeqCst), 1);
    for result in &results[1..] {
        assert!(Arc::ptr_eq(&results[0], result));
    }
    assert_eq!(results[0].id, 1);
}

#[test]
fn test_racing_scopes_build_once_per_scope() {
    let container = Arc::new(Container::new());
    let counter = Arc::new(AtomicUsize::new(0));
    container.register(slow_factory(&counter));

    let scopes = ["a", "b", "c", "d"];
    let per_scope = 6;
    let barrier = Arc::new(Barrier::new(scopes.len() * per_scope));

    let handles: Vec<_> = scopes
        .iter()
        .flat_map(|scope| std::iter::repeat(*scope).take(per_scope))
        .map(|scope| {
            let container = Arc::clone(&container);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                (scope, container.resolve_scoped::<SlowService>(scope))
            })
        })
        .collect();

    let results: Vec<(&str, Arc<SlowService>)> =
        handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(counter.load(Ordering::SeqCst), scopes.len());
    for scope in scopes {
        let mut same_scope = results.iter().filter(|(s, _)| *s == scope).map(|(_, r)| r);
        let first = same_scope.next().unwrap();
        assert!(same_scope.all(|r| Arc::ptr_eq(first, r)));
    }
}

#[test]
fn test_factory_resolving_dependencies_under_race() {
    struct Config;
    struct Service {
        config: Arc<Config>,
    }

    let container = Arc::new(Container::new());
    container.register(|| Arc::new(Config));
    container.register_with(|c: &Container| {
        thread::sleep(Duration::from_millis(5));
        Arc::new(Service {
            config: c.resolve(),
        })
    });

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let container = Arc::clone(&container);
            thread::spawn(move || container.resolve::<Service>())
        })
        .collect();

    let services: Vec<Arc<Service>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let config = container.resolve::<Config>();
    for service in &services {
        assert!(Arc::ptr_eq(&service.config, &config));
        assert!(Arc::ptr_eq(service, &services[0]));
    }
}

#[test]
fn test_concurrent_register_and_resolve() {
    struct Tagged(usize);

    let container = Arc::new(Container::new());
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let container = Arc::clone(&container);
            thread::spawn(move || {
                let tag = format!("worker-{i}");
                container.register_tagged(&tag, move || Arc::new(Tagged(i)));
                let resolved = container.resolve_tagged::<Tagged>(&tag);
                container.unregister_tagged::<Tagged>(&tag);
                resolved.0
            })
        })
        .collect();

    let mut values: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    values.sort_unstable();
    assert_eq!(values, (0..8).collect::<Vec<_>>());
    assert_eq!(container.factory_count(), 0);
}

#[test]
fn test_panicking_factory_does_not_wedge_the_key() {
    struct Flaky;

    let container = Arc::new(Container::new());
    let attempts = Arc::new(AtomicUsize::new(0));
    let attempts_clone = Arc::clone(&attempts);
    container.register(move || {
        if attempts_clone.fetch_add(1, Ordering::SeqCst) == 0 {
            panic!("first construction fails");
        }
        Arc::new(Flaky)
    });

    let first = {
        let container = Arc::clone(&container);
        thread::spawn(move || {
            let _ = container.resolve::<Flaky>();
        })
        .join()
    };
    assert!(first.is_err());

    let _flaky = container.resolve::<Flaky>();
    assert_eq!(attempts.load(Ordering::SeqCst), 2);
}
