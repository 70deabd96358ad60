//! Integration tests for the background execution bridge.
//!
//! Async tests run on the single-threaded runtime provided by
//! `#[core_async::test]`; tests of the blocking entry points are plain
//! `#[test]` functions because those build their own runtime.

use core_async::bridge::{run_in_background, run_in_background_blocking, run_scoped, run_to_drain};
use core_async::pool::{PoolConfig, WorkerPool};
use core_async::scope::TaskScope;
use core_async::{sync, task, time, Error};
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Debug, PartialEq, Eq)]
struct ParseFailure(&'static str);

impl fmt::Display for ParseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "could not parse {}", self.0)
    }
}

impl std::error::Error for ParseFailure {}

fn small_pool(size: usize) -> WorkerPool {
    WorkerPool::new(PoolConfig::default().with_size(size).with_thread_name("test-bg"))
        .expect("pool builds")
}

fn parse_port(input: &'static str) -> Result<u16, ParseFailure> {
    input.parse().map_err(|_| ParseFailure(input))
}

#[core_async::test]
async fn test_background_returns_value() {
    let pool = small_pool(2);
    let value = run_in_background(&pool, || parse_port("8080")).await.unwrap();
    assert_eq!(value, 8080);
    assert_eq!(pool.submitted(), 1);
}

#[core_async::test]
async fn test_background_error_propagates() {
    let pool = small_pool(2);
    let err = run_in_background(&pool, || parse_port("eighty")).await.unwrap_err();

    let inner = err.task_error().expect("task error");
    assert_eq!(
        inner.downcast_ref::<ParseFailure>(),
        Some(&ParseFailure("eighty"))
    );
    assert!(err.to_string().contains("could not parse eighty"));
}

#[core_async::test]
async fn test_background_anyhow_error_propagates() {
    let pool = small_pool(1);
    let err = run_in_background(&pool, || -> anyhow::Result<()> {
        anyhow::bail!("disk unavailable")
    })
    .await
    .unwrap_err();

    assert_eq!(err.task_error().unwrap().to_string(), "disk unavailable");
}

#[core_async::test]
async fn test_background_panic_is_reported() {
    let pool = small_pool(1);
    let err = pool
        .spawn(|| -> u8 { panic!("worker exploded") })
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Panicked(ref msg) if msg == "worker exploded"));
}

#[core_async::test]
async fn test_background_does_not_block_runtime() {
    let pool = small_pool(1);
    let ticked = Arc::new(AtomicBool::new(false));

    let flag = ticked.clone();
    let ticker = task::spawn(async move {
        time::sleep(time::Duration::from_millis(5)).await;
        flag.store(true, Ordering::SeqCst);
    });

    let saw_tick = run_in_background(&pool, {
        let ticked = ticked.clone();
        move || {
            let deadline = std::time::Instant::now() + std::time::Duration::from_secs(2);
            while !ticked.load(Ordering::SeqCst) && std::time::Instant::now() < deadline {
                std::thread::sleep(std::time::Duration::from_millis(1));
            }
            Ok::<_, std::io::Error>(ticked.load(Ordering::SeqCst))
        }
    })
    .await
    .unwrap();

    ticker.await.unwrap();
    assert!(saw_tick, "runtime stalled while the callable was running");
}

#[core_async::test]
async fn test_shared_pool_serves_many_submissions() {
    let pool = Arc::new(small_pool(4));
    let mut handles = Vec::new();

    for i in 0..16u64 {
        let pool = Arc::clone(&pool);
        handles.push(task::spawn(async move {
            run_in_background(&pool, move || Ok::<_, std::io::Error>(i * 2)).await
        }));
    }

    let mut total = 0;
    for handle in handles {
        total += handle.await.unwrap().unwrap();
    }

    assert_eq!(total, (0..16u64).map(|i| i * 2).sum::<u64>());
    assert_eq!(pool.submitted(), 16);
    assert_eq!(pool.completed(), 16);
}

#[core_async::test]
async fn test_concurrency_bounded_by_pool_size() {
    let pool = small_pool(2);
    let running = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let running = running.clone();
            let peak = peak.clone();
            pool.spawn(move || {
                let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                std::thread::sleep(std::time::Duration::from_millis(20));
                running.fetch_sub(1, Ordering::SeqCst);
            })
        })
        .collect();

    for result in futures::future::join_all(handles).await {
        result.unwrap();
    }

    assert!(peak.load(Ordering::SeqCst) <= 2);
    assert_eq!(pool.active(), 0);
}

#[core_async::test]
async fn test_blocking_variant_rejected_inside_runtime() {
    let pool = small_pool(1);
    let result = run_in_background_blocking(&pool, || Ok::<_, std::io::Error>(1));
    assert!(matches!(
        result,
        Err(Error::NestedRuntime {
            operation: "run_in_background_blocking"
        })
    ));
    assert_eq!(pool.submitted(), 0);
}

#[test]
fn test_blocking_and_async_variants_agree() {
    let pool = small_pool(2);

    let blocking_ok = run_in_background_blocking(&pool, || parse_port("443")).unwrap();
    let async_ok = core_async::runtime::block_on(run_in_background(&pool, || parse_port("443")))
        .unwrap();
    assert_eq!(blocking_ok, async_ok);

    let blocking_err = run_in_background_blocking(&pool, || parse_port("x")).unwrap_err();
    let async_err = core_async::runtime::block_on(run_in_background(&pool, || parse_port("x")))
        .unwrap_err();
    assert_eq!(
        blocking_err.task_error().unwrap().downcast_ref::<ParseFailure>(),
        async_err.task_error().unwrap().downcast_ref::<ParseFailure>()
    );
}

#[test]
fn test_drain_waits_for_fire_and_forget() {
    let counter = Arc::new(AtomicUsize::new(0));

    let spawned = counter.clone();
    run_to_drain(async move {
        task::spawn(async move {
            time::sleep(time::Duration::from_millis(30)).await;
            spawned.fetch_add(1, Ordering::SeqCst);
        });
    })
    .unwrap();

    assert_eq!(counter.load(Ordering::SeqCst), 1);
}

#[test]
fn test_drain_swallows_spawned_errors() {
    let output = run_to_drain(async {
        task::spawn(async {
            time::sleep(time::Duration::from_millis(5)).await;
            panic!("fire-and-forget failure");
        });
        TaskScope::current()
            .expect("root runs in a scope")
            .spawn_detached(async { Err::<(), _>("detached failure") });
        "root finished"
    })
    .unwrap();

    assert_eq!(output, "root finished");
}

#[test]
fn test_task_draining_its_own_scope_fails_fast() {
    let outcome = run_to_drain(async {
        let handle = task::spawn(async {
            let own = TaskScope::current().expect("task runs in a scope");
            time::timeout(time::Duration::from_secs(5), own.drain()).await
        });
        handle.await.expect("task completes")
    })
    .unwrap();

    let drained = outcome.expect("drain returns before the deadline");
    assert!(matches!(drained, Err(Error::SelfDrain)));
}

#[test]
fn test_drain_without_spawned_tasks_returns_promptly() {
    let start = time::Instant::now();
    let output = run_to_drain(async {
        let scope = TaskScope::current().expect("root runs in a scope");
        assert!(scope.is_empty());
        "no children"
    })
    .unwrap();

    assert_eq!(output, "no children");
    assert!(start.elapsed() < time::Duration::from_secs(1));
}

#[test]
fn test_drain_includes_grandchildren() {
    let counter = Arc::new(AtomicUsize::new(0));

    let outer = counter.clone();
    run_to_drain(async move {
        task::spawn(async move {
            let inner = outer.clone();
            task::spawn(async move {
                time::sleep(time::Duration::from_millis(20)).await;
                inner.fetch_add(1, Ordering::SeqCst);
            });
            outer.fetch_add(1, Ordering::SeqCst);
        });
    })
    .unwrap();

    assert_eq!(counter.load(Ordering::SeqCst), 2);
}

#[test]
fn test_drain_waits_for_background_work_started_by_task() {
    let pool = Arc::new(small_pool(1));
    let finished = Arc::new(AtomicBool::new(false));

    let task_pool = Arc::clone(&pool);
    let flag = finished.clone();
    run_to_drain(async move {
        task::spawn(async move {
            let result = run_in_background(&task_pool, || {
                std::thread::sleep(std::time::Duration::from_millis(20));
                Ok::<_, std::io::Error>(())
            })
            .await;
            flag.store(result.is_ok(), Ordering::SeqCst);
        });
    })
    .unwrap();

    assert!(finished.load(Ordering::SeqCst));
}

#[core_async::test]
async fn test_scoped_drain_is_isolated_per_root() {
    let slow_done = Arc::new(AtomicBool::new(false));

    // A task outside the scope under test must not hold up its drain.
    let (release_tx, release_rx) = sync::oneshot::channel::<()>();
    let slow_flag = slow_done.clone();
    let unrelated = task::spawn(async move {
        let _ = release_rx.await;
        slow_flag.store(true, Ordering::SeqCst);
    });

    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    run_scoped(async move {
        task::spawn(async move {
            counter.fetch_add(1, Ordering::SeqCst);
        });
    })
    .await;

    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert!(!slow_done.load(Ordering::SeqCst));

    release_tx.send(()).unwrap();
    unrelated.await.unwrap();
    assert!(slow_done.load(Ordering::SeqCst));
}

#[core_async::test]
async fn test_timeout_races_background_work() {
    let pool = small_pool(1);
    let handle = pool.spawn(|| std::thread::sleep(std::time::Duration::from_millis(200)));

    let result = time::timeout(time::Duration::from_millis(10), handle).await;
    assert!(result.is_err());
}

#[core_async::test]
async fn test_mutex_shared_with_scoped_tasks() {
    let mutex = Arc::new(sync::Mutex::new(0));

    let shared = mutex.clone();
    run_scoped(async move {
        for _ in 0..10 {
            let shared = shared.clone();
            task::spawn(async move {
                *shared.lock().await += 1;
            });
        }
    })
    .await;

    assert_eq!(*mutex.lock().await, 10);
}

static MAIN_CHILDREN: AtomicUsize = AtomicUsize::new(0);

#[core_async::main]
async fn drained_entry_point() -> &'static str {
    for _ in 0..3 {
        task::spawn(async {
            time::sleep(time::Duration::from_millis(10)).await;
            MAIN_CHILDREN.fetch_add(1, Ordering::SeqCst);
        });
    }
    "entry finished"
}

#[test]
fn test_main_macro_drains_spawned_tasks() {
    assert_eq!(drained_entry_point(), "entry finished");
    assert_eq!(MAIN_CHILDREN.load(Ordering::SeqCst), 3);
}
