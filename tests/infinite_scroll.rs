//! Integration tests for the infinite scroll trigger, run on a paused clock

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use pin_gallery::scroll::{attach, scroll_channel, LoadFailure, ScrollMetrics, ScrollOptions};

fn near_bottom() -> ScrollMetrics {
    ScrollMetrics::new(3000.0, 2000.0, 800.0)
}

fn far_from_bottom() -> ScrollMetrics {
    ScrollMetrics::new(3000.0, 100.0, 800.0)
}

type LoadFuture = Pin<Box<dyn Future<Output = Result<(), String>> + Send>>;

/// Loader that counts invocations and takes `duration` to finish
fn counting_loader(
    calls: Arc<AtomicUsize>,
    duration: Duration,
) -> impl Fn() -> LoadFuture + Send + Sync + 'static {
    move || -> LoadFuture {
        let calls = Arc::clone(&calls);
        Box::pin(async move {
            calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(duration).await;
            Ok(())
        })
    }
}

#[tokio::test(start_paused = true)]
async fn rapid_triggers_run_a_single_load() {
    let (tx, rx) = scroll_channel();
    let calls = Arc::new(AtomicUsize::new(0));
    let attachment = attach(
        rx,
        counting_loader(Arc::clone(&calls), Duration::from_millis(100)),
        ScrollOptions::default(),
    );

    tx.send(near_bottom()).unwrap();
    tx.send(near_bottom()).unwrap();

    // Debounce fires at 500ms, load runs until 600ms
    tokio::time::sleep(Duration::from_millis(550)).await;
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(attachment.is_loading());

    // Ignored while the first load is in flight
    tx.send(near_bottom()).unwrap();

    tokio::time::sleep(Duration::from_millis(700)).await;
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(attachment.load_count(), 1);
    assert!(!attachment.is_loading());
}

#[tokio::test(start_paused = true)]
async fn loader_waits_for_debounce() {
    let (tx, rx) = scroll_channel();
    let calls = Arc::new(AtomicUsize::new(0));
    let _attachment = attach(
        rx,
        counting_loader(Arc::clone(&calls), Duration::from_millis(10)),
        ScrollOptions {
            threshold: 1.5,
            debounce: Duration::from_millis(300),
        },
    );

    tx.send(near_bottom()).unwrap();

    tokio::time::sleep(Duration::from_millis(250)).await;
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn scrolling_again_after_a_load_triggers_the_next_page() {
    let (tx, rx) = scroll_channel();
    let calls = Arc::new(AtomicUsize::new(0));
    let attachment = attach(
        rx,
        counting_loader(Arc::clone(&calls), Duration::from_millis(100)),
        ScrollOptions::default(),
    );

    tx.send(near_bottom()).unwrap();
    tokio::time::sleep(Duration::from_millis(700)).await;
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    tx.send(near_bottom()).unwrap();
    tokio::time::sleep(Duration::from_millis(700)).await;
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(attachment.load_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn events_far_from_bottom_never_load() {
    let (tx, rx) = scroll_channel();
    let calls = Arc::new(AtomicUsize::new(0));
    let attachment = attach(
        rx,
        counting_loader(Arc::clone(&calls), Duration::from_millis(10)),
        ScrollOptions::default(),
    );

    for _ in 0..20 {
        tx.send(far_from_bottom()).unwrap();
    }
    tokio::time::sleep(Duration::from_secs(2)).await;

    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(!attachment.is_loading());
}

#[tokio::test(start_paused = true)]
async fn detach_cancels_pending_load() {
    let (tx, rx) = scroll_channel();
    let calls = Arc::new(AtomicUsize::new(0));
    let attachment = attach(
        rx,
        counting_loader(Arc::clone(&calls), Duration::from_millis(10)),
        ScrollOptions::default(),
    );

    tx.send(near_bottom()).unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;
    attachment.detach();

    // Scroll conditions keep being met after detach
    let _ = tx.send(near_bottom());
    tokio::time::sleep(Duration::from_secs(2)).await;
    let _ = tx.send(near_bottom());
    tokio::time::sleep(Duration::from_secs(2)).await;

    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(attachment.is_detached());
}

#[tokio::test(start_paused = true)]
async fn detach_is_idempotent() {
    let (_tx, rx) = scroll_channel();
    let calls = Arc::new(AtomicUsize::new(0));
    let attachment = attach(
        rx,
        counting_loader(Arc::clone(&calls), Duration::from_millis(10)),
        ScrollOptions::default(),
    );

    attachment.detach();
    attachment.detach();
    drop(attachment);
}

#[tokio::test(start_paused = true)]
async fn failed_load_clears_guard_and_is_reported() {
    let (tx, rx) = scroll_channel();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let mut attachment = attach(
        rx,
        move || {
            let counter = Arc::clone(&counter);
            async move {
                let n = counter.fetch_add(1, Ordering::SeqCst);
                if n == 0 {
                    Err(format!("page {} unavailable", n + 1))
                } else {
                    Ok(())
                }
            }
        },
        ScrollOptions::default(),
    );

    tx.send(near_bottom()).unwrap();
    tokio::time::sleep(Duration::from_millis(600)).await;

    match attachment.try_next_failure() {
        Some(LoadFailure::Failed(message)) => assert_eq!(message, "page 1 unavailable"),
        other => panic!("Expected a loader failure, got: {other:?}"),
    }
    assert!(!attachment.is_loading());

    // A new scroll retries
    tx.send(near_bottom()).unwrap();
    tokio::time::sleep(Duration::from_millis(600)).await;
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert!(attachment.try_next_failure().is_none());
}

#[tokio::test(start_paused = true)]
async fn panicking_loader_clears_guard() {
    let (tx, rx) = scroll_channel();
    let mut attachment = attach(
        rx,
        || async {
            if true {
                panic!("loader blew up");
            }
            Ok::<(), String>(())
        },
        ScrollOptions::default(),
    );

    tx.send(near_bottom()).unwrap();
    tokio::time::sleep(Duration::from_millis(600)).await;

    match attachment.try_next_failure() {
        Some(LoadFailure::Panicked(message)) => assert!(message.contains("loader blew up")),
        other => panic!("Expected a panic report, got: {other:?}"),
    }
    assert!(!attachment.is_loading());
    assert_eq!(attachment.load_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn closed_source_still_runs_armed_load() {
    let (tx, rx) = scroll_channel();
    let calls = Arc::new(AtomicUsize::new(0));
    let _attachment = attach(
        rx,
        counting_loader(Arc::clone(&calls), Duration::from_millis(10)),
        ScrollOptions::default(),
    );

    tx.send(near_bottom()).unwrap();
    drop(tx);

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn failures_end_after_detach() {
    let (_tx, rx) = scroll_channel();
    let calls = Arc::new(AtomicUsize::new(0));
    let mut attachment = attach(
        rx,
        counting_loader(Arc::clone(&calls), Duration::from_millis(10)),
        ScrollOptions::default(),
    );

    attachment.detach();
    assert!(attachment.next_failure().await.is_none());
}

#[tokio::test(start_paused = true)]
async fn detach_while_armed_resets_loading() {
    let (tx, rx) = scroll_channel();
    let calls = Arc::new(AtomicUsize::new(0));
    let attachment = attach(
        rx,
        counting_loader(Arc::clone(&calls), Duration::from_millis(10)),
        ScrollOptions::default(),
    );

    tx.send(near_bottom()).unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(attachment.is_loading());

    attachment.detach();
    assert!(!attachment.is_loading());

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert!(!attachment.is_loading());
    assert_eq!(attachment.load_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn detach_during_load_keeps_loading_until_it_settles() {
    let (tx, rx) = scroll_channel();
    let calls = Arc::new(AtomicUsize::new(0));
    let attachment = attach(
        rx,
        counting_loader(Arc::clone(&calls), Duration::from_millis(300)),
        ScrollOptions::default(),
    );

    tx.send(near_bottom()).unwrap();
    // Debounce fires at 500ms, load runs until 800ms
    tokio::time::sleep(Duration::from_millis(600)).await;
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    attachment.detach();
    assert!(attachment.is_loading());

    tokio::time::sleep(Duration::from_millis(400)).await;
    assert!(!attachment.is_loading());
}
