//! Infinite scroll load trigger
//!
//! Listens to a stream of scroll position snapshots and runs a caller-supplied
//! async loader when the viewport gets close to the bottom of the content.
//! A trigger sets the loading guard and arms a debounce timer; the loader runs
//! when the timer fires. Scroll events are ignored while the guard is set, and
//! the guard is cleared only once the loader settles, so loads never overlap.

use std::fmt::Display;
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle};
use tokio::time::Instant;

/// Viewport snapshot delivered on every scroll event
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
    /// Total height of the scrollable content
    pub scroll_height: f64,
    /// Current vertical offset
    pub scroll_top: f64,
    /// Height of the visible area
    pub viewport_height: f64,
}

impl ScrollMetrics {
    pub fn new(scroll_height: f64, scroll_top: f64, viewport_height: f64) -> Self {
        Self {
            scroll_height,
            scroll_top,
            viewport_height,
        }
    }

    /// Remaining content is within `threshold` viewports
    pub fn near_bottom(&self, threshold: f64) -> bool {
        self.scroll_height - self.scroll_top <= self.viewport_height * threshold
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ScrollOptions {
    /// Trigger distance in viewport heights
    pub threshold: f64,
    /// Delay between the trigger and the loader call
    pub debounce: Duration,
}

impl Default for ScrollOptions {
    fn default() -> Self {
        Self {
            threshold: 1.5,
            debounce: Duration::from_millis(500),
        }
    }
}

/// A loader that did not complete normally
#[derive(Debug)]
pub enum LoadFailure<E> {
    /// The loader returned an error
    Failed(E),
    /// The loader panicked
    Panicked(String),
}

/// Channel the event source pushes scroll snapshots into
pub fn scroll_channel() -> (
    mpsc::UnboundedSender<ScrollMetrics>,
    mpsc::UnboundedReceiver<ScrollMetrics>,
) {
    mpsc::unbounded_channel()
}

#[derive(Debug, Default)]
struct LoadState {
    is_loading: AtomicBool,
    /// Set from the loader call until the load settles
    in_flight: AtomicBool,
    detached: AtomicBool,
    loads: AtomicUsize,
}

/// Clears the loading guard when dropped, whatever way the load ended
struct LoadingGuard(Arc<LoadState>);

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.0.in_flight.store(false, Ordering::SeqCst);
        self.0.is_loading.store(false, Ordering::SeqCst);
    }
}

/// Active infinite-scroll registration.
///
/// Dropping it detaches the listener.
pub struct ScrollAttachment<E> {
    state: Arc<LoadState>,
    listener: Mutex<Option<JoinHandle<()>>>,
    failures: mpsc::UnboundedReceiver<LoadFailure<E>>,
}

impl<E> ScrollAttachment<E> {
    /// Whether a load has been triggered and not yet settled
    pub fn is_loading(&self) -> bool {
        self.state.is_loading.load(Ordering::SeqCst)
    }

    /// Number of loader invocations so far
    pub fn load_count(&self) -> usize {
        self.state.loads.load(Ordering::SeqCst)
    }

    pub fn is_detached(&self) -> bool {
        self.state.detached.load(Ordering::SeqCst)
    }

    /// Stop listening and cancel any pending debounce timer.
    ///
    /// Safe to call repeatedly. A load already running is left to finish and
    /// clears the guard itself; otherwise the guard is cleared here.
    pub fn detach(&self) {
        self.state.detached.store(true, Ordering::SeqCst);
        let task = self
            .listener
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(task) = task {
            task.abort();
            log::debug!("Infinite scroll listener detached");
        }
        if !self.state.in_flight.load(Ordering::SeqCst) {
            self.state.is_loading.store(false, Ordering::SeqCst);
        }
    }

    /// Next loader failure, waiting until one arrives.
    ///
    /// Returns `None` once the attachment is detached and every running
    /// load has finished.
    pub async fn next_failure(&mut self) -> Option<LoadFailure<E>> {
        self.failures.recv().await
    }

    /// Next loader failure if one is already queued
    pub fn try_next_failure(&mut self) -> Option<LoadFailure<E>> {
        self.failures.try_recv().ok()
    }
}

impl<E> Drop for ScrollAttachment<E> {
    fn drop(&mut self) {
        self.detach();
    }
}

/// Start listening to `events` and invoke `loader` near the bottom.
///
/// Must be called from within a tokio runtime.
pub fn attach<F, Fut, E>(
    events: mpsc::UnboundedReceiver<ScrollMetrics>,
    loader: F,
    options: ScrollOptions,
) -> ScrollAttachment<E>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), E>> + Send + 'static,
    E: Display + Send + 'static,
{
    let state = Arc::new(LoadState::default());
    let (failure_tx, failure_rx) = mpsc::unbounded_channel();

    let listener = tokio::spawn(listen(
        events,
        Arc::new(loader),
        options,
        Arc::clone(&state),
        failure_tx,
    ));

    ScrollAttachment {
        state,
        listener: Mutex::new(Some(listener)),
        failures: failure_rx,
    }
}

async fn listen<F, Fut, E>(
    mut events: mpsc::UnboundedReceiver<ScrollMetrics>,
    loader: Arc<F>,
    options: ScrollOptions,
    state: Arc<LoadState>,
    failures: mpsc::UnboundedSender<LoadFailure<E>>,
) where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), E>> + Send + 'static,
    E: Display + Send + 'static,
{
    let timer = tokio::time::sleep(Duration::ZERO);
    tokio::pin!(timer);
    let mut armed = false;

    loop {
        tokio::select! {
            event = events.recv() => {
                let Some(metrics) = event else {
                    // Source closed; honour a trigger that was already armed
                    if armed {
                        (&mut timer).await;
                        spawn_load(&loader, &state, &failures);
                    }
                    break;
                };

                if state.is_loading.load(Ordering::SeqCst) {
                    continue;
                }

                if metrics.near_bottom(options.threshold) {
                    state.is_loading.store(true, Ordering::SeqCst);
                    timer.as_mut().reset(Instant::now() + options.debounce);
                    armed = true;
                }
            }
            () = &mut timer, if armed => {
                armed = false;
                spawn_load(&loader, &state, &failures);
            }
        }
    }
}

fn spawn_load<F, Fut, E>(
    loader: &Arc<F>,
    state: &Arc<LoadState>,
    failures: &mpsc::UnboundedSender<LoadFailure<E>>,
) where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), E>> + Send + 'static,
    E: Display + Send + 'static,
{
    let guard = LoadingGuard(Arc::clone(state));
    // Marked before the detach check so a concurrent detach sees one or the other
    state.in_flight.store(true, Ordering::SeqCst);
    if state.detached.load(Ordering::SeqCst) {
        return;
    }

    state.loads.fetch_add(1, Ordering::SeqCst);
    let load = loader();
    let failures = failures.clone();

    tokio::spawn(async move {
        let _guard = guard;
        match tokio::spawn(load).await {
            Ok(Ok(())) => log::debug!("Infinite scroll load completed"),
            Ok(Err(e)) => {
                log::warn!("Infinite scroll load failed: {}", e);
                let _ = failures.send(LoadFailure::Failed(e));
            }
            Err(join_err) => {
                let message = panic_message(join_err);
                log::warn!("Infinite scroll load panicked: {}", message);
                let _ = failures.send(LoadFailure::Panicked(message));
            }
        }
    });
}

fn panic_message(err: JoinError) -> String {
    if !err.is_panic() {
        return err.to_string();
    }
    let payload = err.into_panic();
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "loader panicked".to_string()
    }
}
