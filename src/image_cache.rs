//! In-memory TTL cache in front of the Unsplash category endpoint
//!
//! Each (category, count, page) triple is fetched at most once per TTL window.
//! Failed fetches are retried with linear backoff, and when the remote side
//! stays unavailable the caller gets images from the bundled fallback pool.
//! `fetch_images` never returns an error.

use crate::config::CacheConfig;
use crate::error::{GalleryError, Result};
use crate::fallback::{fallback_images, DEFAULT_CATEGORY};
use crate::models::ImageDescriptor;
use crate::random::{RandomSource, XorShiftRng};
use crate::unsplash::UnsplashClient;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;

/// A cached page of images
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub key: String,
    pub payload: Vec<ImageDescriptor>,
    pub created_at: Instant,
    pub page: u32,
}

impl CacheEntry {
    /// Valid for reads while younger than `ttl`
    pub fn is_fresh(&self, ttl: Duration, now: Instant) -> bool {
        now.saturating_duration_since(self.created_at) < ttl
    }
}

type Store = Arc<Mutex<HashMap<String, CacheEntry>>>;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Remove entries older than `ttl`, returning how many were dropped
fn purge_expired(store: &Mutex<HashMap<String, CacheEntry>>, ttl: Duration) -> usize {
    let now = Instant::now();
    let mut entries = lock(store);
    let before = entries.len();
    entries.retain(|_, entry| entry.is_fresh(ttl, now));
    before - entries.len()
}

/// Category image cache with retry and fallback degradation
pub struct ImageFetchCache {
    client: UnsplashClient,
    config: CacheConfig,
    store: Store,
    rng: Mutex<Box<dyn RandomSource + Send>>,
    sweeper: Mutex<Option<JoinHandle<()>>>,
    network_attempts: AtomicUsize,
}

impl ImageFetchCache {
    /// Create a cache with its own empty store
    pub fn new(client: UnsplashClient, config: CacheConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            client,
            config,
            store: Arc::new(Mutex::new(HashMap::new())),
            rng: Mutex::new(Box::new(XorShiftRng::from_clock())),
            sweeper: Mutex::new(None),
            network_attempts: AtomicUsize::new(0),
        })
    }

    /// Replace the random source used for fallback selection
    pub fn with_rng(self, rng: impl RandomSource + Send + 'static) -> Self {
        *lock(&self.rng) = Box::new(rng);
        self
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Composite key for a query
    pub fn cache_key(category: &str, count: usize, page: u32) -> String {
        format!("{}-{}-{}", category, count, page)
    }

    /// Number of HTTP requests issued so far, retries included
    pub fn network_attempts(&self) -> usize {
        self.network_attempts.load(Ordering::Relaxed)
    }

    /// Number of stored entries, expired ones included until swept
    pub fn len(&self) -> usize {
        lock(&self.store).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fetch a page of images for a category.
    ///
    /// `count` is capped at `max_count`, `page` 0 is treated as page 1 and an
    /// empty category uses the default category.
    pub async fn fetch_images(
        &self,
        category: &str,
        count: usize,
        page: u32,
    ) -> Vec<ImageDescriptor> {
        let category = match category.trim() {
            "" => DEFAULT_CATEGORY,
            trimmed => trimmed,
        };
        let count = count.min(self.config.max_count);
        let page = page.max(1);

        if count == 0 {
            return Vec::new();
        }

        let key = Self::cache_key(category, count, page);
        if let Some(payload) = self.get_fresh(&key, page) {
            log::debug!("Image cache hit for {}", key);
            return payload;
        }

        log::info!(
            "Image cache miss for {}, fetching {} images (page {})",
            key,
            count,
            page
        );

        match self.fetch_remote(category, count).await {
            Ok(images) if images.is_empty() => {
                log::warn!("Using fallback images for {}: empty response", category);
                self.fallback(category, count)
            }
            Ok(mut images) if images.len() < count => {
                // Short pages are topped up and left uncached
                log::warn!(
                    "Got {} of {} images for {}, filling from fallback pool",
                    images.len(),
                    count,
                    category
                );
                let missing = count - images.len();
                images.extend(self.fallback(category, missing));
                images
            }
            Ok(mut images) => {
                images.truncate(count);
                self.insert(key, page, images.clone());
                images
            }
            Err(e) => {
                log::warn!("Using fallback images for {}: {}", category, e);
                self.fallback(category, count)
            }
        }
    }

    fn fallback(&self, category: &str, count: usize) -> Vec<ImageDescriptor> {
        let mut rng = lock(&self.rng);
        fallback_images(category, count, &mut **rng)
    }

    /// Remote fetch with an explicit attempt loop
    async fn fetch_remote(&self, category: &str, count: usize) -> Result<Vec<ImageDescriptor>> {
        let mut attempt = 1;
        loop {
            self.network_attempts.fetch_add(1, Ordering::Relaxed);

            let err = match self.client.random_photos(category, count).await {
                Ok(photos) => {
                    return Ok(photos.iter().map(|p| p.to_descriptor(category)).collect());
                }
                Err(e) => e,
            };

            if !is_retryable(&err) || attempt >= self.config.max_attempts {
                return Err(err);
            }

            let delay = self.config.backoff(attempt);
            log::warn!(
                "Fetch for {} failed (attempt {}/{}): {}, retrying in {:?}",
                category,
                attempt,
                self.config.max_attempts,
                err,
                delay
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }

    fn get_fresh(&self, key: &str, page: u32) -> Option<Vec<ImageDescriptor>> {
        let entries = lock(&self.store);
        let entry = entries.get(key)?;
        if entry.page == page && entry.is_fresh(self.config.ttl, Instant::now()) {
            Some(entry.payload.clone())
        } else {
            None
        }
    }

    fn insert(&self, key: String, page: u32, payload: Vec<ImageDescriptor>) {
        let entry = CacheEntry {
            key: key.clone(),
            payload,
            created_at: Instant::now(),
            page,
        };
        lock(&self.store).insert(key, entry);
    }

    /// Drop expired entries now, returning how many were removed
    pub fn sweep_expired(&self) -> usize {
        let removed = purge_expired(&self.store, self.config.ttl);
        if removed > 0 {
            log::debug!("Swept {} expired image cache entries", removed);
        }
        removed
    }

    /// Start the periodic sweeper on the current tokio runtime.
    ///
    /// Returns false when called outside a runtime. Calling it again while a
    /// sweeper is running is a no-op.
    pub fn start_sweeper(&self) -> bool {
        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                log::warn!("Cannot start image cache sweeper: {}", e);
                return false;
            }
        };

        let mut slot = lock(&self.sweeper);
        if slot.as_ref().is_some_and(|task| !task.is_finished()) {
            return true;
        }

        let store = Arc::clone(&self.store);
        let ttl = self.config.ttl;
        let period = self.config.sweep_interval;

        *slot = Some(handle.spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // First tick completes immediately
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let removed = purge_expired(&store, ttl);
                if removed > 0 {
                    log::debug!("Swept {} expired image cache entries", removed);
                }
            }
        }));
        log::debug!("Image cache sweeper running every {:?}", period);
        true
    }

    /// Whether the background sweeper is active
    pub fn sweeper_running(&self) -> bool {
        lock(&self.sweeper)
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    /// Stop the sweeper and drop every entry
    pub fn dispose(&self) {
        if let Some(task) = lock(&self.sweeper).take() {
            task.abort();
        }
        lock(&self.store).clear();
    }
}

impl Drop for ImageFetchCache {
    fn drop(&mut self) {
        if let Some(task) = lock(&self.sweeper).take() {
            task.abort();
        }
    }
}

/// Status errors outside the permanent classes and transport failures are
/// retried. Parse errors are not: the same body would come back.
fn is_retryable(err: &GalleryError) -> bool {
    match err {
        GalleryError::HttpStatus(_) => !err.is_permanent(),
        GalleryError::Network(_) => true,
        _ => false,
    }
}
