//! Scroll-triggered pagination.
//!
//! [`PaginationDriver`] decides *when* the next page is requested. It wraps a
//! [`PageFetcher`] and tracks `page`, `loading`, `has_more` and the last error
//! message. At most one fetch is in flight per driver. A fetch that completes
//! after [`PaginationDriver::reset`] or after the driver was disabled is
//! discarded without touching the state.

use crate::config::PaginationConfig;
use crate::core::throttle::Throttle;
use crate::domain::ports::PageFetcher;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq)]
pub struct PaginationOptions {
    /// Distance from the bottom of the content that counts as "near the end".
    pub threshold: f64,
    pub initial_page: u32,
    pub enabled: bool,
    /// Minimum spacing between two scroll evaluations.
    pub throttle: Duration,
}

impl Default for PaginationOptions {
    fn default() -> Self {
        Self {
            threshold: 100.0,
            initial_page: 1,
            enabled: true,
            throttle: Duration::from_millis(100),
        }
    }
}

impl PaginationOptions {
    pub fn from_config(config: &PaginationConfig) -> Self {
        Self {
            threshold: config.threshold,
            initial_page: config.initial_page,
            enabled: true,
            throttle: Duration::from_millis(config.throttle_ms),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationState {
    /// Next page to request.
    pub page: u32,
    pub loading: bool,
    pub has_more: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Exhausted,
    Errored,
}

impl PaginationState {
    pub fn initial(page: u32) -> Self {
        Self {
            page,
            loading: false,
            has_more: true,
            error: None,
        }
    }

    pub fn phase(&self) -> Phase {
        if self.loading {
            Phase::Loading
        } else if !self.has_more {
            Phase::Exhausted
        } else if self.error.is_some() {
            Phase::Errored
        } else {
            Phase::Idle
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Disabled,
    Loading,
    Exhausted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// `page` was fetched with `fetched` records; the driver moved past it.
    Advanced { page: u32, fetched: usize },
    /// `page` came back empty; no more pages will be requested.
    Exhausted { page: u32 },
    /// `page` failed; the message is kept in the state and the page is retried next time.
    Failed { page: u32, message: String },
    Skipped(SkipReason),
    /// The driver was reset or disabled while the fetch was in flight.
    Discarded { page: u32 },
}

/// Viewport geometry at the time of a scroll event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
    pub scroll_top: f64,
    pub scroll_height: f64,
    pub client_height: f64,
}

impl ScrollMetrics {
    pub fn new(scroll_top: f64, scroll_height: f64, client_height: f64) -> Self {
        Self {
            scroll_top,
            scroll_height,
            client_height,
        }
    }

    pub fn near_bottom(&self, threshold: f64) -> bool {
        self.scroll_height - self.scroll_top <= self.client_height + threshold
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrollOutcome {
    Throttled,
    Disabled,
    NotNearBottom,
    Triggered(LoadOutcome),
}

#[derive(Debug)]
struct Inner {
    state: PaginationState,
    enabled: bool,
    generation: u64,
    throttle: Throttle,
}

pub struct PaginationDriver<F: PageFetcher> {
    fetcher: F,
    threshold: f64,
    initial_page: u32,
    inner: Mutex<Inner>,
}

impl<F: PageFetcher> PaginationDriver<F> {
    pub fn new(fetcher: F, options: PaginationOptions) -> Self {
        Self {
            fetcher,
            threshold: options.threshold,
            initial_page: options.initial_page,
            inner: Mutex::new(Inner {
                state: PaginationState::initial(options.initial_page),
                enabled: options.enabled,
                generation: 0,
                throttle: Throttle::new(options.throttle),
            }),
        }
    }

    // Critical sections never span an await.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn state(&self) -> PaginationState {
        self.lock().state.clone()
    }

    pub fn phase(&self) -> Phase {
        self.lock().state.phase()
    }

    pub fn is_enabled(&self) -> bool {
        self.lock().enabled
    }

    pub fn throttle_window(&self) -> Duration {
        self.lock().throttle.window()
    }

    /// Disabling invalidates any fetch in flight.
    pub fn set_enabled(&self, enabled: bool) {
        let mut inner = self.lock();
        if inner.enabled == enabled {
            return;
        }
        inner.enabled = enabled;
        if !enabled {
            inner.generation += 1;
            inner.state.loading = false;
        }
        tracing::debug!("Pagination {}", if enabled { "enabled" } else { "disabled" });
    }

    /// Back to the initial page with `has_more` set and no error.
    pub fn reset(&self) {
        let mut inner = self.lock();
        inner.generation += 1;
        inner.state = PaginationState::initial(self.initial_page);
        inner.throttle.reset();
        tracing::debug!("Pagination reset to page {}", self.initial_page);
    }

    /// Requests the next page unless a fetch is already running, the source
    /// is exhausted, or the driver is disabled.
    pub async fn request_next_page(&self) -> LoadOutcome {
        let (page, generation) = {
            let mut inner = self.lock();
            if !inner.enabled {
                return LoadOutcome::Skipped(SkipReason::Disabled);
            }
            if inner.state.loading {
                return LoadOutcome::Skipped(SkipReason::Loading);
            }
            if !inner.state.has_more {
                return LoadOutcome::Skipped(SkipReason::Exhausted);
            }
            inner.state.loading = true;
            inner.state.error = None;
            (inner.state.page, inner.generation)
        };

        let result = self.fetcher.fetch_page(page).await;

        let mut inner = self.lock();
        if inner.generation != generation {
            tracing::debug!("Discarding stale result for page {}", page);
            return LoadOutcome::Discarded { page };
        }
        inner.state.loading = false;

        match result {
            Ok(photos) if photos.is_empty() => {
                inner.state.has_more = false;
                tracing::info!("No more photos after page {}", page.saturating_sub(1));
                LoadOutcome::Exhausted { page }
            }
            Ok(photos) => {
                // still under the lock, so a reset cannot slip in before the merge
                let added = self.fetcher.accept_page(page, &photos);
                tracing::debug!("Page {} accepted, {} new photos", page, added);
                inner.state.page = page + 1;
                LoadOutcome::Advanced {
                    page,
                    fetched: photos.len(),
                }
            }
            Err(e) => {
                tracing::error!("Error loading more data: {}", e);
                let message = e.user_friendly_message();
                inner.state.error = Some(message.clone());
                LoadOutcome::Failed { page, message }
            }
        }
    }

    /// Throttled scroll evaluation: requests the next page when the viewport
    /// is within the threshold of the bottom.
    pub async fn on_scroll(&self, metrics: ScrollMetrics, now: Instant) -> ScrollOutcome {
        {
            let mut inner = self.lock();
            if !inner.enabled {
                return ScrollOutcome::Disabled;
            }
            if !inner.throttle.try_acquire(now) {
                return ScrollOutcome::Throttled;
            }
        }

        if !metrics.near_bottom(self.threshold) {
            return ScrollOutcome::NotNearBottom;
        }
        ScrollOutcome::Triggered(self.request_next_page().await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{DescriptionStyle, Photo, RawPhoto, UrlScheme};
    use crate::utils::error::{GalleryError, Result};
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::sync::Notify;

    fn photos(page: u32, count: usize) -> Vec<Photo> {
        let scheme = UrlScheme::new("https://picsum.photos");
        (0..count)
            .map(|i| {
                let raw = RawPhoto {
                    id: format!("{}-{}", page, i),
                    author: "Test Author".to_string(),
                    width: 10,
                    height: 10,
                    url: String::new(),
                    download_url: String::new(),
                };
                Photo::from_raw(raw, &scheme, DescriptionStyle::Card)
            })
            .collect()
    }

    /// 20 records per page up to `last_page`, then empty pages. Pages in
    /// `fail_once` fail on their first request.
    struct ScriptedFetcher {
        last_page: u32,
        fail_once: Mutex<HashSet<u32>>,
        calls: Mutex<Vec<u32>>,
    }

    impl ScriptedFetcher {
        fn new(last_page: u32) -> Self {
            Self {
                last_page,
                fail_once: Mutex::new(HashSet::new()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn failing_once(self, page: u32) -> Self {
            self.fail_once.lock().unwrap().insert(page);
            self
        }

        fn calls(&self) -> Vec<u32> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PageFetcher for ScriptedFetcher {
        async fn fetch_page(&self, page: u32) -> Result<Vec<Photo>> {
            self.calls.lock().unwrap().push(page);
            if self.fail_once.lock().unwrap().remove(&page) {
                return Err(GalleryError::Status {
                    status: 503,
                    url: format!("test://list?page={}", page),
                });
            }
            if page <= self.last_page {
                Ok(photos(page, 20))
            } else {
                Ok(Vec::new())
            }
        }
    }

    /// Blocks every fetch until released.
    struct GatedFetcher {
        gate: Notify,
        calls: AtomicUsize,
        accepted: AtomicUsize,
    }

    #[async_trait]
    impl PageFetcher for GatedFetcher {
        async fn fetch_page(&self, page: u32) -> Result<Vec<Photo>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.gate.notified().await;
            Ok(photos(page, 5))
        }

        fn accept_page(&self, _page: u32, photos: &[Photo]) -> usize {
            self.accepted.fetch_add(1, Ordering::SeqCst);
            photos.len()
        }
    }

    fn gated_driver() -> Arc<PaginationDriver<GatedFetcher>> {
        Arc::new(PaginationDriver::new(
            GatedFetcher {
                gate: Notify::new(),
                calls: AtomicUsize::new(0),
                accepted: AtomicUsize::new(0),
            },
            PaginationOptions::default(),
        ))
    }

    async fn wait_until_loading<F: PageFetcher>(driver: &PaginationDriver<F>) {
        while !driver.state().loading {
            tokio::task::yield_now().await;
        }
    }

    #[test]
    fn test_initial_state() {
        let driver = PaginationDriver::new(
            ScriptedFetcher::new(5),
            PaginationOptions {
                initial_page: 2,
                ..PaginationOptions::default()
            },
        );

        assert_eq!(driver.state(), PaginationState::initial(2));
        assert_eq!(driver.phase(), Phase::Idle);
    }

    #[tokio::test]
    async fn test_exhausts_once_after_last_page() {
        let driver = PaginationDriver::new(ScriptedFetcher::new(5), PaginationOptions::default());

        let mut exhausted = 0;
        for _ in 0..10 {
            match driver.request_next_page().await {
                LoadOutcome::Exhausted { page } => {
                    assert_eq!(page, 6);
                    exhausted += 1;
                }
                LoadOutcome::Advanced { fetched, .. } => assert_eq!(fetched, 20),
                LoadOutcome::Skipped(reason) => assert_eq!(reason, SkipReason::Exhausted),
                other => panic!("unexpected outcome: {:?}", other),
            }
            assert!(driver.state().page <= 6);
        }

        assert_eq!(exhausted, 1);
        assert_eq!(driver.fetcher().calls(), vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(driver.phase(), Phase::Exhausted);
        assert_eq!(driver.state().page, 6);
    }

    #[tokio::test]
    async fn test_failure_keeps_page_and_retry_resumes() {
        let driver = PaginationDriver::new(
            ScriptedFetcher::new(5).failing_once(3),
            PaginationOptions::default(),
        );

        driver.request_next_page().await;
        driver.request_next_page().await;
        assert_eq!(driver.state().page, 3);

        let outcome = driver.request_next_page().await;
        assert!(matches!(outcome, LoadOutcome::Failed { page: 3, .. }));

        let state = driver.state();
        assert_eq!(state.page, 3);
        assert!(!state.loading);
        assert!(state.has_more);
        assert_eq!(
            state.error.as_deref(),
            Some("Failed to fetch photos. Please check your internet connection and try again.")
        );
        assert_eq!(driver.phase(), Phase::Errored);

        let retry = driver.request_next_page().await;
        assert_eq!(retry, LoadOutcome::Advanced { page: 3, fetched: 20 });
        assert_eq!(driver.state().page, 4);
        assert_eq!(driver.state().error, None);
        assert_eq!(driver.fetcher().calls(), vec![1, 2, 3, 3]);
    }

    #[tokio::test]
    async fn test_reset_from_every_phase() {
        let options = PaginationOptions {
            initial_page: 2,
            ..PaginationOptions::default()
        };
        let expected = PaginationState::initial(2);

        // idle after advancing
        let driver = PaginationDriver::new(ScriptedFetcher::new(5), options.clone());
        driver.request_next_page().await;
        driver.reset();
        assert_eq!(driver.state(), expected);

        // exhausted
        let driver = PaginationDriver::new(ScriptedFetcher::new(1), options.clone());
        driver.request_next_page().await;
        assert_eq!(driver.phase(), Phase::Exhausted);
        driver.reset();
        assert_eq!(driver.state(), expected);

        // errored
        let driver = PaginationDriver::new(ScriptedFetcher::new(5).failing_once(2), options);
        driver.request_next_page().await;
        assert_eq!(driver.phase(), Phase::Errored);
        driver.reset();
        assert_eq!(driver.state(), expected);
    }

    #[tokio::test]
    async fn test_reset_while_loading_discards_result() {
        let driver = gated_driver();

        let task = tokio::spawn({
            let driver = Arc::clone(&driver);
            async move { driver.request_next_page().await }
        });
        wait_until_loading(&driver).await;
        assert_eq!(driver.phase(), Phase::Loading);

        driver.reset();
        assert_eq!(driver.state(), PaginationState::initial(1));

        driver.fetcher().gate.notify_one();
        assert_eq!(task.await.unwrap(), LoadOutcome::Discarded { page: 1 });
        assert_eq!(driver.state(), PaginationState::initial(1));
        assert_eq!(driver.fetcher().accepted.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_disable_while_loading_discards_result() {
        let driver = gated_driver();

        let task = tokio::spawn({
            let driver = Arc::clone(&driver);
            async move { driver.request_next_page().await }
        });
        wait_until_loading(&driver).await;

        driver.set_enabled(false);
        driver.fetcher().gate.notify_one();

        assert_eq!(task.await.unwrap(), LoadOutcome::Discarded { page: 1 });
        assert_eq!(driver.fetcher().accepted.load(Ordering::SeqCst), 0);
        let state = driver.state();
        assert_eq!(state.page, 1);
        assert!(!state.loading);
        assert_eq!(
            driver.request_next_page().await,
            LoadOutcome::Skipped(SkipReason::Disabled)
        );
    }

    #[tokio::test]
    async fn test_no_concurrent_fetches() {
        let driver = gated_driver();

        let task = tokio::spawn({
            let driver = Arc::clone(&driver);
            async move { driver.request_next_page().await }
        });
        wait_until_loading(&driver).await;

        assert_eq!(
            driver.request_next_page().await,
            LoadOutcome::Skipped(SkipReason::Loading)
        );

        driver.fetcher().gate.notify_one();
        assert_eq!(task.await.unwrap(), LoadOutcome::Advanced { page: 1, fetched: 5 });
        assert_eq!(driver.fetcher().calls.load(Ordering::SeqCst), 1);
        assert_eq!(driver.fetcher().accepted.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_scroll_burst_checks_threshold_once() {
        let driver = PaginationDriver::new(ScriptedFetcher::new(5), PaginationOptions::default());
        let start = Instant::now();
        let at_bottom = ScrollMetrics::new(900.0, 1000.0, 100.0);

        let mut evaluated = 0;
        for i in 0..10u64 {
            let outcome = driver
                .on_scroll(at_bottom, start + Duration::from_millis(i * 5))
                .await;
            if outcome != ScrollOutcome::Throttled {
                evaluated += 1;
            }
        }

        assert_eq!(evaluated, 1);
        assert_eq!(driver.fetcher().calls(), vec![1]);
    }

    #[tokio::test]
    async fn test_scroll_threshold() {
        let driver = PaginationDriver::new(ScriptedFetcher::new(5), PaginationOptions::default());
        let start = Instant::now();

        // 1000 - 700 = 300 > 100 + 100
        let far = ScrollMetrics::new(700.0, 1000.0, 100.0);
        assert_eq!(driver.on_scroll(far, start).await, ScrollOutcome::NotNearBottom);

        // 1000 - 800 = 200 <= 100 + 100
        let near = ScrollMetrics::new(800.0, 1000.0, 100.0);
        let outcome = driver
            .on_scroll(near, start + Duration::from_millis(100))
            .await;
        assert_eq!(
            outcome,
            ScrollOutcome::Triggered(LoadOutcome::Advanced { page: 1, fetched: 20 })
        );
    }

    #[tokio::test]
    async fn test_scroll_ignored_when_disabled() {
        let driver = PaginationDriver::new(
            ScriptedFetcher::new(5),
            PaginationOptions {
                enabled: false,
                ..PaginationOptions::default()
            },
        );
        let at_bottom = ScrollMetrics::new(900.0, 1000.0, 100.0);

        assert_eq!(
            driver.on_scroll(at_bottom, Instant::now()).await,
            ScrollOutcome::Disabled
        );
        assert!(driver.fetcher().calls().is_empty());
    }
}
