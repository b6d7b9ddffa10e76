use crate::core::pagination::{PaginationDriver, ScrollMetrics};
use crate::domain::ports::PageFetcher;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Background subscription feeding scroll events into a driver.
///
/// The first event of a burst opens a throttle window; when it closes, only the
/// most recent metrics are evaluated. The task stops when the handle is
/// dropped, the sender side closes, or the driver is disabled.
#[derive(Debug)]
pub struct ScrollListener {
    handle: JoinHandle<()>,
}

impl ScrollListener {
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    pub fn stop(self) {
        self.handle.abort();
    }
}

impl Drop for ScrollListener {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

impl<F: PageFetcher + 'static> PaginationDriver<F> {
    /// Installs a scroll listener. Returns `None` while the driver is disabled.
    pub fn attach_scroll(
        self: &Arc<Self>,
        mut events: mpsc::Receiver<ScrollMetrics>,
    ) -> Option<ScrollListener> {
        if !self.is_enabled() {
            tracing::debug!("Pagination disabled, scroll listener not installed");
            return None;
        }

        let driver = Arc::clone(self);
        let window = driver.throttle_window();
        let handle = tokio::spawn(async move {
            while let Some(first) = events.recv().await {
                if !driver.is_enabled() {
                    break;
                }

                tokio::time::sleep(window).await;
                let mut latest = first;
                while let Ok(metrics) = events.try_recv() {
                    latest = metrics;
                }

                if !driver.is_enabled() {
                    break;
                }
                let outcome = driver.on_scroll(latest, Instant::now()).await;
                tracing::trace!("Scroll evaluation: {:?}", outcome);
            }
            tracing::debug!("Scroll listener stopped");
        });

        Some(ScrollListener { handle })
    }
}
