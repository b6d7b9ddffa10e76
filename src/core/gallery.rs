use crate::config::GalleryConfig;
use crate::core::fetch_more::FetchMoreController;
use crate::core::pagination::{
    LoadOutcome, PaginationDriver, PaginationOptions, PaginationState, ScrollMetrics,
    ScrollOutcome,
};
use crate::core::scroll::ScrollListener;
use crate::domain::model::Photo;
use crate::domain::ports::PhotoSource;
use crate::utils::error::Result;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;
use tokio::sync::mpsc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitialLoad {
    Pending,
    Ready,
    Failed(String),
}

type Driver<S> = PaginationDriver<Arc<FetchMoreController<S>>>;

/// One browsing session over the gallery: eager first page, then
/// scroll-driven pagination once that page is in.
pub struct GallerySession<S: PhotoSource + 'static> {
    controller: Arc<FetchMoreController<S>>,
    driver: Arc<Driver<S>>,
    initial: Mutex<InitialLoad>,
}

impl<S: PhotoSource + 'static> GallerySession<S> {
    pub fn new(source: S, config: &GalleryConfig) -> Self {
        let controller = Arc::new(FetchMoreController::new(source, &config.source));
        let options = PaginationOptions {
            enabled: false,
            ..PaginationOptions::from_config(&config.pagination)
        };
        let driver = Arc::new(PaginationDriver::new(Arc::clone(&controller), options));

        Self {
            controller,
            driver,
            initial: Mutex::new(InitialLoad::Pending),
        }
    }

    fn set_initial(&self, value: InitialLoad) {
        *self.initial.lock().unwrap_or_else(PoisonError::into_inner) = value;
    }

    pub fn initial_load(&self) -> InitialLoad {
        self.initial
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn controller(&self) -> &FetchMoreController<S> {
        &self.controller
    }

    pub fn driver(&self) -> &Arc<Driver<S>> {
        &self.driver
    }

    /// Loads page 1. Pagination stays disabled until this succeeds; a failure
    /// is returned and kept as the blocking error.
    pub async fn start(&self) -> Result<usize> {
        self.driver.set_enabled(false);
        self.set_initial(InitialLoad::Pending);

        match self.controller.load_initial().await {
            Ok(count) => {
                tracing::info!("Loaded {} photos", count);
                self.set_initial(InitialLoad::Ready);
                self.driver.set_enabled(true);
                Ok(count)
            }
            Err(e) => {
                tracing::error!("Initial load failed: {}", e);
                self.set_initial(InitialLoad::Failed(e.user_friendly_message()));
                Err(e)
            }
        }
    }

    /// Starts over from an empty list.
    pub async fn retry(&self) -> Result<usize> {
        // reset first so a page still in flight is discarded, not merged into the fresh list
        self.driver.reset();
        self.controller.clear();
        self.start().await
    }

    pub async fn request_next_page(&self) -> LoadOutcome {
        self.driver.request_next_page().await
    }

    pub async fn on_scroll(&self, metrics: ScrollMetrics) -> ScrollOutcome {
        self.driver.on_scroll(metrics, Instant::now()).await
    }

    pub fn attach_scroll(&self, events: mpsc::Receiver<ScrollMetrics>) -> Option<ScrollListener> {
        self.driver.attach_scroll(events)
    }

    /// Asks the API whether anything follows the last loaded page. Only
    /// meaningful while pagination still reports `has_more`.
    pub async fn more_available(&self) -> bool {
        let state = self.driver.state();
        if !state.has_more || self.initial_load() != InitialLoad::Ready {
            return false;
        }
        self.controller
            .has_more_after(state.page.saturating_sub(1))
            .await
    }

    pub fn photos(&self) -> Vec<Photo> {
        self.controller.photos()
    }

    pub fn view(&self) -> GalleryView {
        GalleryView {
            photo_count: self.controller.len(),
            initial: self.initial_load(),
            pagination: self.driver.state(),
        }
    }
}

/// What the presentation layer needs to render the gallery chrome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryView {
    pub photo_count: usize,
    pub initial: InitialLoad,
    pub pagination: PaginationState,
}

impl GalleryView {
    pub fn summary(&self) -> Vec<String> {
        let mut lines = Vec::new();

        match &self.initial {
            InitialLoad::Pending => {
                lines.push("Loading photos...".to_string());
                return lines;
            }
            InitialLoad::Failed(message) if self.photo_count == 0 => {
                lines.push(format!("Unable to load photos: {}", message));
                return lines;
            }
            _ => {}
        }

        if self.photo_count == 0 {
            lines.push("No photos found".to_string());
            return lines;
        }

        let plural = if self.photo_count == 1 { "" } else { "s" };
        let mut showing = format!("Showing {} photo{}", self.photo_count, plural);
        if self.pagination.has_more {
            showing.push_str(" • Scroll down for more");
        }
        lines.push(showing);

        if self.pagination.loading {
            lines.push("Loading more photos...".to_string());
        }
        if let Some(error) = &self.pagination.error {
            lines.push(format!("Error loading more photos: {}", error));
        }
        if !self.pagination.has_more && !self.pagination.loading {
            lines.push("You've reached the end of the gallery".to_string());
        }

        lines
    }
}
