use crate::config::SourceConfig;
use crate::domain::model::{DescriptionStyle, Photo, UrlScheme};
use crate::domain::photo_list::PhotoList;
use crate::domain::ports::{PageFetcher, PhotoSource};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Pulls pages from a [`PhotoSource`] and accumulates them into a
/// deduplicated [`PhotoList`].
pub struct FetchMoreController<S: PhotoSource> {
    source: S,
    scheme: UrlScheme,
    page_size: u32,
    list: Mutex<PhotoList>,
    epoch: AtomicU64,
}

impl<S: PhotoSource> FetchMoreController<S> {
    pub fn new(source: S, config: &SourceConfig) -> Self {
        Self {
            source,
            scheme: UrlScheme::new(&config.image_base),
            page_size: config.page_size,
            list: Mutex::new(PhotoList::new()),
            epoch: AtomicU64::new(0),
        }
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    async fn fetch_mapped(&self, page: u32) -> Result<Vec<Photo>> {
        tracing::info!("Fetching page {}...", page);
        let raw = self
            .source
            .list_photos(page, self.page_size)
            .await
            .inspect_err(|e| tracing::warn!("Error fetching page {}: {}", page, e))?;

        Ok(raw
            .into_iter()
            .map(|record| Photo::from_raw(record, &self.scheme, DescriptionStyle::Card))
            .collect())
    }

    fn list(&self) -> MutexGuard<'_, PhotoList> {
        self.list.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fetches page 1 and replaces the accumulated list with it.
    pub async fn load_initial(&self) -> Result<usize> {
        let epoch = self.epoch.load(Ordering::Acquire);
        let photos = self.fetch_mapped(1).await?;

        let mut list = self.list();
        if self.epoch.load(Ordering::Acquire) != epoch {
            tracing::debug!("List was cleared while page 1 was in flight, dropping it");
            return Ok(0);
        }
        list.clear();
        let added = list.merge(photos);
        tracing::debug!("Initial load accepted {} photos", added);
        Ok(added)
    }

    /// Fetches `page`, appends the photos not seen before, and returns the
    /// whole page as received. An empty page means the catalogue is exhausted.
    pub async fn fetch_and_merge(&self, page: u32) -> Result<Vec<Photo>> {
        let epoch = self.epoch.load(Ordering::Acquire);
        let photos = self.fetch_mapped(page).await?;

        if self.epoch.load(Ordering::Acquire) != epoch {
            tracing::debug!("List was cleared while page {} was in flight, not merging", page);
            return Ok(photos);
        }
        self.merge_page(page, &photos);
        Ok(photos)
    }

    fn merge_page(&self, page: u32, photos: &[Photo]) -> usize {
        if photos.is_empty() {
            tracing::debug!("Page {} is empty", page);
            return 0;
        }

        let mut list = self.list();
        let added = list.merge(photos.iter().cloned());
        tracing::debug!(
            "Page {}: {} received, {} new, {} total",
            page,
            photos.len(),
            added,
            list.len()
        );
        added
    }

    /// Checks for at least one record after `page`. Failures count as "no".
    pub async fn has_more_after(&self, page: u32) -> bool {
        match self.source.list_photos(page + 1, 1).await {
            Ok(records) => !records.is_empty(),
            Err(e) => {
                tracing::warn!("Error checking for more photos after page {}: {}", page, e);
                false
            }
        }
    }

    pub fn photos(&self) -> Vec<Photo> {
        self.list().photos().to_vec()
    }

    pub fn len(&self) -> usize {
        self.list().len()
    }

    pub fn is_empty(&self) -> bool {
        self.list().is_empty()
    }

    /// Empties the list. An initial load still in flight is not applied afterwards.
    pub fn clear(&self) {
        self.epoch.fetch_add(1, Ordering::AcqRel);
        self.list().clear();
    }
}

/// The driver fetches through `fetch_page` and only calls `accept_page` once
/// it knows the result is still current, so a discarded page never reaches
/// the list.
#[async_trait]
impl<S: PhotoSource> PageFetcher for FetchMoreController<S> {
    async fn fetch_page(&self, page: u32) -> Result<Vec<Photo>> {
        self.fetch_mapped(page).await
    }

    fn accept_page(&self, page: u32, photos: &[Photo]) -> usize {
        self.merge_page(page, photos)
    }
}
