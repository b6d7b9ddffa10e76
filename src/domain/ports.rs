use crate::domain::model::{Photo, RawPhoto};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Remote catalogue of photos.
#[async_trait]
pub trait PhotoSource: Send + Sync {
    /// One page of records in API order. Fails on transport errors and
    /// non-success statuses.
    async fn list_photos(&self, page: u32, limit: u32) -> Result<Vec<RawPhoto>>;

    /// Direct by-id lookup. `Ok(None)` means the endpoint could not serve the
    /// record and callers may fall back to scanning the list.
    async fn photo_info(&self, id: &str) -> Result<Option<RawPhoto>>;
}

/// Fetches one page and returns it as received, before any dedup.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_page(&self, page: u32) -> Result<Vec<Photo>>;

    /// Applies a page returned by `fetch_page`. Called only while that result
    /// is still current, and returns how many photos were new.
    fn accept_page(&self, _page: u32, _photos: &[Photo]) -> usize {
        0
    }
}

#[async_trait]
impl<T: PhotoSource + ?Sized> PhotoSource for Arc<T> {
    async fn list_photos(&self, page: u32, limit: u32) -> Result<Vec<RawPhoto>> {
        (**self).list_photos(page, limit).await
    }

    async fn photo_info(&self, id: &str) -> Result<Option<RawPhoto>> {
        (**self).photo_info(id).await
    }
}

#[async_trait]
impl<T: PageFetcher + ?Sized> PageFetcher for Arc<T> {
    async fn fetch_page(&self, page: u32) -> Result<Vec<Photo>> {
        (**self).fetch_page(page).await
    }

    fn accept_page(&self, page: u32, photos: &[Photo]) -> usize {
        (**self).accept_page(page, photos)
    }
}
