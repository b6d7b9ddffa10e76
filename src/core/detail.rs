use crate::config::{DetailConfig, SourceConfig};
use crate::domain::model::{DescriptionStyle, Photo, RawPhoto, UrlScheme};
use crate::domain::ports::PhotoSource;
use crate::utils::error::{GalleryError, Result};
use crate::utils::validation;

/// Resolves a single photo, first through the info endpoint and then by
/// scanning list pages.
pub struct DetailResolver<S: PhotoSource> {
    source: S,
    scheme: UrlScheme,
    config: DetailConfig,
}

impl<S: PhotoSource> DetailResolver<S> {
    pub fn new(source: S, source_config: &SourceConfig, config: DetailConfig) -> Self {
        Self {
            source,
            scheme: UrlScheme::new(&source_config.image_base),
            config,
        }
    }

    pub async fn find(&self, id: &str) -> Result<Photo> {
        validation::validate_non_empty_string("id", id)?;
        let id = id.trim();

        let info = self
            .source
            .photo_info(id)
            .await
            .map_err(|e| e.for_photo(id))?;
        if let Some(raw) = info {
            return Ok(self.to_photo(raw));
        }

        tracing::debug!("Info endpoint has no photo {}, scanning list pages", id);
        match self.scan(id).await {
            Some(raw) => Ok(self.to_photo(raw)),
            None => Err(GalleryError::NotFound { id: id.to_string() }),
        }
    }

    async fn scan(&self, id: &str) -> Option<RawPhoto> {
        let target = id.parse::<u64>().ok();

        for page in 1..=self.config.fallback_max_pages {
            let batch = match self
                .source
                .list_photos(page, self.config.fallback_page_size)
                .await
            {
                Ok(batch) => batch,
                Err(e) => {
                    tracing::warn!("Error fetching page {}: {}", page, e);
                    continue;
                }
            };

            if batch.is_empty() {
                tracing::debug!("Page {} is empty, stopping scan for {}", page, id);
                return None;
            }

            if let Some(found) = batch.iter().position(|p| p.id == id) {
                return batch.into_iter().nth(found);
            }

            if self.config.early_exit {
                if let Some(target) = target {
                    if passed_target(&batch, target) {
                        tracing::debug!("Page {} is past id {}, stopping scan", page, id);
                        return None;
                    }
                }
            }
        }

        None
    }

    fn to_photo(&self, raw: RawPhoto) -> Photo {
        Photo::from_raw(raw, &self.scheme, DescriptionStyle::Detail)
    }
}

/// True only when the page is numerically ascending and already beyond
/// `target`. Pages with non-numeric or unordered ids never qualify.
fn passed_target(batch: &[RawPhoto], target: u64) -> bool {
    let ids: Option<Vec<u64>> = batch.iter().map(RawPhoto::numeric_id).collect();
    match ids {
        Some(ids) => {
            ids.windows(2).all(|pair| pair[0] <= pair[1])
                && ids.last().is_some_and(|&max| max > target)
        }
        None => false,
    }
}
