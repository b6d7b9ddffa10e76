use crate::config::SourceConfig;
use crate::domain::model::RawPhoto;
use crate::domain::ports::PhotoSource;
use crate::utils::error::{GalleryError, Result};
use async_trait::async_trait;
use reqwest::Client;
use url::Url;

/// reqwest-backed client for the Picsum API.
#[derive(Debug, Clone)]
pub struct PicsumClient {
    client: Client,
    api_base: Url,
}

impl PicsumClient {
    pub fn new(config: &SourceConfig) -> Result<Self> {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(client: Client, config: &SourceConfig) -> Result<Self> {
        let api_base = Url::parse(&config.api_base)?;
        if api_base.cannot_be_a_base() {
            return Err(GalleryError::InvalidConfigValueError {
                field: "source.api_base".to_string(),
                value: config.api_base.clone(),
                reason: "URL cannot be used as a base".to_string(),
            });
        }
        Ok(Self { client, api_base })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.api_base.clone();
        // checked in with_client
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    pub fn list_url(&self, page: u32, limit: u32) -> Url {
        let mut url = self.endpoint(&["v2", "list"]);
        url.query_pairs_mut()
            .append_pair("page", &page.to_string())
            .append_pair("limit", &limit.to_string());
        url
    }

    pub fn info_url(&self, id: &str) -> Url {
        self.endpoint(&["id", id, "info"])
    }
}

#[async_trait]
impl PhotoSource for PicsumClient {
    async fn list_photos(&self, page: u32, limit: u32) -> Result<Vec<RawPhoto>> {
        let url = self.list_url(page, limit);
        tracing::debug!("Making API request to: {}", url);

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if !status.is_success() {
            return Err(GalleryError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let photos: Vec<RawPhoto> = response.json().await?;
        Ok(photos)
    }

    async fn photo_info(&self, id: &str) -> Result<Option<RawPhoto>> {
        let url = self.info_url(id);
        tracing::debug!("Making API request to: {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            tracing::debug!("Info endpoint returned {} for photo {}", status, id);
            return Ok(None);
        }

        let photo: RawPhoto = response.json().await?;
        Ok(Some(photo))
    }
}
