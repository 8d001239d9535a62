//! Artist metadata plugin - fetches artist pages from a remote service

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tracing::debug;

use crate::config::Settings;
use crate::errors::RefreshError;
use crate::models::ArtistPage;

/// Remote source of artist metadata
#[async_trait]
pub trait ArtistMetadataClient: Send + Sync + 'static {
    /// Fetch one artist's page. Single shot, no retry.
    async fn artist(&self, id: &str) -> Result<ArtistPage, RefreshError>;
}

/// Metadata client speaking JSON over HTTP
///
/// `GET {base_url}/artists/{id}` answers with an [`ArtistPage`].
#[derive(Debug, Clone)]
pub struct HttpMetadataClient {
    client: Client,
    base_url: Url,
}

impl HttpMetadataClient {
    pub fn new(client: Client, base_url: &str) -> Result<Self, RefreshError> {
        let base_url =
            Url::parse(base_url).map_err(|_| RefreshError::InvalidBaseUrl(base_url.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(RefreshError::InvalidBaseUrl(base_url.to_string()));
        }
        Ok(Self { client, base_url })
    }

    /// Build from settings; `None` when no metadata service is configured
    pub fn from_settings(settings: &Settings) -> Result<Option<Self>, RefreshError> {
        let Some(base_url) = settings.metadata_base_url.as_deref() else {
            return Ok(None);
        };
        let client = Client::builder()
            .timeout(settings.metadata_timeout())
            .build()?;
        Self::new(client, base_url).map(Some)
    }

    fn artist_url(&self, id: &str) -> Url {
        let mut url = self.base_url.clone();
        // checked in new(): the base url can hold path segments
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("artists").push(id);
        }
        url
    }
}

#[async_trait]
impl ArtistMetadataClient for HttpMetadataClient {
    async fn artist(&self, id: &str) -> Result<ArtistPage, RefreshError> {
        let url = self.artist_url(id);
        debug!("Fetching artist metadata from {}", url);

        let resp = self.client.get(url).send().await?;

        match resp.status() {
            StatusCode::NOT_FOUND => Err(RefreshError::NotFound(id.to_string())),
            status if !status.is_success() => Err(RefreshError::Status {
                id: id.to_string(),
                status: status.as_u16(),
            }),
            _ => Ok(resp.json::<ArtistPage>().await?),
        }
    }
}
