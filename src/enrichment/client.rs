//! HTTP client for the external song info service.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use super::{EnrichmentError, SongDetail, SongInfoProvider};

pub struct EnrichmentClient {
    client: reqwest::Client,
    base_url: String,
}

impl EnrichmentClient {
    /// # Arguments
    /// * `base_url` - Base URL of the info service (e.g., "http://localhost:8081")
    /// * `timeout_sec` - Request timeout in seconds, covering connect and body
    pub fn new(base_url: String, timeout_sec: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_sec))
            .build()
            .context("Failed to create HTTP client")?;

        let base_url = base_url.trim_end_matches('/').to_string();

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn info_url(&self, artist: &str, title: &str) -> String {
        format!(
            "{}/info?group={}&song={}",
            self.base_url,
            urlencoding::encode(artist),
            urlencoding::encode(title)
        )
    }
}

fn transport_error(err: reqwest::Error) -> EnrichmentError {
    if err.is_timeout() {
        EnrichmentError::Timeout
    } else {
        EnrichmentError::Request(err)
    }
}

#[async_trait]
impl SongInfoProvider for EnrichmentClient {
    async fn fetch_song_details(
        &self,
        artist: &str,
        title: &str,
    ) -> Result<SongDetail, EnrichmentError> {
        let url = self.info_url(artist, title);
        debug!("Fetching song details from {}", url);

        let response = self.client.get(&url).send().await.map_err(transport_error)?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(EnrichmentError::Status(status.as_u16()));
        }

        response.json::<SongDetail>().await.map_err(|err| {
            if err.is_timeout() {
                EnrichmentError::Timeout
            } else {
                EnrichmentError::Decode(err)
            }
        })
    }
}
