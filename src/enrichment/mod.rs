//! Lookup of release metadata and lyrics for a (group, song) pair.

mod client;
mod models;

pub use client::EnrichmentClient;
pub use models::SongDetail;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EnrichmentError {
    #[error("Enrichment request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("Enrichment request timed out")]
    Timeout,

    #[error("Enrichment service responded with status {0}")]
    Status(u16),

    #[error("Failed to decode enrichment response: {0}")]
    Decode(#[source] reqwest::Error),
}

#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait SongInfoProvider: Send + Sync {
    /// Fetches details for `title` by `artist`. Any non-success outcome is an error.
    async fn fetch_song_details(
        &self,
        artist: &str,
        title: &str,
    ) -> Result<SongDetail, EnrichmentError>;
}
