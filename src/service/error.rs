use crate::enrichment::EnrichmentError;
use std::fmt;
use thiserror::Error;

/// Store operation that a persistence failure happened in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreStage {
    InsertSong,
    InsertLyrics,
    ListSongs,
    ReadLyrics,
    UpdateSong,
    DeleteSong,
}

impl fmt::Display for StoreStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StoreStage::InsertSong => "inserting song",
            StoreStage::InsertLyrics => "inserting lyrics",
            StoreStage::ListSongs => "listing songs",
            StoreStage::ReadLyrics => "reading lyrics",
            StoreStage::UpdateSong => "updating song",
            StoreStage::DeleteSong => "deleting song",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Error)]
pub enum SongServiceError {
    #[error("{0}")]
    Validation(String),

    #[error("Upstream fetch failed: {0}")]
    UpstreamFetch(#[from] EnrichmentError),

    #[error("Persistence failure while {stage}: {source:#}")]
    Persistence {
        stage: StoreStage,
        #[source]
        source: anyhow::Error,
    },

    #[error("{0}")]
    NotFound(String),
}

impl SongServiceError {
    pub fn persistence(stage: StoreStage, source: anyhow::Error) -> Self {
        SongServiceError::Persistence { stage, source }
    }
}
