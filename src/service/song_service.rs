//! Song orchestration.
//!
//! Creation workflow:
//! 1. REQUESTED: validate group and song names
//! 2. ENRICHING: fetch release date, lyrics and link from the info service
//! 3. PERSISTING: one transaction for the song and its verses; a failure is
//!    reported as PERSISTING_SONG or PERSISTING_LYRICS depending on the write that broke
//! 4. COMPLETE: return the stored song with its id and lyric text
//!
//! Listing, lyrics, update and delete are single store calls with pagination
//! defaults and empty-result policies applied here.

use super::error::{SongServiceError, StoreStage};
use crate::enrichment::SongInfoProvider;
use crate::song_store::{
    NewSong, Page, Song, SongCatalogStore, SongFilter, SongId, SongUpdate, UpdateOutcome, Verse,
    WriteStage,
};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const DEFAULT_LIST_LIMIT: u32 = 10;
pub const DEFAULT_LYRICS_LIMIT: u32 = 3;
pub const DEFAULT_PAGE: u32 = 1;

const NO_SONGS_MESSAGE: &str = "couldn't find songs";
const NO_LYRICS_MESSAGE: &str = "can't find lyrics for this song";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CreationStage {
    Requested,
    Enriching,
    Persisting,
    PersistingSong,
    PersistingLyrics,
    Complete,
}

impl fmt::Display for CreationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CreationStage::Requested => "REQUESTED",
            CreationStage::Enriching => "ENRICHING",
            CreationStage::Persisting => "PERSISTING",
            CreationStage::PersistingSong => "PERSISTING_SONG",
            CreationStage::PersistingLyrics => "PERSISTING_LYRICS",
            CreationStage::Complete => "COMPLETE",
        };
        write!(f, "{}", name)
    }
}

impl From<WriteStage> for CreationStage {
    fn from(stage: WriteStage) -> Self {
        match stage {
            WriteStage::Song => CreationStage::PersistingSong,
            WriteStage::Lyrics => CreationStage::PersistingLyrics,
        }
    }
}

/// Tracks one creation request through its stages.
struct Creation<'a> {
    artist: &'a str,
    title: &'a str,
    trail: Vec<CreationStage>,
}

impl<'a> Creation<'a> {
    fn new(artist: &'a str, title: &'a str) -> Self {
        debug!("Song creation for {:?} by {:?}: {}", title, artist, CreationStage::Requested);
        Self {
            artist,
            title,
            trail: vec![CreationStage::Requested],
        }
    }

    fn stage(&self) -> CreationStage {
        self.trail
            .last()
            .copied()
            .unwrap_or(CreationStage::Requested)
    }

    fn advance(&mut self, next: CreationStage) {
        debug!(
            "Song creation for {:?} by {:?}: {} -> {}",
            self.title,
            self.artist,
            self.stage(),
            next
        );
        self.trail.push(next);
    }

    /// `stage` may be more specific than the last stage entered.
    fn fail(&self, stage: CreationStage, err: &SongServiceError) {
        warn!(
            "Song creation for {:?} by {:?} failed at {} after {} stages: {}",
            self.title,
            self.artist,
            stage,
            self.trail.len(),
            err
        );
    }
}

/// Blank values are rejected; accepted values are passed on as given.
fn required_field<'a>(name: &str, value: &'a str) -> Result<&'a str, SongServiceError> {
    if value.trim().is_empty() {
        return Err(SongServiceError::Validation(format!("{} is required", name)));
    }
    Ok(value)
}

/// Non-positive or oversized values are rejected as `invalid <name>`.
fn positive(name: &str, value: Option<i64>, default: u32) -> Result<u32, SongServiceError> {
    match value {
        None => Ok(default),
        Some(v) => u32::try_from(v)
            .ok()
            .filter(|v| *v > 0)
            .ok_or_else(|| SongServiceError::Validation(format!("invalid {}", name))),
    }
}

/// Resolves optional caller-supplied pagination into a store window.
fn resolve_page(
    limit: Option<i64>,
    page: Option<i64>,
    default_limit: u32,
) -> Result<Page, SongServiceError> {
    let limit = positive("limit", limit, default_limit)?;
    let page = positive("page", page, DEFAULT_PAGE)?;
    Page::for_page_number(limit, page)
        .ok_or_else(|| SongServiceError::Validation("invalid page".to_string()))
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

pub struct SongService {
    store: Arc<dyn SongCatalogStore>,
    info_provider: Arc<dyn SongInfoProvider>,
}

impl SongService {
    pub fn new(store: Arc<dyn SongCatalogStore>, info_provider: Arc<dyn SongInfoProvider>) -> Self {
        Self {
            store,
            info_provider,
        }
    }

    /// Creates a song from its group and name, enriching it before anything is stored.
    pub async fn add_song(&self, artist: &str, title: &str) -> Result<Song, SongServiceError> {
        let mut creation = Creation::new(artist, title);
        self.run_creation(&mut creation).await
    }

    async fn run_creation(&self, creation: &mut Creation<'_>) -> Result<Song, SongServiceError> {
        let (artist, title) = match (
            required_field("group", creation.artist),
            required_field("song", creation.title),
        ) {
            (Ok(artist), Ok(title)) => (artist, title),
            (Err(err), _) | (_, Err(err)) => {
                creation.fail(CreationStage::Requested, &err);
                return Err(err);
            }
        };

        creation.advance(CreationStage::Enriching);
        let detail = match self.info_provider.fetch_song_details(artist, title).await {
            Ok(detail) => detail,
            Err(err) => {
                let err = SongServiceError::from(err);
                creation.fail(CreationStage::Enriching, &err);
                return Err(err);
            }
        };

        let new_song = NewSong {
            title: title.to_string(),
            artist: artist.to_string(),
            release_date: detail.release_date,
            text: detail.text,
            link: detail.link,
        };

        creation.advance(CreationStage::Persisting);
        let song = match self.store.insert_song_with_lyrics(&new_song) {
            Ok(song) => song,
            Err(err) => {
                let failed_at = CreationStage::from(err.stage);
                let stage = match err.stage {
                    WriteStage::Song => StoreStage::InsertSong,
                    WriteStage::Lyrics => StoreStage::InsertLyrics,
                };
                let err = SongServiceError::persistence(stage, err.source);
                creation.fail(failed_at, &err);
                return Err(err);
            }
        };
        creation.advance(CreationStage::Complete);

        info!("Added song {} ({:?} by {:?})", song.id, song.title, song.artist);
        Ok(song)
    }

    /// Songs matching `filter`. Empty filter values count as absent.
    pub fn get_songs_list(
        &self,
        filter: SongFilter,
        limit: Option<i64>,
        page: Option<i64>,
    ) -> Result<Vec<Song>, SongServiceError> {
        let page = resolve_page(limit, page, DEFAULT_LIST_LIMIT)?;
        let filter = SongFilter {
            title: present(filter.title),
            artist: present(filter.artist),
            release_date: present(filter.release_date),
        };

        let songs = self
            .store
            .list_songs(&filter, page)
            .map_err(|e| SongServiceError::persistence(StoreStage::ListSongs, e))?;
        if songs.is_empty() {
            return Err(SongServiceError::NotFound(NO_SONGS_MESSAGE.to_string()));
        }
        Ok(songs)
    }

    pub fn get_song_lyrics(
        &self,
        song_id: SongId,
        limit: Option<i64>,
        page: Option<i64>,
    ) -> Result<Vec<Verse>, SongServiceError> {
        let page = resolve_page(limit, page, DEFAULT_LYRICS_LIMIT)?;

        let verses = self
            .store
            .get_lyrics(song_id, page)
            .map_err(|e| SongServiceError::persistence(StoreStage::ReadLyrics, e))?;
        if verses.is_empty() {
            return Err(SongServiceError::NotFound(NO_LYRICS_MESSAGE.to_string()));
        }
        Ok(verses)
    }

    pub fn update_song(&self, song_id: SongId, update: &SongUpdate) -> Result<(), SongServiceError> {
        let outcome = self
            .store
            .update_song(song_id, update)
            .map_err(|e| SongServiceError::persistence(StoreStage::UpdateSong, e))?;
        match outcome {
            UpdateOutcome::Updated => info!("Updated song {}", song_id),
            UpdateOutcome::NoChanges => debug!("Empty update for song {}, nothing written", song_id),
            UpdateOutcome::SongNotFound => debug!("Update targeted missing song {}", song_id),
        }
        Ok(())
    }

    pub fn delete_song(&self, song_id: SongId) -> Result<(), SongServiceError> {
        let removed = self
            .store
            .delete_song(song_id)
            .map_err(|e| SongServiceError::persistence(StoreStage::DeleteSong, e))?;
        if removed {
            info!("Deleted song {}", song_id);
        } else {
            debug!("Delete targeted missing song {}", song_id);
        }
        Ok(())
    }
}
