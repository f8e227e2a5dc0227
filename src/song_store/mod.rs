mod lyrics;
mod models;
mod query;
mod schema;
mod store;

pub use lyrics::{join_verses, split_verses, VERSE_SEPARATOR};
pub use models::{
    NewSong, Page, Song, SongFilter, SongId, SongUpdate, UpdateOutcome, Verse,
};
pub use query::{BoundQuery, FieldSet, QueryBuilder, SongColumn};
pub use store::SqliteSongStore;

use anyhow::Result;
use std::fmt;
use thiserror::Error;

/// Song rows.
pub trait SongStore: Send + Sync {
    /// Persists a song row (without verses) and returns it with its assigned id.
    fn insert_song(&self, song: &NewSong) -> Result<Song>;

    fn get_song(&self, id: SongId) -> Result<Option<Song>>;

    /// Songs matching every present filter, ordered by id.
    fn list_songs(&self, filter: &SongFilter, page: Page) -> Result<Vec<Song>>;

    /// Applies only the present fields. An empty update executes no SQL.
    fn update_song(&self, id: SongId, update: &SongUpdate) -> Result<UpdateOutcome>;

    /// Removes the song and, through the foreign key cascade, its verses.
    /// Returns whether a row was removed.
    fn delete_song(&self, id: SongId) -> Result<bool>;
}

/// Verse rows, derived from a song's lyric text.
pub trait VerseStore: Send + Sync {
    /// Segments `text` and inserts all verses in one transaction.
    /// Returns the number of verses written.
    fn add_lyrics(&self, song_id: SongId, text: &str) -> Result<usize>;

    fn get_lyrics(&self, song_id: SongId, page: Page) -> Result<Vec<Verse>>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriteStage {
    Song,
    Lyrics,
}

impl fmt::Display for WriteStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteStage::Song => write!(f, "song"),
            WriteStage::Lyrics => write!(f, "lyrics"),
        }
    }
}

/// A failed atomic write, tagged with the step that failed. Nothing was committed.
#[derive(Debug, Error)]
#[error("Failed to write {stage}: {source:#}")]
pub struct StagedWriteError {
    pub stage: WriteStage,
    #[source]
    pub source: anyhow::Error,
}

impl StagedWriteError {
    pub fn new(stage: WriteStage, source: impl Into<anyhow::Error>) -> Self {
        Self {
            stage,
            source: source.into(),
        }
    }
}

pub trait SongCatalogStore: SongStore + VerseStore {
    /// Inserts a song and all of its verses in a single transaction.
    fn insert_song_with_lyrics(&self, song: &NewSong) -> Result<Song, StagedWriteError>;
}
