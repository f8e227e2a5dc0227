//! Song catalog models.
//!
//! JSON field names follow the public API: the title is `song`, the artist is
//! `group`.

use serde::{Deserialize, Serialize};

pub type SongId = i64;

/// A persisted song.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    pub id: SongId,
    #[serde(rename = "song")]
    pub title: String,
    #[serde(rename = "group")]
    pub artist: String,
    pub release_date: String,
    /// Full lyric text. Only known right after creation, the store keeps verses instead.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub link: String,
}

/// A song that has not been stored yet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewSong {
    pub title: String,
    pub artist: String,
    pub release_date: String,
    pub text: String,
    pub link: String,
}

impl NewSong {
    pub fn into_song(self, id: SongId) -> Song {
        Song {
            id,
            title: self.title,
            artist: self.artist,
            release_date: self.release_date,
            text: Some(self.text),
            link: self.link,
        }
    }
}

/// One lyric segment of a song, numbered from 1.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verse {
    pub number: u32,
    pub lyrics: String,
}

/// Optional equality filters for listing songs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SongFilter {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub release_date: Option<String>,
}

/// Sparse set of changes to apply to a song. Absent fields are left untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct SongUpdate {
    #[serde(default, rename = "song")]
    pub title: Option<String>,
    #[serde(default, rename = "group")]
    pub artist: Option<String>,
    #[serde(default, rename = "releaseDate")]
    pub release_date: Option<String>,
    /// Replaces the whole verse set when present.
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
}

impl SongUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.artist.is_none()
            && self.release_date.is_none()
            && self.text.is_none()
            && self.link.is_none()
    }
}

/// Result of applying a [`SongUpdate`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated,
    /// The update carried no fields, nothing was written.
    NoChanges,
    SongNotFound,
}

/// A validated limit/offset window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Page {
    pub limit: u32,
    pub offset: u64,
}

impl Page {
    pub fn new(limit: u32, offset: u64) -> Self {
        Self { limit, offset }
    }

    /// Window for a 1-based page number. Returns `None` if either value is zero
    /// or the offset does not fit an SQLite integer.
    pub fn for_page_number(limit: u32, page: u32) -> Option<Self> {
        if limit == 0 || page == 0 {
            return None;
        }
        let offset = (page as u64 - 1)
            .checked_mul(limit as u64)
            .filter(|offset| *offset <= i64::MAX as u64)?;
        Some(Self { limit, offset })
    }
}
