use super::lyrics::split_verses;
use super::models::{NewSong, Page, Song, SongFilter, SongId, SongUpdate, UpdateOutcome, Verse};
use super::query::{FieldSet, QueryBuilder, SongColumn};
use super::schema::SONG_VERSIONED_SCHEMAS;
use super::{SongCatalogStore, SongStore, StagedWriteError, VerseStore, WriteStage};
use crate::sqlite_persistence::initialize_schema;
use anyhow::{Context, Result};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

const SELECT_SONGS: &str = "SELECT id, song, artist, release_date, link FROM songs";

pub struct SqliteSongStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteSongStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let path = db_path.as_ref();
        let mut conn = Connection::open(path)
            .with_context(|| format!("Failed to open song database at {:?}", path))?;
        conn.execute("PRAGMA foreign_keys = ON;", [])?;
        initialize_schema(&mut conn, SONG_VERSIONED_SCHEMAS)
            .with_context(|| format!("Failed to initialize song database at {:?}", path))?;
        info!("Song database ready at {:?}", path);

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn row_to_song(row: &rusqlite::Row) -> rusqlite::Result<Song> {
        Ok(Song {
            id: row.get("id")?,
            title: row.get("song")?,
            artist: row.get("artist")?,
            release_date: row.get("release_date")?,
            text: None,
            link: row.get("link")?,
        })
    }

    fn filter_fields(filter: &SongFilter) -> FieldSet {
        FieldSet::new()
            .with(SongColumn::Title, filter.title.clone())
            .with(SongColumn::Artist, filter.artist.clone())
            .with(SongColumn::ReleaseDate, filter.release_date.clone())
    }

    fn update_fields(update: &SongUpdate) -> FieldSet {
        FieldSet::new()
            .with(SongColumn::Title, update.title.clone())
            .with(SongColumn::Artist, update.artist.clone())
            .with(SongColumn::ReleaseDate, update.release_date.clone())
            .with(SongColumn::Link, update.link.clone())
    }

    fn insert_song_row(conn: &Connection, song: &NewSong) -> Result<SongId> {
        conn.execute(
            "INSERT INTO songs (song, artist, release_date, link) VALUES (?1, ?2, ?3, ?4)",
            params![song.title, song.artist, song.release_date, song.link],
        )
        .with_context(|| format!("Failed to insert song {:?} by {:?}", song.title, song.artist))?;
        Ok(conn.last_insert_rowid())
    }

    fn insert_verses(conn: &Connection, song_id: SongId, text: &str) -> Result<usize> {
        let verses = split_verses(text);
        let mut stmt = conn.prepare_cached(
            "INSERT INTO verses (song_id, verse_number, verse_lyrics) VALUES (?1, ?2, ?3)",
        )?;
        for (index, verse) in verses.iter().enumerate() {
            let number = index as i64 + 1;
            stmt.execute(params![song_id, number, verse])
                .with_context(|| format!("Failed to insert verse {} of song {}", number, song_id))?;
        }
        Ok(verses.len())
    }

    fn replace_verses(conn: &Connection, song_id: SongId, text: &str) -> Result<usize> {
        conn.execute("DELETE FROM verses WHERE song_id = ?1", params![song_id])
            .with_context(|| format!("Failed to clear verses of song {}", song_id))?;
        Self::insert_verses(conn, song_id, text)
    }

    fn song_exists(conn: &Connection, id: SongId) -> Result<bool> {
        let found = conn
            .query_row("SELECT 1 FROM songs WHERE id = ?1", params![id], |_| Ok(()))
            .optional()?;
        Ok(found.is_some())
    }
}

impl SongStore for SqliteSongStore {
    fn insert_song(&self, song: &NewSong) -> Result<Song> {
        let conn = self.conn.lock().unwrap();
        let id = Self::insert_song_row(&conn, song)?;
        let mut stored = song.clone().into_song(id);
        stored.text = None;
        Ok(stored)
    }

    fn get_song(&self, id: SongId) -> Result<Option<Song>> {
        let conn = self.conn.lock().unwrap();
        let song = conn
            .query_row(
                &format!("{} WHERE id = ?1", SELECT_SONGS),
                params![id],
                Self::row_to_song,
            )
            .optional()
            .with_context(|| format!("Failed to load song {}", id))?;
        Ok(song)
    }

    fn list_songs(&self, filter: &SongFilter, page: Page) -> Result<Vec<Song>> {
        let query = QueryBuilder::new(SELECT_SONGS)
            .where_all(Self::filter_fields(filter))
            .order_by_page(SongColumn::Id, page)
            .build();
        debug!("Listing songs with `{}`", query.sql);

        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare_cached(&query.sql)?;
        let songs = stmt
            .query_map(params_from_iter(query.values.iter()), Self::row_to_song)?
            .collect::<rusqlite::Result<Vec<Song>>>()
            .context("Failed to read song rows")?;
        Ok(songs)
    }

    fn update_song(&self, id: SongId, update: &SongUpdate) -> Result<UpdateOutcome> {
        if update.is_empty() {
            return Ok(UpdateOutcome::NoChanges);
        }

        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;

        let fields = Self::update_fields(update);
        let found = if fields.is_empty() {
            Self::song_exists(&tx, id)?
        } else {
            let query = QueryBuilder::new("UPDATE songs")
                .set_all(fields)
                .where_eq(SongColumn::Id, id)
                .build();
            let changed = tx
                .execute(&query.sql, params_from_iter(query.values.iter()))
                .with_context(|| format!("Failed to update song {}", id))?;
            changed > 0
        };
        if !found {
            return Ok(UpdateOutcome::SongNotFound);
        }

        if let Some(text) = &update.text {
            let count = Self::replace_verses(&tx, id, text)?;
            debug!("Replaced lyrics of song {} with {} verses", id, count);
        }
        tx.commit()?;
        Ok(UpdateOutcome::Updated)
    }

    fn delete_song(&self, id: SongId) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let removed = conn
            .execute("DELETE FROM songs WHERE id = ?1", params![id])
            .with_context(|| format!("Failed to delete song {}", id))?;
        Ok(removed > 0)
    }
}

impl VerseStore for SqliteSongStore {
    fn add_lyrics(&self, song_id: SongId, text: &str) -> Result<usize> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;
        let count = Self::insert_verses(&tx, song_id, text)?;
        tx.commit()?;
        Ok(count)
    }

    fn get_lyrics(&self, song_id: SongId, page: Page) -> Result<Vec<Verse>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare_cached(
            "SELECT verse_number, verse_lyrics FROM verses WHERE song_id = ?1 \
             ORDER BY verse_number ASC LIMIT ?2 OFFSET ?3",
        )?;
        let verses = stmt
            .query_map(
                params![song_id, page.limit as i64, page.offset as i64],
                |row| {
                    Ok(Verse {
                        number: row.get(0)?,
                        lyrics: row.get(1)?,
                    })
                },
            )?
            .collect::<rusqlite::Result<Vec<Verse>>>()
            .with_context(|| format!("Failed to read verses of song {}", song_id))?;
        Ok(verses)
    }
}

impl SongCatalogStore for SqliteSongStore {
    fn insert_song_with_lyrics(&self, song: &NewSong) -> Result<Song, StagedWriteError> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn
            .transaction()
            .map_err(|e| StagedWriteError::new(WriteStage::Song, e))?;

        let id = Self::insert_song_row(&tx, song)
            .map_err(|e| StagedWriteError::new(WriteStage::Song, e))?;
        let verse_count = Self::insert_verses(&tx, id, &song.text)
            .map_err(|e| StagedWriteError::new(WriteStage::Lyrics, e))?;
        tx.commit()
            .map_err(|e| StagedWriteError::new(WriteStage::Lyrics, e))?;

        debug!("Stored song {} with {} verses", id, verse_count);
        Ok(song.clone().into_song(id))
    }
}
