use crate::sqlite_column;
use crate::sqlite_persistence::{
    Column, ForeignKey, ForeignKeyOnChange, SqlType, Table, VersionedSchema,
};

const SONGS_TABLE_V0: Table = Table {
    name: "songs",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("song", &SqlType::Text, non_null = true),
        sqlite_column!("artist", &SqlType::Text, non_null = true),
        sqlite_column!("release_date", &SqlType::Text, non_null = true),
        sqlite_column!("link", &SqlType::Text, non_null = true),
    ],
    indices: &[
        ("idx_songs_artist", "artist"),
        ("idx_songs_song", "song"),
    ],
    unique_constraints: &[],
};

const SONG_FOREIGN_KEY: ForeignKey = ForeignKey {
    foreign_table: "songs",
    foreign_column: "id",
    on_delete: ForeignKeyOnChange::Cascade,
};

const VERSES_TABLE_V0: Table = Table {
    name: "verses",
    columns: &[
        sqlite_column!(
            "song_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&SONG_FOREIGN_KEY)
        ),
        sqlite_column!("verse_number", &SqlType::Integer, non_null = true),
        sqlite_column!("verse_lyrics", &SqlType::Text, non_null = true),
    ],
    indices: &[("idx_verses_song_id", "song_id")],
    unique_constraints: &[&["song_id", "verse_number"]],
};

pub const SONG_VERSIONED_SCHEMAS: &[VersionedSchema] = &[VersionedSchema {
    version: 0,
    tables: &[SONGS_TABLE_V0, VERSES_TABLE_V0],
    migration: None,
}];
