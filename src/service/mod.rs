mod error;
mod song_service;

pub use error::{SongServiceError, StoreStage};
pub use song_service::{
    CreationStage, SongService, DEFAULT_LIST_LIMIT, DEFAULT_LYRICS_LIMIT, DEFAULT_PAGE,
};
