//! Song catalog HTTP routes, mounted under `/api/v1`.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use super::state::{GuardedSongService, ServerState};
use crate::service::{SongServiceError, StoreStage};
use crate::song_store::{SongFilter, SongId, SongUpdate};

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
        .into_response()
}

fn failure_message(stage: StoreStage) -> &'static str {
    match stage {
        StoreStage::InsertSong | StoreStage::InsertLyrics => "failed to add song",
        StoreStage::ListSongs => "failed to get songs",
        StoreStage::ReadLyrics => "failed to get text",
        StoreStage::UpdateSong => "failed to update song",
        StoreStage::DeleteSong => "failed to delete song",
    }
}

impl IntoResponse for SongServiceError {
    fn into_response(self) -> Response {
        match self {
            SongServiceError::Validation(message) => {
                error_response(StatusCode::BAD_REQUEST, message)
            }
            SongServiceError::NotFound(message) => error_response(StatusCode::NOT_FOUND, message),
            SongServiceError::UpstreamFetch(err) => {
                warn!("Song info service failure: {}", err);
                error_response(StatusCode::BAD_GATEWAY, "failed to fetch song details")
            }
            SongServiceError::Persistence { stage, source } => {
                error!("Persistence failure while {}: {:#}", stage, source);
                error_response(StatusCode::INTERNAL_SERVER_ERROR, failure_message(stage))
            }
        }
    }
}

const INVALID_INPUT: &str = "invalid input parameters";
const INVALID_SONG_ID: &str = "invalid song id";

fn bad_request(what: &str, rejection: impl std::fmt::Display) -> Response {
    debug!("Rejected request: {}", rejection);
    error_response(StatusCode::BAD_REQUEST, what)
}

#[derive(Deserialize, Debug)]
struct AddSongBody {
    pub group: String,
    pub song: String,
}

#[derive(Deserialize, Debug)]
struct ListSongsQuery {
    pub song: Option<String>,
    pub group: Option<String>,
    pub release_date: Option<String>,
    pub limit: Option<i64>,
    pub page: Option<i64>,
}

#[derive(Deserialize, Debug)]
struct PageQuery {
    pub limit: Option<i64>,
    pub page: Option<i64>,
}

async fn add_song(
    State(service): State<GuardedSongService>,
    body: Result<Json<AddSongBody>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return bad_request(INVALID_INPUT, rejection),
    };

    match service.add_song(&body.group, &body.song).await {
        Ok(song) => Json(song).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn get_songs(
    State(service): State<GuardedSongService>,
    query: Result<Query<ListSongsQuery>, QueryRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return bad_request(INVALID_INPUT, rejection),
    };

    let filter = SongFilter {
        title: query.song,
        artist: query.group,
        release_date: query.release_date,
    };
    match service.get_songs_list(filter, query.limit, query.page) {
        Ok(songs) => Json(songs).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn get_song_lyrics(
    State(service): State<GuardedSongService>,
    song_id: Result<Path<SongId>, PathRejection>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Response {
    let Path(song_id) = match song_id {
        Ok(id) => id,
        Err(rejection) => return bad_request(INVALID_SONG_ID, rejection),
    };
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return bad_request(INVALID_INPUT, rejection),
    };

    match service.get_song_lyrics(song_id, query.limit, query.page) {
        Ok(verses) => Json(verses).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn update_song(
    State(service): State<GuardedSongService>,
    song_id: Result<Path<SongId>, PathRejection>,
    body: Result<Json<SongUpdate>, JsonRejection>,
) -> Response {
    let Path(song_id) = match song_id {
        Ok(id) => id,
        Err(rejection) => return bad_request(INVALID_SONG_ID, rejection),
    };
    let Json(update) = match body {
        Ok(body) => body,
        Err(rejection) => return bad_request(INVALID_INPUT, rejection),
    };

    match service.update_song(song_id, &update) {
        Ok(()) => Json("successfully updated song").into_response(),
        Err(err) => err.into_response(),
    }
}

async fn delete_song(
    State(service): State<GuardedSongService>,
    song_id: Result<Path<SongId>, PathRejection>,
) -> Response {
    let Path(song_id) = match song_id {
        Ok(id) => id,
        Err(rejection) => return bad_request(INVALID_SONG_ID, rejection),
    };

    match service.delete_song(song_id) {
        Ok(()) => Json("successfully deleted song").into_response(),
        Err(err) => err.into_response(),
    }
}

pub fn make_song_routes(state: ServerState) -> Router {
    Router::new()
        .route("/add", post(add_song))
        .route("/songs", get(get_songs))
        .route("/{song_id}/lyrics", get(get_song_lyrics))
        .route("/{song_id}", put(update_song).delete(delete_song))
        .with_state(state)
}
