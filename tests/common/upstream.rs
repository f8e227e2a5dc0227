//! Fake song info service
//!
//! Serves `GET /info?group=&song=` for the songs in the constants module.

use super::constants::*;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

#[derive(Deserialize)]
struct InfoQuery {
    group: String,
    song: String,
}

fn known_song(group: &str, song: &str) -> Option<(&'static str, &'static str, &'static str)> {
    match (group, song) {
        (MUSE, SONG_1_TITLE) => Some((SONG_1_RELEASE_DATE, SONG_1_TEXT, SONG_1_LINK)),
        (MUSE, SONG_2_TITLE) => Some((SONG_2_RELEASE_DATE, SONG_2_TEXT, SONG_2_LINK)),
        (QUEEN, SONG_3_TITLE) => Some((SONG_3_RELEASE_DATE, SONG_3_TEXT, SONG_3_LINK)),
        _ => None,
    }
}

async fn info(State(hits): State<Arc<AtomicUsize>>, Query(query): Query<InfoQuery>) -> Response {
    hits.fetch_add(1, Ordering::SeqCst);

    if query.group == GARBAGE_GROUP {
        return (StatusCode::OK, "<html>definitely not json</html>").into_response();
    }
    if query.group == SLOW_GROUP {
        tokio::time::sleep(Duration::from_secs(SLOW_RESPONSE_SECS)).await;
    }

    match known_song(&query.group, &query.song) {
        Some((release_date, text, link)) => Json(json!({
            "releaseDate": release_date,
            "text": text,
            "link": link,
        }))
        .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

pub struct FakeInfoService {
    pub base_url: String,
    hits: Arc<AtomicUsize>,
    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl FakeInfoService {
    pub async fn spawn() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake info service");
        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();

        let hits = Arc::new(AtomicUsize::new(0));
        let app = Router::new()
            .route("/info", get(info))
            .with_state(hits.clone());

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Fake info service failed");
        });

        Self {
            // Trailing slash on purpose, the client must trim it
            base_url: format!("http://127.0.0.1:{}/", port),
            hits,
            _shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Number of `/info` requests received so far.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

impl Drop for FakeInfoService {
    fn drop(&mut self) {
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
