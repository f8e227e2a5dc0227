//! HTTP client for end-to-end tests
//!
//! Wraps reqwest with one method per song catalog endpoint.
//! When API routes or request formats change, update only this file.

use super::constants::*;
use reqwest::Response;
use serde_json::{json, Value};
use std::time::Duration;

pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    pub base_url: String,
}

impl TestClient {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    fn api(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.base_url, path)
    }

    pub async fn get_home(&self) -> Response {
        self.client
            .get(format!("{}/", self.base_url))
            .send()
            .await
            .expect("Home request failed")
    }

    pub async fn add_song(&self, group: &str, song: &str) -> Response {
        self.client
            .post(self.api("/add"))
            .json(&json!({ "group": group, "song": song }))
            .send()
            .await
            .expect("Add song request failed")
    }

    /// Adds a song that the fake info service knows and returns its id.
    ///
    /// # Panics
    ///
    /// Panics if the song could not be created.
    pub async fn add_known_song(&self, group: &str, song: &str) -> i64 {
        let response = self.add_song(group, song).await;
        assert!(
            response.status().is_success(),
            "Failed to add {} by {}: {:?}",
            song,
            group,
            response.status()
        );
        let body: Value = response.json().await.expect("Invalid song body");
        body["id"].as_i64().expect("Song id missing")
    }

    /// `GET /songs` with the given raw query pairs.
    pub async fn list_songs(&self, query: &[(&str, &str)]) -> Response {
        self.client
            .get(self.api("/songs"))
            .query(query)
            .send()
            .await
            .expect("List songs request failed")
    }

    pub async fn get_lyrics(&self, song_id: &str, query: &[(&str, &str)]) -> Response {
        self.client
            .get(self.api(&format!("/{}/lyrics", song_id)))
            .query(query)
            .send()
            .await
            .expect("Get lyrics request failed")
    }

    pub async fn update_song(&self, song_id: &str, body: Value) -> Response {
        self.client
            .put(self.api(&format!("/{}", song_id)))
            .json(&body)
            .send()
            .await
            .expect("Update song request failed")
    }

    pub async fn delete_song(&self, song_id: &str) -> Response {
        self.client
            .delete(self.api(&format!("/{}", song_id)))
            .send()
            .await
            .expect("Delete song request failed")
    }
}
