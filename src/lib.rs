//! Song catalog server library
//!
//! Exposes the internal modules for the binary and the integration tests.

pub mod config;
pub mod enrichment;
pub mod server;
pub mod service;
pub mod song_store;
pub mod sqlite_persistence;

pub use enrichment::{EnrichmentClient, SongInfoProvider};
pub use server::{run_server, RequestsLoggingLevel};
pub use service::SongService;
pub use song_store::{SongCatalogStore, SqliteSongStore};
