//! Shared constants for end-to-end tests
//!
//! The fake song info service knows exactly the songs listed here.

// ============================================================================
// Known songs
// ============================================================================

pub const MUSE: &str = "Muse";
pub const QUEEN: &str = "Queen";

pub const SONG_1_TITLE: &str = "Supermassive Black Hole";
pub const SONG_1_RELEASE_DATE: &str = "16.07.2006";
pub const SONG_1_TEXT: &str = "Ooh baby, don't you know I suffer?\nOoh baby, can you hear me moan?\n\nYou caught me under false pretenses\nHow long before you let me go?\n\nOoh\nYou set my soul alight";
pub const SONG_1_VERSES: usize = 3;
pub const SONG_1_LINK: &str = "https://www.youtube.com/watch?v=Xsp3_a-PMTw";

pub const SONG_2_TITLE: &str = "Hysteria";
pub const SONG_2_RELEASE_DATE: &str = "01.12.2003";
pub const SONG_2_TEXT: &str = "verse one\n\nverse two";
pub const SONG_2_LINK: &str = "https://example.com/hysteria";

pub const SONG_3_TITLE: &str = "Bohemian Rhapsody";
pub const SONG_3_RELEASE_DATE: &str = "31.10.1975";
pub const SONG_3_TEXT: &str = "Is this the real life?\nIs this just fantasy?";
pub const SONG_3_LINK: &str = "https://example.com/bohemian-rhapsody";

/// Group name the fake info service answers with an undecodable body
pub const GARBAGE_GROUP: &str = "Garbage Output";

/// Group name the fake info service answers too slowly
pub const SLOW_GROUP: &str = "Slow Band";

// ============================================================================
// Timeouts
// ============================================================================

pub const REQUEST_TIMEOUT_SECS: u64 = 10;

pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 20;

/// Enrichment timeout used by servers that talk to the slow group
pub const SHORT_ENRICHMENT_TIMEOUT_SECS: u64 = 1;

/// How long the fake info service stalls for [`SLOW_GROUP`]
pub const SLOW_RESPONSE_SECS: u64 = 3;
