use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use std::{fmt::Debug, path::PathBuf};
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use song_catalog_server::config::{
    AppConfig, CliConfig, FileConfig, DEFAULT_ENRICHMENT_TIMEOUT_SEC, DEFAULT_PORT,
};
use song_catalog_server::{
    run_server, EnrichmentClient, RequestsLoggingLevel, SongService, SqliteSongStore,
};

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    if path_buf.is_absolute() {
        return Ok(path_buf);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(path_buf))
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to the SQLite database file holding songs and verses.
    #[clap(long, env = "DB_PATH", value_parser = parse_path)]
    pub db_path: Option<PathBuf>,

    /// Optional TOML config file. Values in it override the CLI ones.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// The address to bind to.
    #[clap(long, default_value = "0.0.0.0")]
    pub host: String,

    /// The port to listen on.
    #[clap(short, long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// Base URL of the song info service used to enrich new songs.
    #[clap(long, env = "API_URL")]
    pub enrichment_url: Option<String>,

    /// Timeout in seconds for song info requests.
    #[clap(long, default_value_t = DEFAULT_ENRICHMENT_TIMEOUT_SEC)]
    pub enrichment_timeout_sec: u64,
}

impl CliArgs {
    fn to_cli_config(&self) -> CliConfig {
        CliConfig {
            db_path: self.db_path.clone(),
            host: self.host.clone(),
            port: self.port,
            logging_level: self.logging_level.clone(),
            enrichment_url: self.enrichment_url.clone(),
            enrichment_timeout_sec: self.enrichment_timeout_sec,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading config file {:?}", path);
            Some(FileConfig::load(path)?)
        }
        None => None,
    };
    let config = AppConfig::resolve(&cli_args.to_cli_config(), file_config)?;

    info!("Opening SQLite song database at {:?}...", config.db_path);
    let store = Arc::new(SqliteSongStore::new(&config.db_path)?);

    info!(
        "Song info service at {} (timeout {}s)",
        config.enrichment_url, config.enrichment_timeout_sec
    );
    let enrichment_client = Arc::new(EnrichmentClient::new(
        config.enrichment_url.clone(),
        config.enrichment_timeout_sec,
    )?);

    let song_service = Arc::new(SongService::new(store, enrichment_client));

    info!("Ready to serve at {}:{}!", config.host, config.port);
    run_server(config.server_config(), song_service).await
}
