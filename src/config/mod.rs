mod file_config;

pub use file_config::FileConfig;

use crate::server::{RequestsLoggingLevel, ServerConfig};
use anyhow::{bail, Result};
use clap::ValueEnum;
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_ENRICHMENT_TIMEOUT_SEC: u64 = 10;

/// CLI arguments that take part in config resolution.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub db_path: Option<PathBuf>,
    pub host: String,
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub enrichment_url: Option<String>,
    pub enrichment_timeout_sec: u64,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            logging_level: RequestsLoggingLevel::default(),
            enrichment_url: None,
            enrichment_timeout_sec: DEFAULT_ENRICHMENT_TIMEOUT_SEC,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub host: String,
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub enrichment_url: String,
    pub enrichment_timeout_sec: u64,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and an optional TOML file.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let db_path = file
            .db_path
            .map(PathBuf::from)
            .or_else(|| cli.db_path.clone())
            .ok_or_else(|| {
                anyhow::anyhow!("db_path must be specified via --db-path or in config file")
            })?;

        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.is_dir() {
                bail!("Database directory does not exist: {:?}", parent);
            }
        }
        if db_path.is_dir() {
            bail!("db_path is a directory: {:?}", db_path);
        }

        let host = file.host.unwrap_or_else(|| cli.host.clone());
        let port = file.port.unwrap_or(cli.port);

        let logging_level = match file.logging_level {
            Some(level) => match parse_logging_level(&level) {
                Some(level) => level,
                None => bail!("Invalid logging_level in config file: {}", level),
            },
            None => cli.logging_level.clone(),
        };

        let enrichment_url = file
            .enrichment_url
            .or_else(|| cli.enrichment_url.clone())
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "enrichment_url must be specified via --enrichment-url, API_URL or in config file"
                )
            })?;

        let enrichment_timeout_sec = file
            .enrichment_timeout_sec
            .unwrap_or(cli.enrichment_timeout_sec);
        if enrichment_timeout_sec == 0 {
            bail!("enrichment_timeout_sec must be greater than zero");
        }

        Ok(Self {
            db_path,
            host,
            port,
            logging_level,
            enrichment_url,
            enrichment_timeout_sec,
        })
    }

    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            requests_logging_level: self.logging_level.clone(),
            host: self.host.clone(),
            port: self.port,
        }
    }
}

fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn cli_with(temp_dir: &TempDir) -> CliConfig {
        CliConfig {
            db_path: Some(temp_dir.path().join("songs.db")),
            enrichment_url: Some("http://localhost:8081".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_logging_level() {
        assert!(matches!(
            parse_logging_level("none"),
            Some(RequestsLoggingLevel::None)
        ));
        assert!(matches!(
            parse_logging_level("headers"),
            Some(RequestsLoggingLevel::Headers)
        ));
        assert!(matches!(
            parse_logging_level("BODY"),
            Some(RequestsLoggingLevel::Body)
        ));
        assert!(parse_logging_level("verbose").is_none());
    }

    #[test]
    fn test_resolve_cli_only() {
        let temp_dir = TempDir::new().unwrap();
        let cli = CliConfig {
            port: 9000,
            logging_level: RequestsLoggingLevel::Headers,
            enrichment_timeout_sec: 30,
            ..cli_with(&temp_dir)
        };

        let config = AppConfig::resolve(&cli, None).unwrap();

        assert_eq!(config.db_path, temp_dir.path().join("songs.db"));
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 9000);
        assert_eq!(config.logging_level, RequestsLoggingLevel::Headers);
        assert_eq!(config.enrichment_url, "http://localhost:8081");
        assert_eq!(config.enrichment_timeout_sec, 30);
    }

    #[test]
    fn test_defaults() {
        let temp_dir = TempDir::new().unwrap();

        let config = AppConfig::resolve(&cli_with(&temp_dir), None).unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.enrichment_timeout_sec, 10);
        assert_eq!(config.logging_level, RequestsLoggingLevel::Path);
    }

    #[test]
    fn test_resolve_toml_overrides_cli() {
        let temp_dir = TempDir::new().unwrap();
        let cli = CliConfig {
            db_path: Some(PathBuf::from("/should/be/overridden/songs.db")),
            enrichment_url: Some("http://cli:8081".to_string()),
            ..Default::default()
        };
        let toml_db = temp_dir.path().join("from_toml.db");
        let file_config = FileConfig {
            db_path: Some(toml_db.to_string_lossy().to_string()),
            port: Some(4000),
            logging_level: Some("body".to_string()),
            enrichment_url: Some("http://toml:8081".to_string()),
            enrichment_timeout_sec: Some(3),
            ..Default::default()
        };

        let config = AppConfig::resolve(&cli, Some(file_config)).unwrap();

        assert_eq!(config.db_path, toml_db);
        assert_eq!(config.port, 4000);
        assert_eq!(config.logging_level, RequestsLoggingLevel::Body);
        assert_eq!(config.enrichment_url, "http://toml:8081");
        assert_eq!(config.enrichment_timeout_sec, 3);
    }

    #[test]
    fn test_missing_enrichment_url_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let cli = CliConfig {
            enrichment_url: None,
            ..cli_with(&temp_dir)
        };

        let err = AppConfig::resolve(&cli, None).unwrap_err();
        assert!(err.to_string().contains("enrichment_url"));

        let blank = FileConfig {
            enrichment_url: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(AppConfig::resolve(&cli, Some(blank)).is_err());
    }

    #[test]
    fn test_missing_db_path_is_an_error() {
        let cli = CliConfig {
            enrichment_url: Some("http://localhost:8081".to_string()),
            ..Default::default()
        };

        let err = AppConfig::resolve(&cli, None).unwrap_err();
        assert!(err.to_string().contains("db_path"));
    }

    #[test]
    fn test_db_in_missing_directory_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let cli = CliConfig {
            db_path: Some(temp_dir.path().join("nope").join("songs.db")),
            ..cli_with(&temp_dir)
        };

        assert!(AppConfig::resolve(&cli, None).is_err());
    }

    #[test]
    fn test_invalid_logging_level_in_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let file_config = FileConfig {
            logging_level: Some("loud".to_string()),
            ..Default::default()
        };

        assert!(AppConfig::resolve(&cli_with(&temp_dir), Some(file_config)).is_err());
    }

    #[test]
    fn test_load_file_config() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"
port = 3100
enrichment_url = "http://info:8081/"
enrichment_timeout_sec = 5
"#
        )
        .unwrap();

        let file_config = FileConfig::load(&path).unwrap();

        assert_eq!(file_config.port, Some(3100));
        assert_eq!(file_config.enrichment_url.as_deref(), Some("http://info:8081/"));
        assert_eq!(file_config.enrichment_timeout_sec, Some(5));
        assert!(file_config.db_path.is_none());
    }

    #[test]
    fn test_load_rejects_malformed_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "port = \"not a number\"").unwrap();

        assert!(FileConfig::load(&path).is_err());
    }
}
