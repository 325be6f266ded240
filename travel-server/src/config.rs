//! Process configuration from environment variables.

use std::path::PathBuf;
use std::time::Duration;

use crate::cache::CacheConfig;
use crate::feed::{FeedConfig, RefreshConfig};
use crate::planner::ComposeConfig;
use crate::store::RetentionConfig;

/// Default listen port.
pub const DEFAULT_PORT: u16 = 8080;

/// Default SQLite database path.
pub const DEFAULT_DATABASE_PATH: &str = "pricelists.db";

/// Default frontend origin allowed by CORS.
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:8085";

/// Error from reading configuration.
#[derive(Debug, thiserror::Error)]
#[error("invalid value for {name}: {value:?}")]
pub struct ConfigError {
    pub name: &'static str,
    pub value: String,
}

/// Everything the server binary needs to start.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub database_path: PathBuf,

    /// JSON route graph; the built-in solar system is used when unset
    pub route_graph_path: Option<PathBuf>,

    pub cors_origin: Option<String>,
    pub feed: FeedConfig,
    pub refresh: RefreshConfig,
    pub retention: RetentionConfig,
    pub compose: ComposeConfig,
    pub cache: CacheConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            route_graph_path: None,
            cors_origin: Some(DEFAULT_CORS_ORIGIN.to_string()),
            feed: FeedConfig::default(),
            refresh: RefreshConfig::default(),
            retention: RetentionConfig::default(),
            compose: ComposeConfig::default(),
            cache: CacheConfig::default(),
        }
    }
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through `lookup`, falling back to defaults for
    /// unset variables. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        if let Some(port) = get("PORT") {
            config.port = parse("PORT", &port)?;
        }
        if let Some(path) = get("DATABASE_PATH") {
            config.database_path = PathBuf::from(path);
        }
        if let Some(path) = get("ROUTE_GRAPH_PATH") {
            config.route_graph_path = Some(PathBuf::from(path));
        }
        if let Some(origin) = get("CORS_ORIGIN") {
            config.cors_origin = Some(origin);
        }
        if let Some(url) = get("FEED_URL") {
            config.feed = config.feed.with_url(url);
        }
        if let Some(secs) = get("FEED_TIMEOUT_SECS") {
            config.feed = config.feed.with_timeout_secs(parse("FEED_TIMEOUT_SECS", &secs)?);
        }
        if let Some(secs) = get("REFRESH_RETRY_SECS") {
            let secs = parse("REFRESH_RETRY_SECS", &secs)?;
            config.refresh = config.refresh.with_retry_backoff(Duration::from_secs(secs));
        }
        if let Some(max) = get("MAX_PRICELISTS") {
            let max: usize = parse("MAX_PRICELISTS", &max)?;
            if max == 0 {
                return Err(ConfigError {
                    name: "MAX_PRICELISTS",
                    value: max.to_string(),
                });
            }
            config.retention = RetentionConfig::new(max);
        }
        if let Some(mins) = get("MIN_CONNECTION_MINS") {
            let mins: i64 = parse("MIN_CONNECTION_MINS", &mins)?;
            if mins < 0 {
                return Err(ConfigError {
                    name: "MIN_CONNECTION_MINS",
                    value: mins.to_string(),
                });
            }
            config.compose = ComposeConfig::new(mins);
        }

        Ok(config)
    }
}

fn parse<T: std::str::FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError {
        name,
        value: value.to_string(),
    })
}
