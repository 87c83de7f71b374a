use anyhow::{anyhow, Result};
use log::{debug, info};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Top-level configuration structure containing all config sections
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub feed: FeedConfig,

    #[serde(default)]
    pub book: BookConfig,
}

/// Feed connection configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    #[serde(default = "default_ws_url")]
    pub ws_url: String,

    #[serde(default = "default_market")]
    pub market: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            ws_url: default_ws_url(),
            market: default_market(),
        }
    }
}

/// Order book behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BookConfig {
    /// Whether a momentarily crossed book is repaired (see the uncrossing
    /// loop in the order book). Applies for the lifetime of the book.
    #[serde(default = "default_uncross")]
    pub uncross: bool,
}

impl Default for BookConfig {
    fn default() -> Self {
        Self {
            uncross: default_uncross(),
        }
    }
}

fn default_ws_url() -> String {
    "wss://indexer.dydx.trade/v4/ws".to_string()
}

fn default_market() -> String {
    "ETH-USD".to_string()
}

fn default_uncross() -> bool {
    true
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let config_str = fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read config file '{}': {}", path.display(), e))?;

        let config: AppConfig = toml::from_str(&config_str)
            .map_err(|e| anyhow!("Failed to parse config file '{}': {}", path.display(), e))?;

        info!("Loaded configuration from {}", path.display());
        debug!("Watching market: {}", config.feed.market);

        Ok(config)
    }

    /// Load configuration from the first path that exists, falling back to
    /// the built-in defaults when none does. A file that exists but cannot
    /// be read or parsed is an error, never silently replaced by defaults.
    pub fn load_or_default(paths: &[&Path]) -> Result<Self> {
        for path in paths {
            if path.exists() {
                return Self::from_file(path);
            }
            debug!("No config file at {}", path.display());
        }

        info!("No config file found, using built-in defaults");
        Ok(Self::default())
    }

    /// Websocket URL, with the DYDX_WSS_URL environment variable taking
    /// precedence over the config file.
    pub fn ws_url(&self) -> String {
        std::env::var("DYDX_WSS_URL").unwrap_or_else(|_| self.feed.ws_url.clone())
    }
}
