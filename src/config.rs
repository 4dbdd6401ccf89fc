//! Service configuration, loaded from the environment.
//!
//! Every knob has a default, so `central` runs out of the box:
//!
//! | Variable                 | Default           | Meaning                              |
//! |--------------------------|-------------------|--------------------------------------|
//! | `CENTRAL_ADDR`           | `127.0.0.1:9000`  | Listen address                       |
//! | `CENTRAL_QUEUE_CAPACITY` | `10`              | Max pending orders (N)               |
//! | `CENTRAL_WORKERS`        | `4`               | Worker pool size                     |
//! | `CENTRAL_START_QUORUM`   | `1`               | Sessions required to open the gate   |
//! | `CENTRAL_MIN_DELAY_MS`   | `1000`            | Min simulated fulfillment delay      |
//! | `CENTRAL_MAX_DELAY_MS`   | `5000`            | Max simulated fulfillment delay      |
//! | `CENTRAL_CATALOG`        | (built-in seed)   | Path to a JSON `{product: qty}` file |

use std::collections::HashMap;
use std::path::PathBuf;
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

/// Errors raised while assembling a [`ServiceConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },

    #[error("{var} must be at least 1")]
    Zero { var: &'static str },

    #[error("CENTRAL_MIN_DELAY_MS must not exceed CENTRAL_MAX_DELAY_MS")]
    InvertedDelays,

    #[error("failed to read catalog file {path}: {source}")]
    CatalogIo {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse catalog file {path}: {source}")]
    CatalogParse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Fully resolved service configuration.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub addr: String,
    /// Maximum number of pending orders on the queue.
    pub queue_capacity: usize,
    /// Worker pool size.
    pub workers: usize,
    /// Client sessions required before workers start draining.
    pub start_quorum: usize,
    /// Simulated fulfillment delay bounds, in milliseconds.
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
    /// Initial product stock.
    pub catalog: HashMap<String, u32>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:9000".to_string(),
            queue_capacity: 10,
            workers: 4,
            start_quorum: 1,
            min_delay_ms: 1000,
            max_delay_ms: 5000,
            catalog: default_catalog(),
        }
    }
}

impl ServiceConfig {
    /// Builds a configuration from environment variables, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let config = Self {
            addr: std::env::var("CENTRAL_ADDR").unwrap_or(defaults.addr),
            queue_capacity: env_parse("CENTRAL_QUEUE_CAPACITY", defaults.queue_capacity)?,
            workers: env_parse("CENTRAL_WORKERS", defaults.workers)?,
            start_quorum: env_parse("CENTRAL_START_QUORUM", defaults.start_quorum)?,
            min_delay_ms: env_parse("CENTRAL_MIN_DELAY_MS", defaults.min_delay_ms)?,
            max_delay_ms: env_parse("CENTRAL_MAX_DELAY_MS", defaults.max_delay_ms)?,
            catalog: match std::env::var("CENTRAL_CATALOG") {
                Ok(path) => load_catalog(PathBuf::from(path))?,
                Err(_) => defaults.catalog,
            },
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (var, value) in [
            ("CENTRAL_QUEUE_CAPACITY", self.queue_capacity),
            ("CENTRAL_WORKERS", self.workers),
            ("CENTRAL_START_QUORUM", self.start_quorum),
        ] {
            if value == 0 {
                return Err(ConfigError::Zero { var });
            }
        }
        if self.min_delay_ms > self.max_delay_ms {
            return Err(ConfigError::InvertedDelays);
        }
        Ok(())
    }
}

/// On-disk catalog shape: a `{ "product": quantity }` JSON map.
#[derive(Debug, Deserialize)]
#[serde(transparent)]
struct CatalogSeed(HashMap<String, u32>);

impl CatalogSeed {
    /// Upper-cases product keys to match the session layer's lookups.
    fn into_catalog(self) -> HashMap<String, u32> {
        self.0
            .into_iter()
            .map(|(product, quantity)| (product.to_uppercase(), quantity))
            .collect()
    }
}

/// The built-in catalog seed used when no catalog file is configured.
pub fn default_catalog() -> HashMap<String, u32> {
    HashMap::from([
        ("PRODUCT1".to_string(), 100),
        ("PRODUCT2".to_string(), 50),
        ("PRODUCT3".to_string(), 75),
    ])
}

fn env_parse<T: FromStr>(var: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(var) {
        Ok(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { var, value }),
        Err(_) => Ok(default),
    }
}

/// Loads a [`CatalogSeed`] from a JSON file.
fn load_catalog(path: PathBuf) -> Result<HashMap<String, u32>, ConfigError> {
    let raw = std::fs::read_to_string(&path).map_err(|source| ConfigError::CatalogIo {
        path: path.clone(),
        source,
    })?;
    let seed: CatalogSeed =
        serde_json::from_str(&raw).map_err(|source| ConfigError::CatalogParse { path, source })?;
    Ok(seed.into_catalog())
}
