//! Runtime configuration from environment variables.
//!
//! | Variable | Default | Meaning |
//! |---|---|---|
//! | `HOST` | `0.0.0.0` | bind address |
//! | `PORT` | `8080` | bind port |
//! | `STORAGE` | `memory` | `memory`, `file` or `jsonbin` |
//! | `STORAGE_PATH` | `tournament.json` | snapshot file for `file` |
//! | `JSONBIN_URL`, `JSONBIN_KEY` | - | bin location and key for `jsonbin` |
//! | `JSONBIN_KEY_HEADER` | `X-Master-Key` | header carrying the key |
//! | `RNG_SEED` | entropy | fixed seed for reproducible pairings |
//! | `PLACEMENT_POINTS` | `5,3,2,1` | points for placements 1, 2, 3, ... |

use crate::models::PlacementPoints;
use crate::storage::{JsonBinStorage, JsonFileStorage, MemoryStorage, Storage};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum ConfigError {
    #[error("PORT must be a number between 0 and 65535 (got {0:?})")]
    InvalidPort(String),
    #[error("STORAGE must be one of memory, file, jsonbin (got {0:?})")]
    UnknownStorage(String),
    #[error("{0} must be set for the selected storage")]
    MissingVar(&'static str),
    #[error("RNG_SEED must be an unsigned integer (got {0:?})")]
    InvalidSeed(String),
    #[error("PLACEMENT_POINTS must be comma-separated unsigned integers (got {0:?})")]
    InvalidPlacementPoints(String),
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum StorageBackend {
    Memory,
    File(PathBuf),
    JsonBin {
        url: String,
        key: String,
        key_header: Option<String>,
    },
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub storage: StorageBackend,
    pub rng_seed: Option<u64>,
    pub placement_points: PlacementPoints,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            storage: StorageBackend::Memory,
            rng_seed: None,
            placement_points: PlacementPoints::default(),
        }
    }
}

impl Config {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `get`, which returns a variable's value if set.
    pub fn from_lookup<F>(get: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = get("HOST").unwrap_or_else(default_host);
        let port = match get("PORT") {
            Some(p) => p.trim().parse::<u16>().map_err(|_| ConfigError::InvalidPort(p))?,
            None => default_port(),
        };

        let storage = match get("STORAGE").as_deref().map(str::trim) {
            None | Some("memory") => StorageBackend::Memory,
            Some("file") => StorageBackend::File(
                get("STORAGE_PATH")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from("tournament.json")),
            ),
            Some("jsonbin") => StorageBackend::JsonBin {
                url: get("JSONBIN_URL").ok_or(ConfigError::MissingVar("JSONBIN_URL"))?,
                key: get("JSONBIN_KEY").ok_or(ConfigError::MissingVar("JSONBIN_KEY"))?,
                key_header: get("JSONBIN_KEY_HEADER"),
            },
            Some(other) => return Err(ConfigError::UnknownStorage(other.to_string())),
        };

        let rng_seed = match get("RNG_SEED") {
            Some(s) => Some(s.trim().parse::<u64>().map_err(|_| ConfigError::InvalidSeed(s))?),
            None => None,
        };

        let placement_points = match get("PLACEMENT_POINTS") {
            Some(raw) => parse_placement_points(&raw)?,
            None => PlacementPoints::default(),
        };

        Ok(Self {
            host,
            port,
            storage,
            rng_seed,
            placement_points,
        })
    }

    /// Storage backend for this configuration.
    pub fn build_storage(&self) -> Box<dyn Storage> {
        match &self.storage {
            StorageBackend::Memory => Box::new(MemoryStorage::new()),
            StorageBackend::File(path) => Box::new(JsonFileStorage::new(path.clone())),
            StorageBackend::JsonBin {
                url,
                key,
                key_header,
            } => {
                let storage = JsonBinStorage::new(url.clone(), key.clone());
                match key_header {
                    Some(header) => Box::new(storage.with_key_header(header.clone())),
                    None => Box::new(storage),
                }
            }
        }
    }

    /// Seeded when `rng_seed` is set, otherwise from OS entropy.
    pub fn build_rng(&self) -> StdRng {
        match self.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

fn parse_placement_points(raw: &str) -> Result<PlacementPoints, ConfigError> {
    let points = raw
        .split(',')
        .map(|p| p.trim().parse::<u32>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| ConfigError::InvalidPlacementPoints(raw.to_string()))?;
    Ok(PlacementPoints::from_ordered(&points))
}
