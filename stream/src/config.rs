use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use banter_attachments::DEFAULT_CACHE_CAPACITY;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Caller-side streaming policy. The parser itself has no knobs; everything
/// here tunes when and on how much of the buffer it runs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StreamConfig {
    /// Minimum milliseconds between interim reparses of the growing buffer.
    #[serde(default = "default_update_interval_ms")]
    pub update_interval_ms: u64,

    /// Interim parses read at most this many characters of the buffer; 0
    /// disables truncation. The final parse always reads everything, and a
    /// buffer carrying image markers is never truncated.
    #[serde(default = "default_interactive_parse_limit")]
    pub interactive_parse_limit: usize,

    /// Capacity of the resolved-attachment cache, in entries.
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
}

fn default_update_interval_ms() -> u64 {
    100
}

fn default_interactive_parse_limit() -> usize {
    20_000
}

fn default_cache_capacity() -> usize {
    DEFAULT_CACHE_CAPACITY
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            update_interval_ms: default_update_interval_ms(),
            interactive_parse_limit: default_interactive_parse_limit(),
            cache_capacity: default_cache_capacity(),
        }
    }
}

impl StreamConfig {
    pub fn update_interval(&self) -> Duration {
        Duration::from_millis(self.update_interval_ms)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&contents)?)
    }
}
