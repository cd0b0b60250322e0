//! Encoder configuration

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::buffer::MIN_CAPACITY;
use crate::error::ConfigError;

/// Default bound on value nesting.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG: &str = "pgencode.toml";

/// Encoder configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    /// Bytes to reserve when the encoder is built (0 = allocate on first use)
    pub initial_capacity: usize,

    /// Deepest sequence nesting accepted before failing
    pub max_depth: usize,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 0,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// On-disk layout: settings live under an `[encoder]` table.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    encoder: EncoderConfig,
}

impl EncoderConfig {
    /// Create a new configuration builder
    pub fn builder() -> EncoderConfigBuilder {
        EncoderConfigBuilder::default()
    }

    /// Parse from TOML text (`[encoder]` table).
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(content)?;
        file.encoder.validated()
    }

    /// Load from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Fallback locations: `./pgencode.toml`, then
    /// `<config dir>/pgencode/config.toml`.
    pub fn search_paths() -> Vec<PathBuf> {
        std::iter::once(PathBuf::from(LOCAL_CONFIG))
            .chain(dirs::config_dir().map(|dir| dir.join("pgencode").join("config.toml")))
            .collect()
    }

    /// Resolve the configuration to use.
    ///
    /// An explicit path must load. Otherwise the first existing fallback wins,
    /// and defaults apply when none exists. Returns the file that was used.
    pub fn discover(
        explicit: Option<&Path>,
        fallbacks: &[PathBuf],
    ) -> Result<(Self, Option<PathBuf>), ConfigError> {
        if let Some(path) = explicit {
            return Ok((Self::load(path)?, Some(path.to_path_buf())));
        }

        for path in fallbacks {
            if path.exists() {
                tracing::debug!(path = %path.display(), "using config file");
                return Ok((Self::load(path)?, Some(path.clone())));
            }
        }

        Ok((Self::default(), None))
    }

    /// Round `initial_capacity` up to the buffer's `256 * 2^k` series.
    /// A depth of 0 would reject every sequence.
    fn validated(mut self) -> Result<Self, ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::InvalidDepth(self.max_depth));
        }
        if self.initial_capacity > 0 {
            self.initial_capacity = round_capacity(self.initial_capacity)
                .ok_or(ConfigError::InvalidCapacity(self.initial_capacity))?;
        }
        Ok(self)
    }
}

fn round_capacity(requested: usize) -> Option<usize> {
    requested.max(MIN_CAPACITY).checked_next_power_of_two()
}

/// Builder for EncoderConfig
#[derive(Debug, Default)]
pub struct EncoderConfigBuilder {
    config: EncoderConfig,
}

impl EncoderConfigBuilder {
    /// Reserve `bytes` up front
    pub fn initial_capacity(mut self, bytes: usize) -> Self {
        self.config.initial_capacity = bytes;
        self
    }

    /// Set the nesting bound
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.config.max_depth = depth;
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<EncoderConfig, ConfigError> {
        self.config.validated()
    }
}
