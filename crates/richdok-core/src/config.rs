//! Compiler configuration
//!
//! Settings are read from TOML. Every field has a default, so an empty file
//! (or no file at all) gives the standard behaviour:
//!
//! ```toml
//! empty_block_type = "unstyled"
//!
//! [keys]
//! strategy = "sequential"
//! prefix = "blk-"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CompileError, Result};
use crate::keys::{KeyGenerator, RandomKeys, SequentialKeys};

/// Block type of the canonical empty block
pub const DEFAULT_BLOCK_TYPE: &str = "unstyled";

/// How block keys are generated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum KeyStrategy {
    /// Short random base-32 keys
    #[default]
    Random,
    /// `prefix` followed by a counter starting at 0
    Sequential,
}

/// Key generation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyConfig {
    pub strategy: KeyStrategy,
    /// Prefix for sequential keys
    pub prefix: String,
}

impl Default for KeyConfig {
    fn default() -> Self {
        Self {
            strategy: KeyStrategy::Random,
            prefix: "b".to_string(),
        }
    }
}

/// Top-level compiler configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Block key settings
    pub keys: KeyConfig,
    /// Type given to the single block of an empty document
    pub empty_block_type: String,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            keys: KeyConfig::default(),
            empty_block_type: DEFAULT_BLOCK_TYPE.to_string(),
        }
    }
}

impl CompilerConfig {
    /// Parse configuration from a TOML string
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Configuration producing deterministic `prefix`-numbered keys
    pub fn sequential(prefix: impl Into<String>) -> Self {
        Self {
            keys: KeyConfig {
                strategy: KeyStrategy::Sequential,
                prefix: prefix.into(),
            },
            ..Self::default()
        }
    }

    /// Check settings that TOML types alone cannot enforce
    pub fn validate(&self) -> Result<()> {
        if self.empty_block_type.is_empty() {
            return Err(CompileError::Config(
                "empty_block_type must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Build the key generator selected by this configuration
    pub fn key_generator(&self) -> Box<dyn KeyGenerator> {
        match self.keys.strategy {
            KeyStrategy::Random => Box::new(RandomKeys::new()),
            KeyStrategy::Sequential => Box::new(SequentialKeys::new(self.keys.prefix.clone())),
        }
    }
}
