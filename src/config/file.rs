//! Configuration file handling

use super::ProviderConfig;
use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration file structure
///
/// Supplies default provider endpoints so frequent audits don't need the
/// URLs on every invocation; CLI flags and environment variables win over
/// file values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Global settings
    #[serde(default)]
    pub settings: Settings,

    /// Default provider A
    #[serde(default)]
    pub provider_a: Option<ProviderConfig>,

    /// Default provider B
    #[serde(default)]
    pub provider_b: Option<ProviderConfig>,
}

/// Global settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_timeout() -> u64 {
    super::DEFAULT_TIMEOUT_SECS
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
        }
    }
}

impl ConfigFile {
    /// Get the default config file path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("eth-log-audit")
            .join("config.toml")
    }

    /// Load from default path
    pub fn load_default() -> Result<Option<Self>> {
        let path = Self::default_path();
        if path.exists() {
            Ok(Some(Self::load(&path)?))
        } else {
            Ok(None)
        }
    }

    /// Load from a specific path
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::InvalidFile(format!("{}: {}", path.display(), e)))?;

        let config: Self = toml::from_str(&content).map_err(ConfigError::from)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml = r#"
[settings]
timeout_seconds = 45

[provider_a]
url = "https://mainnet.infura.io/v3/key"
max_block_range = 5000

[provider_b]
url = "https://eth.llamarpc.com"
"#;

        let config: ConfigFile = toml::from_str(toml).unwrap();
        assert_eq!(config.settings.timeout_seconds, 45);
        assert_eq!(
            config.provider_a.as_ref().unwrap().url,
            "https://mainnet.infura.io/v3/key"
        );
        assert_eq!(config.provider_a.unwrap().max_block_range, 5000);
        // Unset range limit falls back to the default
        assert_eq!(config.provider_b.unwrap().max_block_range, 10_000);
    }

    #[test]
    fn test_empty_config() {
        let config: ConfigFile = toml::from_str("").unwrap();
        assert!(config.provider_a.is_none());
        assert_eq!(config.settings.timeout_seconds, 20);
    }

    #[test]
    fn test_default_path() {
        let path = ConfigFile::default_path();
        assert!(path.to_string_lossy().contains("eth-log-audit"));
    }
}
