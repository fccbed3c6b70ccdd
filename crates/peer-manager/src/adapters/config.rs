use crate::domain::PeerManagerConfig;
use crate::ports::ConfigProvider;

// ============================================================================
// StaticConfigProvider - Config built in code
// ============================================================================

/// Configuration provider holding a config built in code.
///
/// Useful for tests and the simulator. For deployments, use
/// `TomlConfigProvider`.
#[derive(Debug, Clone, Default)]
pub struct StaticConfigProvider {
    config: PeerManagerConfig,
}

impl StaticConfigProvider {
    /// Create with the default config.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the config.
    #[must_use]
    pub fn with_config(mut self, config: PeerManagerConfig) -> Self {
        self.config = config;
        self
    }
}

impl ConfigProvider for StaticConfigProvider {
    fn get_config(&self) -> PeerManagerConfig {
        self.config.clone()
    }
}

// ============================================================================
// TomlConfigProvider - Config file loading (requires "config" feature)
// ============================================================================

#[cfg(feature = "config")]
mod toml_config {
    use std::fs;
    use std::path::Path;

    use serde::Deserialize;
    use thiserror::Error;

    use super::*;
    use crate::domain::{
        PeerId, DEFAULT_ARCHIVE_SLICE_SIZE, DEFAULT_DISCOVERY_INTERVAL_MS, DEFAULT_MAX_PEERS,
    };

    #[derive(Debug, Deserialize)]
    #[serde(deny_unknown_fields)]
    struct ConfigFile {
        #[serde(default)]
        peers: PeersSection,
        bootstrap: Option<BootstrapSection>,
    }

    #[derive(Debug, Deserialize, Default)]
    #[serde(deny_unknown_fields)]
    struct PeersSection {
        max_peers: Option<usize>,
        discovery_interval_ms: Option<u64>,
        archive_slice_size: Option<usize>,
        rng_seed: Option<u64>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(deny_unknown_fields)]
    struct BootstrapSection {
        #[serde(default)]
        nodes: Vec<u64>,
    }

    /// TOML-based configuration provider.
    ///
    /// Every key is optional; missing ones take the defaults. Leaving out the
    /// `[bootstrap]` table keeps the default seed, an empty `nodes` list
    /// starts with no seeds at all.
    ///
    /// # Config File Format
    ///
    /// ```toml
    /// [peers]
    /// max_peers = 8
    /// discovery_interval_ms = 1000
    /// archive_slice_size = 15
    /// rng_seed = 42
    ///
    /// [bootstrap]
    /// nodes = [0, 1, 2]
    /// ```
    #[derive(Debug, Clone)]
    pub struct TomlConfigProvider {
        config: PeerManagerConfig,
    }

    impl TomlConfigProvider {
        /// Load configuration from a TOML file.
        ///
        /// # Errors
        ///
        /// Returns error if the file cannot be read, parsed, or validated.
        pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
            let content = fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
                path: path.as_ref().display().to_string(),
                error: e.to_string(),
            })?;

            Self::parse(&content)
        }

        /// Parse configuration from a TOML string.
        ///
        /// # Errors
        ///
        /// Returns error on malformed TOML, unknown keys, or values that fail
        /// validation.
        pub fn parse(content: &str) -> Result<Self, ConfigError> {
            let file: ConfigFile =
                toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;

            let defaults = PeerManagerConfig::default();
            let config = PeerManagerConfig {
                max_peers: file.peers.max_peers.unwrap_or(DEFAULT_MAX_PEERS),
                discovery_interval_ms: file
                    .peers
                    .discovery_interval_ms
                    .unwrap_or(DEFAULT_DISCOVERY_INTERVAL_MS),
                archive_slice_size: file
                    .peers
                    .archive_slice_size
                    .unwrap_or(DEFAULT_ARCHIVE_SLICE_SIZE),
                bootstrap_nodes: match file.bootstrap {
                    Some(section) => section.nodes.into_iter().map(PeerId::new).collect(),
                    None => defaults.bootstrap_nodes,
                },
                rng_seed: file.peers.rng_seed,
            };

            config
                .validate()
                .map_err(|e| ConfigError::Invalid(e.to_string()))?;

            Ok(Self { config })
        }

        /// The loaded config.
        pub fn config(&self) -> &PeerManagerConfig {
            &self.config
        }
    }

    impl ConfigProvider for TomlConfigProvider {
        fn get_config(&self) -> PeerManagerConfig {
            self.config.clone()
        }
    }

    /// Errors that can occur during config loading.
    #[derive(Debug, Clone, PartialEq, Eq, Error)]
    pub enum ConfigError {
        /// File I/O error.
        #[error("Failed to read {path}: {error}")]
        Io {
            /// Path of the file that failed to load.
            path: String,
            /// Error message from the I/O operation.
            error: String,
        },
        /// TOML parsing error.
        #[error("Failed to parse config: {0}")]
        Parse(String),
        /// Parsed values are unusable.
        #[error("Invalid config: {0}")]
        Invalid(String),
    }
}

#[cfg(feature = "config")]
pub use toml_config::{ConfigError, TomlConfigProvider};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_provider_returns_config() {
        let config = PeerManagerConfig::for_testing().with_max_peers(5);
        let provider = StaticConfigProvider::new().with_config(config.clone());
        assert_eq!(provider.get_config(), config);
    }

    #[test]
    fn test_static_provider_defaults() {
        assert_eq!(
            StaticConfigProvider::new().get_config(),
            PeerManagerConfig::default()
        );
    }

    #[cfg(feature = "config")]
    mod toml_file {
        use super::super::*;
        use crate::domain::PeerId;

        #[test]
        fn test_parse_full_file() {
            let provider = TomlConfigProvider::parse(
                r#"
                [peers]
                max_peers = 4
                discovery_interval_ms = 250
                archive_slice_size = 5
                rng_seed = 42

                [bootstrap]
                nodes = [0, 9]
                "#,
            )
            .unwrap();

            let config = provider.get_config();
            assert_eq!(config.max_peers, 4);
            assert_eq!(config.discovery_interval_ms, 250);
            assert_eq!(config.archive_slice_size, 5);
            assert_eq!(config.rng_seed, Some(42));
            assert_eq!(config.bootstrap_nodes, vec![PeerId::new(0), PeerId::new(9)]);
        }

        #[test]
        fn test_parse_empty_file_uses_defaults() {
            let provider = TomlConfigProvider::parse("").unwrap();
            assert_eq!(provider.get_config(), PeerManagerConfig::default());
        }

        #[test]
        fn test_empty_bootstrap_list_means_no_seeds() {
            let provider = TomlConfigProvider::parse("[bootstrap]\nnodes = []\n").unwrap();
            assert!(provider.get_config().bootstrap_nodes.is_empty());
        }

        #[test]
        fn test_parse_rejects_zero_max_peers() {
            let result = TomlConfigProvider::parse("[peers]\nmax_peers = 0\n");
            assert!(matches!(result, Err(ConfigError::Invalid(_))));
        }

        #[test]
        fn test_parse_rejects_unknown_keys() {
            let result = TomlConfigProvider::parse("[peers]\nmaxpeers = 3\n");
            assert!(matches!(result, Err(ConfigError::Parse(_))));
        }

        #[test]
        fn test_load_missing_file() {
            let result = TomlConfigProvider::load("/nonexistent/peermgr.toml");
            assert!(matches!(result, Err(ConfigError::Io { .. })));
        }
    }
}
