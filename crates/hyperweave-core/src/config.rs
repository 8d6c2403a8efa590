//! Hypergraph configuration

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Digest used by the default identity provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestAlgorithm {
    /// 48-byte identifiers
    #[default]
    Sha384,
    /// 32-byte identifiers
    Sha256,
}

impl DigestAlgorithm {
    /// Length in bytes of every identifier produced with this digest
    pub fn output_len(&self) -> usize {
        match self {
            Self::Sha384 => 48,
            Self::Sha256 => 32,
        }
    }
}

/// Graph-wide settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HypergraphConfig {
    /// Reject elements whose GUID is already present in the graph
    #[serde(default = "default_true")]
    pub unique_guids: bool,

    /// Removing a child that is not present is an error (otherwise a no-op)
    #[serde(default = "default_true")]
    pub strict_removal: bool,

    /// Digest for the default identity provider
    #[serde(default)]
    pub digest: DigestAlgorithm,
}

fn default_true() -> bool {
    true
}

impl Default for HypergraphConfig {
    fn default() -> Self {
        Self {
            unique_guids: default_true(),
            strict_removal: default_true(),
            digest: DigestAlgorithm::default(),
        }
    }
}

impl HypergraphConfig {
    /// Parse a configuration from TOML; missing keys take their defaults
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        tracing::debug!(
            "Loaded hypergraph config: unique_guids={}, strict_removal={}, digest={:?}",
            config.unique_guids,
            config.strict_removal,
            config.digest
        );
        Ok(config)
    }

    pub fn with_strict_removal(mut self, strict: bool) -> Self {
        self.strict_removal = strict;
        self
    }

    pub fn with_digest(mut self, digest: DigestAlgorithm) -> Self {
        self.digest = digest;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_defaults() {
        let config = HypergraphConfig::default();
        assert!(config.unique_guids);
        assert!(config.strict_removal);
        assert_eq!(config.digest, DigestAlgorithm::Sha384);
        assert_eq!(config.digest.output_len(), 48);
    }

    #[test]
    fn test_from_toml_partial() {
        let config = HypergraphConfig::from_toml_str("strict_removal = false\ndigest = \"sha256\"")
            .unwrap();
        assert!(config.unique_guids);
        assert!(!config.strict_removal);
        assert_eq!(config.digest, DigestAlgorithm::Sha256);
    }

    #[test]
    fn test_from_toml_empty() {
        let config = HypergraphConfig::from_toml_str("").unwrap();
        assert_eq!(config, HypergraphConfig::default());
    }

    #[test]
    fn test_from_toml_invalid() {
        let err = HypergraphConfig::from_toml_str("digest = \"md5\"").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
