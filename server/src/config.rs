//! Server configuration.
//!
//! Loaded from a YAML file; every field is optional and falls back to its
//! default. A missing file yields the defaults.

use std::fs;
use std::net::SocketAddr;
use std::path::Path;

use faceflow_cluster::{DEFAULT_PREFIX, DEFAULT_THRESHOLD};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Default listen address.
pub const DEFAULT_LISTEN: &str = ":8080";
/// Default base for share download links.
pub const DEFAULT_SHARE_BASE_URL: &str = "https://share.faceflow.local";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config: read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("config: parse: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("config: invalid listen address {0:?}")]
    InvalidListen(String),

    #[error("config: invalid share_base_url {url:?}: {reason}")]
    InvalidShareUrl { url: String, reason: String },

    #[error("config: similarity_threshold {0} must be in (0, 1]")]
    InvalidThreshold(f32),
}

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Listen address. ":8080" binds all interfaces.
    pub listen: String,

    /// Minimum cosine similarity for a photo to join a cluster.
    pub similarity_threshold: f32,

    /// Prefix for generated cluster ids ("cluster" -> "cluster-1").
    pub cluster_prefix: String,

    /// Base URL for share bundle download links.
    pub share_base_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen: DEFAULT_LISTEN.into(),
            similarity_threshold: DEFAULT_THRESHOLD,
            cluster_prefix: DEFAULT_PREFIX.into(),
            share_base_url: DEFAULT_SHARE_BASE_URL.into(),
        }
    }
}

impl Config {
    /// Loads the config from a YAML file, or returns the defaults if the
    /// file does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&data)
    }

    /// Parses and validates a YAML document.
    pub fn from_yaml(data: &str) -> Result<Self, ConfigError> {
        if data.trim().is_empty() {
            return Ok(Self::default());
        }
        let cfg: Config = serde_yaml::from_str(data)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = self.similarity_threshold;
        if !t.is_finite() || t <= 0.0 || t > 1.0 {
            return Err(ConfigError::InvalidThreshold(t));
        }
        self.socket_addr()?;
        let url = Url::parse(&self.share_base_url).map_err(|e| ConfigError::InvalidShareUrl {
            url: self.share_base_url.clone(),
            reason: e.to_string(),
        })?;
        if url.cannot_be_a_base() {
            return Err(ConfigError::InvalidShareUrl {
                url: self.share_base_url.clone(),
                reason: "cannot be a base".into(),
            });
        }
        Ok(())
    }

    /// Parses `listen`. A leading ':' means all interfaces.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = if self.listen.starts_with(':') {
            format!("0.0.0.0{}", self.listen)
        } else {
            self.listen.clone()
        };
        addr.parse()
            .map_err(|_| ConfigError::InvalidListen(self.listen.clone()))
    }

    /// Clustering parameters for the engine.
    pub fn cluster_config(&self) -> faceflow_cluster::Config {
        faceflow_cluster::Config {
            threshold: self.similarity_threshold,
            prefix: self.cluster_prefix.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.listen, ":8080");
        assert_eq!(cfg.similarity_threshold, 0.8);
        assert_eq!(cfg.cluster_prefix, "cluster");
        assert_eq!(cfg.share_base_url, "https://share.faceflow.local");
        cfg.validate().unwrap();
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let cfg = Config::from_yaml("similarity_threshold: 0.9\n").unwrap();
        assert_eq!(cfg.similarity_threshold, 0.9);
        assert_eq!(cfg.listen, DEFAULT_LISTEN);
        assert_eq!(cfg.share_base_url, DEFAULT_SHARE_BASE_URL);
    }

    #[test]
    fn empty_yaml_is_default() {
        assert_eq!(Config::from_yaml("").unwrap(), Config::default());
    }

    #[test]
    fn missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load(&dir.path().join("nope.yaml")).unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "listen: 127.0.0.1:9000").unwrap();
        writeln!(file, "cluster_prefix: face").unwrap();
        writeln!(file, "share_base_url: https://example.com/share").unwrap();

        let cfg = Config::load(file.path()).unwrap();
        assert_eq!(cfg.socket_addr().unwrap().port(), 9000);
        assert_eq!(cfg.cluster_config().prefix, "face");
        assert_eq!(cfg.share_base_url, "https://example.com/share");
    }

    #[test]
    fn colon_port_binds_all_interfaces() {
        let addr = Config::default().socket_addr().unwrap();
        assert_eq!(addr.to_string(), "0.0.0.0:8080");
    }

    #[test]
    fn invalid_values_rejected() {
        assert!(matches!(
            Config::from_yaml("similarity_threshold: 1.5"),
            Err(ConfigError::InvalidThreshold(_))
        ));
        assert!(matches!(
            Config::from_yaml("listen: not-an-address"),
            Err(ConfigError::InvalidListen(_))
        ));
        assert!(matches!(
            Config::from_yaml("share_base_url: nope"),
            Err(ConfigError::InvalidShareUrl { .. })
        ));
        assert!(matches!(
            Config::from_yaml("listen: [1, 2"),
            Err(ConfigError::Parse(_))
        ));
    }
}
