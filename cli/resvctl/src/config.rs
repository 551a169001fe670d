//! Configuration and endpoint layout.
//!
//! Handles:
//! - Cluster URL and ACS token
//! - Master and agent API path prefixes
//! - HTTP timeout

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

/// Configuration file name.
const CONFIG_FILE: &str = "config.json";

/// Get the config directory path.
fn config_dir() -> Result<PathBuf> {
    ProjectDirs::from("io", "resvctl", "resvctl")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
}

/// CLI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Cluster URL; master and agent paths are resolved against it.
    #[serde(default = "default_cluster_url")]
    pub cluster_url: String,

    /// Path of the master operator API.
    #[serde(default = "default_master_api_path")]
    pub master_api_path: String,

    /// Path prefix under which agents are proxied.
    #[serde(default = "default_agent_path_prefix")]
    pub agent_path_prefix: String,

    /// ACS token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_cluster_url() -> String {
    std::env::var("RESV_CLUSTER_URL").unwrap_or_else(|_| "http://localhost".to_string())
}

fn default_master_api_path() -> String {
    "/mesos/api/v1".to_string()
}

fn default_agent_path_prefix() -> String {
    "/agent".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cluster_url: default_cluster_url(),
            master_api_path: default_master_api_path(),
            agent_path_prefix: default_agent_path_prefix(),
            token: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Config {
    /// Load config from disk, or return default.
    pub fn load() -> Result<Self> {
        let path = config_dir()?.join(CONFIG_FILE);

        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;

        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config from {:?}", path))
    }

    /// Apply command-line overrides.
    pub fn with_overrides(mut self, cluster_url: Option<String>, token: Option<String>) -> Self {
        if let Some(url) = cluster_url {
            self.cluster_url = url;
        }
        if token.is_some() {
            self.token = token;
        }
        self
    }

    pub fn endpoints(&self) -> Endpoints {
        Endpoints {
            master_api_path: self.master_api_path.trim_end_matches('/').to_string(),
            agent_path_prefix: self.agent_path_prefix.trim_end_matches('/').to_string(),
        }
    }
}

/// Master and agent API paths, relative to the cluster URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    master_api_path: String,
    agent_path_prefix: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Config::default().endpoints()
    }
}

impl Endpoints {
    /// Master operator API.
    pub fn master(&self) -> &str {
        &self.master_api_path
    }

    /// Agent v0 root; `/state` hangs off it.
    pub fn agent_v0(&self, agent_id: &str) -> String {
        format!("{}/{}", self.agent_path_prefix, agent_id)
    }

    /// Agent v1 operator API.
    pub fn agent_v1(&self, agent_id: &str) -> String {
        format!("{}/{}/api/v1", self.agent_path_prefix, agent_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(!config.cluster_url.is_empty());
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_endpoint_layout() {
        let endpoints = Endpoints::default();
        assert_eq!(endpoints.master(), "/mesos/api/v1");
        assert_eq!(endpoints.agent_v0("a1"), "/agent/a1");
        assert_eq!(endpoints.agent_v1("a1"), "/agent/a1/api/v1");
    }

    #[test]
    fn test_trailing_slashes_are_trimmed() {
        let config = Config {
            master_api_path: "/mesos/api/v1/".into(),
            agent_path_prefix: "/slave/".into(),
            ..Config::default()
        };
        let endpoints = config.endpoints();
        assert_eq!(endpoints.master(), "/mesos/api/v1");
        assert_eq!(endpoints.agent_v0("a1"), "/slave/a1");
    }

    #[test]
    fn test_partial_config_file_uses_defaults() {
        let config: Config =
            serde_json::from_str(r#"{ "cluster_url": "https://dcos.example.com" }"#).unwrap();
        assert_eq!(config.cluster_url, "https://dcos.example.com");
        assert_eq!(config.master_api_path, "/mesos/api/v1");
        assert_eq!(config.token, None);
    }

    #[test]
    fn test_overrides() {
        let config = Config::default()
            .with_overrides(Some("https://leader.mesos".into()), Some("t0k3n".into()));
        assert_eq!(config.cluster_url, "https://leader.mesos");
        assert_eq!(config.token.as_deref(), Some("t0k3n"));
    }
}
