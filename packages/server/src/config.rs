use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_NAME: &str = "pagecraft.config.json";

/// Server configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory holding one JSON file per page; pages live in memory only when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    /// Revisions kept per page
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Default tracing filter when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default = "default_cors_permissive")]
    pub cors_permissive: bool,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3030
}

fn default_history_limit() -> usize {
    20
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_cors_permissive() -> bool {
    true
}

impl ServerConfig {
    /// Load `pagecraft.config.json` from a directory, falling back to defaults
    pub fn load(cwd: impl AsRef<Path>) -> anyhow::Result<Self> {
        let config_path = cwd.as_ref().join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            Self::from_file(&config_path)
        } else {
            Ok(ServerConfig::default())
        }
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: ServerConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Resolve `host` (an IP literal or a name such as `localhost`) to the bind address
    pub async fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        tokio::net::lookup_host((self.host.as_str(), self.port))
            .await
            .with_context(|| format!("Failed to resolve host {}", self.host))?
            .next()
            .ok_or_else(|| anyhow::anyhow!("Host {} resolved to no addresses", self.host))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            data_dir: None,
            history_limit: default_history_limit(),
            log_level: default_log_level(),
            cors_permissive: default_cors_permissive(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "port": 8080,
            "dataDir": "/var/lib/pagecraft",
            "historyLimit": 5,
            "corsPermissive": false
        }"#;

        let config: ServerConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.data_dir, Some(PathBuf::from("/var/lib/pagecraft")));
        assert_eq!(config.history_limit, 5);
        assert_eq!(config.log_level, "info");
        assert!(!config.cors_permissive);
    }

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 3030);
        assert_eq!(config.history_limit, 20);
        assert!(config.data_dir.is_none());
    }

    #[tokio::test]
    async fn test_socket_addr_accepts_ip_and_hostname() {
        let config = ServerConfig::default();
        assert_eq!(config.socket_addr().await.unwrap().to_string(), "127.0.0.1:3030");

        let config = ServerConfig {
            host: "localhost".to_string(),
            port: 8080,
            ..ServerConfig::default()
        };
        let addr = config.socket_addr().await.unwrap();
        assert!(addr.ip().is_loopback());
        assert_eq!(addr.port(), 8080);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(ServerConfig::load(dir.path()).unwrap(), ServerConfig::default());

        std::fs::write(dir.path().join(DEFAULT_CONFIG_NAME), r#"{"logLevel": "debug"}"#).unwrap();
        assert_eq!(ServerConfig::load(dir.path()).unwrap().log_level, "debug");
    }
}
