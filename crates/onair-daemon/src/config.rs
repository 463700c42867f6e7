use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub cms: CmsConfig,
    #[serde(default)]
    pub live: LiveConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

/// Where the roster and schedule table come from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CmsConfig {
    #[serde(default = "default_cms_base_url")]
    pub base_url: String,
    /// How often to re-fetch roster + schedule, in seconds.
    #[serde(default = "default_cms_refresh_secs")]
    pub refresh_secs: u64,
}

/// The live now-playing feed from the broadcast automation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiveConfig {
    #[serde(default = "default_playlist_url")]
    pub playlist_url: String,
    #[serde(default = "default_live_poll_secs")]
    pub poll_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_http_enabled")]
    pub enabled: bool,
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for CmsConfig {
    fn default() -> Self {
        Self {
            base_url: default_cms_base_url(),
            refresh_secs: default_cms_refresh_secs(),
        }
    }
}

impl Default for LiveConfig {
    fn default() -> Self {
        Self {
            playlist_url: default_playlist_url(),
            poll_secs: default_live_poll_secs(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            enabled: default_http_enabled(),
            bind_address: default_bind_address(),
            port: default_port(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cms: CmsConfig::default(),
            live: LiveConfig::default(),
            http: HttpConfig::default(),
        }
    }
}

fn default_cms_base_url() -> String {
    "http://localhost:3000/api".to_string()
}

fn default_cms_refresh_secs() -> u64 {
    900
}

fn default_playlist_url() -> String {
    "https://chirpradio.appspot.com/api/current_playlist".to_string()
}

fn default_live_poll_secs() -> u64 {
    5
}

fn default_http_enabled() -> bool {
    true
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8787
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(&config_path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        config_dir().join("config.toml")
    }
}

pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("onair")
}

pub fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("onair")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.http.enabled);
        assert_eq!(config.http.port, 8787);
        assert_eq!(config.http.bind_address, "127.0.0.1");
        assert_eq!(config.live.poll_secs, 5);
        assert!(config.live.playlist_url.starts_with("https://"));
        assert!(config.cms.base_url.ends_with("/api"));
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [http]
            port = 9000
            "#,
        )
        .unwrap();
        assert_eq!(config.http.port, 9000);
        assert_eq!(config.http.bind_address, "127.0.0.1");
        assert_eq!(config.cms.refresh_secs, 900);
    }
}
