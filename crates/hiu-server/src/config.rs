use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, time::Duration};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    /// Consent manager gateway
    #[serde(default)]
    pub gateway: GatewayConfig,
    /// Identity of this HIU towards the gateway
    #[serde(default)]
    pub hiu: HiuConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.server.port == 0 {
            return Err("server.port must be > 0".into());
        }
        if self.server.body_limit_bytes == 0 {
            return Err("server.body_limit_bytes must be > 0".into());
        }
        if self.gateway.base_url.trim().is_empty() {
            return Err("gateway.base_url must not be empty".into());
        }
        if !(self.gateway.base_url.starts_with("http://")
            || self.gateway.base_url.starts_with("https://"))
        {
            return Err("gateway.base_url must be an http(s) URL".into());
        }
        if self.gateway.request_timeout_ms == 0 {
            return Err("gateway.request_timeout_ms must be > 0".into());
        }
        if self.hiu.id.trim().is_empty() {
            return Err("hiu.id must not be empty".into());
        }
        if self.cache.result_ttl_secs == 0 || self.cache.correlation_ttl_secs == 0 {
            return Err("cache TTLs must be > 0".into());
        }
        if self.cache.cleanup_interval_secs == 0 {
            return Err("cache.cleanup_interval_secs must be > 0".into());
        }
        let lvl = self.logging.level.to_ascii_lowercase();
        let valid_levels = ["trace", "debug", "info", "warn", "error", "off"];
        if !valid_levels.contains(&lvl.as_str()) {
            return Err(format!("logging.level must be one of {valid_levels:?}"));
        }
        Ok(())
    }

    pub fn addr(&self) -> SocketAddr {
        use std::net::{IpAddr, Ipv4Addr};
        let host: IpAddr = self
            .server
            .host
            .parse()
            .unwrap_or(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)));
        SocketAddr::from((host, self.server.port))
    }

    pub fn gateway_timeout(&self) -> Duration {
        Duration::from_millis(self.gateway.request_timeout_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
}

fn default_host() -> String {
    "0.0.0.0".into()
}
fn default_port() -> u16 {
    8003
}
fn default_body_limit() -> usize {
    1024 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            body_limit_bytes: default_body_limit(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_gateway_url")]
    pub base_url: String,
    /// Upper bound on one request/callback exchange.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    /// Static bearer token sent with every outbound request.
    #[serde(default)]
    pub bearer_token: Option<String>,
}

fn default_gateway_url() -> String {
    "http://localhost:8000".into()
}
fn default_request_timeout_ms() -> u64 {
    2000
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: default_gateway_url(),
            request_timeout_ms: default_request_timeout_ms(),
            bearer_token: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HiuConfig {
    #[serde(default = "default_hiu_id")]
    pub id: String,
}

fn default_hiu_id() -> String {
    "10000005".into()
}

impl Default for HiuConfig {
    fn default() -> Self {
        Self { id: default_hiu_id() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// How long a resolved lookup is served without asking the gateway again
    #[serde(default = "default_result_ttl")]
    pub result_ttl_secs: u64,
    /// How long an unclaimed gateway reply is kept
    #[serde(default = "default_correlation_ttl")]
    pub correlation_ttl_secs: u64,
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_secs: u64,
}

fn default_result_ttl() -> u64 {
    300
}
fn default_correlation_ttl() -> u64 {
    60
}
fn default_cleanup_interval() -> u64 {
    60
}

impl CacheConfig {
    pub fn result_ttl(&self) -> Duration {
        Duration::from_secs(self.result_ttl_secs)
    }
    pub fn correlation_ttl(&self) -> Duration {
        Duration::from_secs(self.correlation_ttl_secs)
    }
    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_secs)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            result_ttl_secs: default_result_ttl(),
            correlation_ttl_secs: default_correlation_ttl(),
            cleanup_interval_secs: default_cleanup_interval(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}
fn default_log_level() -> String {
    "info".into()
}
impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

pub mod loader {
    use super::AppConfig;
    use config::{Config, Environment, File};
    use std::path::PathBuf;

    pub const DEFAULT_CONFIG_FILE: &str = "hiu.toml";

    pub fn load_config(path: Option<&str>) -> Result<AppConfig, String> {
        let mut builder = Config::builder();
        let pathbuf = PathBuf::from(path.unwrap_or(DEFAULT_CONFIG_FILE));
        if pathbuf.exists() {
            builder = builder.add_source(File::from(pathbuf));
        }
        // Environment variable overrides, e.g., HIU__GATEWAY__REQUEST_TIMEOUT_MS=5000
        builder = builder.add_source(
            Environment::with_prefix("HIU")
                .try_parsing(true)
                .separator("__"),
        );
        let cfg = builder
            .build()
            .map_err(|e| format!("config build error: {e}"))?;
        let merged: AppConfig = cfg
            .try_deserialize()
            .map_err(|e| format!("config deserialize error: {e}"))?;
        merged.validate()?;
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let cfg = AppConfig::default();
        cfg.validate().unwrap();
        assert_eq!(cfg.gateway_timeout(), Duration::from_millis(2000));
        assert_eq!(cfg.addr().port(), 8003);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut cfg = AppConfig::default();
        cfg.gateway.request_timeout_ms = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = AppConfig::default();
        cfg.gateway.base_url = "gateway.local".into();
        assert!(cfg.validate().unwrap_err().contains("http"));

        let mut cfg = AppConfig::default();
        cfg.logging.level = "loud".into();
        assert!(cfg.validate().is_err());

        let mut cfg = AppConfig::default();
        cfg.hiu.id = " ".into();
        assert!(cfg.validate().is_err());
    }
}
