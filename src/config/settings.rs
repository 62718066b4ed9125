//! Settings structures for ShopSearch-RS configuration

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Main settings structure matching settings.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub outgoing: OutgoingSettings,
    pub vendor: VendorSettings,
    pub rate_limit: RateLimitSettings,
    pub cache: CacheSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings::default(),
            outgoing: OutgoingSettings::default(),
            vendor: VendorSettings::default(),
            rate_limit: RateLimitSettings::default(),
            cache: CacheSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Settings = serde_yaml::from_str(&content)?;
        Ok(settings)
    }

    /// Merge with environment variables
    ///
    /// The vendor credential is only read here, never required: a missing
    /// credential surfaces per request, not at startup.
    pub fn merge_env(&mut self) {
        if let Ok(val) = std::env::var("RAKUTEN_APP_ID") {
            if !val.is_empty() {
                self.vendor.app_id = Some(val);
            }
        }
        if let Ok(val) = std::env::var("SHOPSEARCH_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Ok(val) = std::env::var("SHOPSEARCH_BIND_ADDRESS") {
            self.server.bind_address = val;
        }
    }
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Address to bind to
    pub bind_address: String,
    /// Port to listen on
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// Outbound request settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutgoingSettings {
    /// Vendor request timeout in seconds
    pub request_timeout: f64,
    /// Connection pool size per host
    pub pool_maxsize: usize,
}

impl Default for OutgoingSettings {
    fn default() -> Self {
        Self {
            request_timeout: crate::VENDOR_TIMEOUT as f64,
            pool_maxsize: 10,
        }
    }
}

impl OutgoingSettings {
    /// Request timeout as a `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::from_secs_f64(self.request_timeout)
    }
}

/// Vendor API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VendorSettings {
    /// Application credential for the vendor API
    pub app_id: Option<String>,
    /// Override of the vendor search endpoint (tests point this at a mock)
    pub endpoint: Option<String>,
}

impl Default for VendorSettings {
    fn default() -> Self {
        Self {
            app_id: None,
            endpoint: None,
        }
    }
}

/// Per-client rate limiting settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitSettings {
    /// Maximum admitted requests per window
    pub max_requests: usize,
    /// Window size in seconds
    pub window_secs: u64,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            max_requests: 10,
            window_secs: 60,
        }
    }
}

impl RateLimitSettings {
    /// Window size as a `Duration`
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }
}

/// Response cache settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Time-to-live for a cached result set in seconds
    pub ttl_secs: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self { ttl_secs: 30 }
    }
}

impl CacheSettings {
    /// Time-to-live as a `Duration`
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}
