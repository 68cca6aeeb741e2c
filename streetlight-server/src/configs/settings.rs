use std::env;
use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Server {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Logger {
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Database {
    /// Realtime database endpoint, e.g. `https://<project>.firebaseio.com`
    pub url: String,
    /// Root key of the device collection
    #[serde(default = "Database::default_collection")]
    pub collection: String,
    /// Opaque service credential sent as the `auth` query parameter
    #[serde(default)]
    pub credential: Option<String>,
    /// Request timeout in seconds
    #[serde(default = "Database::default_timeout")]
    pub timeout: u64,
}

impl Database {
    fn default_collection() -> String {
        String::from("streetlights")
    }

    fn default_timeout() -> u64 {
        5
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Refresh {
    /// Seconds between refresh cycles
    pub interval: u64,
    /// Seconds a fetched collection may be reused
    pub cache_ttl: u64,
}

impl Refresh {
    pub const MIN_INTERVAL: u64 = 5;
    pub const MAX_INTERVAL: u64 = 60;

    pub fn clamp_interval(seconds: u64) -> u64 {
        seconds.clamp(Self::MIN_INTERVAL, Self::MAX_INTERVAL)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(Self::clamp_interval(self.interval))
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl)
    }
}

impl Default for Refresh {
    fn default() -> Self {
        Self {
            interval: 10,
            cache_ttl: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub username: String,
    /// Argon2 PHC string, see the `streetlight-passwd` binary
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Auth {
    pub secret: String,
    pub expiration: u64,
    #[serde(default)]
    pub users: Vec<Account>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub server: Server,
    pub logger: Logger,
    pub database: Database,
    #[serde(default)]
    pub refresh: Refresh,
    pub auth: Auth,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or("development".into());

        Config::builder()
            .add_source(File::with_name("configs/default"))
            .add_source(File::with_name(&format!("configs/{run_mode}")).required(false))
            .add_source(
                Environment::with_prefix("STREETLIGHT")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
