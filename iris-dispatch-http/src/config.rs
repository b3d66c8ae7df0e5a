use std::path::Path;

use iris_dispatch::config::{self, ConfigResult, DispatchConfig};
use secrecy::SecretString;
use serde::{Deserialize, Deserializer, Serialize};

/// Everything needed to run a bot: webhook credentials, listener address and
/// dispatch settings.
#[derive(Debug, Deserialize)]
pub struct BotConfig {
    /// Shared secret the platform includes in every event.
    #[serde(deserialize_with = "deserialize_secret")]
    pub secret: SecretString,

    /// Id of the account the bot acts for.
    pub user_id: i64,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub dispatch: DispatchConfig,
}

impl BotConfig {
    pub fn new(secret: impl Into<String>, user_id: i64) -> Self {
        Self {
            secret: SecretString::from(secret.into()),
            user_id,
            server: ServerConfig::default(),
            dispatch: DispatchConfig::default(),
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        config::from_file(path)
    }
}

/// Listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Path the platform POSTs events to.
    #[serde(default = "default_path")]
    pub path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            path: default_path(),
        }
    }
}

impl ServerConfig {
    /// Webhook path with a guaranteed leading slash.
    pub fn route_path(&self) -> String {
        if self.path.starts_with('/') {
            self.path.clone()
        } else {
            format!("/{}", self.path)
        }
    }
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(SecretString::from)
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_path() -> String {
    "/".to_string()
}
