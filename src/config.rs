//! Configuration management for the RPS server and client
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! environment variables. Command-line flags are applied on top by the
//! binaries before validation.

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::protocol::DEFAULT_MAX_FRAME_BYTES;

pub const DEFAULT_PORT: u16 = 7777;
pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_MAX_NAME_LENGTH: usize = 64;
const DEFAULT_EVENT_QUEUE_CAPACITY: usize = 64;

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Host name or IP address to listen on
    /// Environment: RPS_SERVER_BIND_ADDRESS
    pub bind_address: String,

    /// Environment: RPS_SERVER_PORT
    pub port: u16,

    /// Largest accepted frame body in bytes
    pub max_frame_bytes: usize,

    /// Capacity of the channel between connection readers and the coordinator
    pub event_queue_capacity: usize,

    /// Longest accepted player name, in characters
    pub max_name_length: usize,
}

/// Player client configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ClientConfig {
    /// Environment: RPS_CLIENT_HOST
    pub host: String,

    /// Environment: RPS_CLIENT_PORT
    pub port: u16,

    /// Player name; prompted for interactively when absent
    /// Environment: RPS_CLIENT_NAME
    #[serde(default)]
    pub name: Option<String>,

    pub max_frame_bytes: usize,

    pub max_name_length: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            max_frame_bytes: DEFAULT_MAX_FRAME_BYTES,
            event_queue_capacity: DEFAULT_EVENT_QUEUE_CAPACITY,
            max_name_length: DEFAULT_MAX_NAME_LENGTH,
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            name: None,
            max_frame_bytes: DEFAULT_MAX_FRAME_BYTES,
            max_name_length: DEFAULT_MAX_NAME_LENGTH,
        }
    }
}

impl ServerConfig {
    /// Load configuration from defaults, `rps-server.toml` and `RPS_SERVER_*` variables
    ///
    /// Not validated here; callers apply their overrides first.
    pub fn load() -> Result<Self, config::ConfigError> {
        let defaults = ServerConfig::default();
        let settings = Config::builder()
            .set_default("bind_address", defaults.bind_address)?
            .set_default("port", i64::from(defaults.port))?
            .set_default("max_frame_bytes", defaults.max_frame_bytes as i64)?
            .set_default("event_queue_capacity", defaults.event_queue_capacity as i64)?
            .set_default("max_name_length", defaults.max_name_length as i64)?
            .add_source(File::with_name("rps-server").required(false))
            .add_source(Environment::with_prefix("RPS_SERVER").try_parsing(true))
            .build()?;

        settings.try_deserialize()
    }

    /// Validation for all configuration values
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.bind_address.trim().is_empty() {
            return Err(config::ConfigError::Message(
                "bind_address cannot be empty".into(),
            ));
        }

        if self.max_frame_bytes == 0 {
            return Err(config::ConfigError::Message(
                "max_frame_bytes must be greater than 0".into(),
            ));
        }

        if self.event_queue_capacity == 0 {
            return Err(config::ConfigError::Message(
                "event_queue_capacity must be greater than 0".into(),
            ));
        }

        if self.max_name_length == 0 {
            return Err(config::ConfigError::Message(
                "max_name_length must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Get bind address and port as a listen address
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

impl ClientConfig {
    /// Load configuration from defaults, `rps-client.toml` and `RPS_CLIENT_*` variables
    pub fn load() -> Result<Self, config::ConfigError> {
        let defaults = ClientConfig::default();
        let settings = Config::builder()
            .set_default("host", defaults.host)?
            .set_default("port", i64::from(defaults.port))?
            .set_default("max_frame_bytes", defaults.max_frame_bytes as i64)?
            .set_default("max_name_length", defaults.max_name_length as i64)?
            .add_source(File::with_name("rps-client").required(false))
            .add_source(Environment::with_prefix("RPS_CLIENT").try_parsing(true))
            .build()?;

        settings.try_deserialize()
    }

    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.host.trim().is_empty() {
            return Err(config::ConfigError::Message("host cannot be empty".into()));
        }

        if self.port == 0 {
            return Err(config::ConfigError::Message("port cannot be 0".into()));
        }

        if self.max_frame_bytes == 0 || self.max_name_length == 0 {
            return Err(config::ConfigError::Message(
                "max_frame_bytes and max_name_length must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
