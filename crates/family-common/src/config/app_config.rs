//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file when
//! present).

use family_core::{AccountRecord, AccountStatus};
use serde::Deserialize;
use std::env;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub api: ServerConfig,
    pub directory: DirectoryConfig,
    pub sync: SyncConfig,
    pub invite: InviteConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default)]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "production" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" => Some(Self::Development),
            _ => None,
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Account and record state for the in-process directory service
#[derive(Debug, Clone, Deserialize)]
pub struct DirectoryConfig {
    /// Signed-in account id; empty means the directory reports no identity
    #[serde(default)]
    pub account_id: String,
    #[serde(default = "default_account_status")]
    pub account_status: AccountStatus,
    #[serde(default)]
    pub account: AccountRecord,
    /// Seed the directory with the sample family
    #[serde(default)]
    pub seed_sample: bool,
    /// Artificial latency added to every directory call
    #[serde(default)]
    pub latency_ms: u64,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            account_id: String::new(),
            account_status: default_account_status(),
            account: AccountRecord::default(),
            seed_sample: false,
            latency_ms: 0,
        }
    }
}

/// Roster synchronization settings
#[derive(Debug, Clone, Deserialize)]
pub struct SyncConfig {
    /// Capacity of the change-notification channel
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,
    /// Run the account check as soon as the server starts
    #[serde(default = "default_check_on_startup")]
    pub check_on_startup: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            event_buffer: default_event_buffer(),
            check_on_startup: default_check_on_startup(),
        }
    }
}

/// Invitation link settings
#[derive(Debug, Clone, Deserialize)]
pub struct InviteConfig {
    #[serde(default = "default_invite_base_url")]
    pub base_url: String,
}

impl Default for InviteConfig {
    fn default() -> Self {
        Self {
            base_url: default_invite_base_url(),
        }
    }
}

// Default value functions
fn default_app_name() -> String {
    "family-sync".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_account_status() -> AccountStatus {
    AccountStatus::Available
}

fn default_event_buffer() -> usize {
    256
}

fn default_check_on_startup() -> bool {
    true
}

fn default_invite_base_url() -> String {
    "https://familycar.app".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app: AppSettings {
                name: default_app_name(),
                env: Environment::default(),
            },
            api: ServerConfig {
                host: default_host(),
                port: default_port(),
            },
            directory: DirectoryConfig::default(),
            sync: SyncConfig::default(),
            invite: InviteConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// Every variable is optional; malformed values are reported rather
    /// than silently replaced by defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let app_env = match env::var("APP_ENV") {
            Ok(s) => Environment::parse(&s).ok_or(ConfigError::InvalidValue("APP_ENV", s))?,
            Err(_) => Environment::default(),
        };

        let account_status = match env::var("DIRECTORY_ACCOUNT_STATUS") {
            Ok(s) => s
                .parse()
                .map_err(|_| ConfigError::InvalidValue("DIRECTORY_ACCOUNT_STATUS", s))?,
            Err(_) => default_account_status(),
        };

        Ok(Self {
            app: AppSettings {
                name: env::var("APP_NAME").unwrap_or_else(|_| default_app_name()),
                env: app_env,
            },
            api: ServerConfig {
                host: env::var("API_HOST").unwrap_or_else(|_| default_host()),
                port: parse_var("API_PORT")?.unwrap_or_else(default_port),
            },
            directory: DirectoryConfig {
                account_id: env::var("DIRECTORY_ACCOUNT_ID").unwrap_or_default(),
                account_status,
                account: AccountRecord {
                    first_name: optional_var("DIRECTORY_FIRST_NAME"),
                    last_name: optional_var("DIRECTORY_LAST_NAME"),
                    display_name: optional_var("DIRECTORY_DISPLAY_NAME"),
                    email: optional_var("DIRECTORY_EMAIL"),
                    device_name: optional_var("DIRECTORY_DEVICE_NAME"),
                },
                seed_sample: parse_var("DIRECTORY_SEED_SAMPLE")?.unwrap_or(false),
                latency_ms: parse_var("DIRECTORY_LATENCY_MS")?.unwrap_or(0),
            },
            sync: SyncConfig {
                event_buffer: parse_var("SYNC_EVENT_BUFFER")?.unwrap_or_else(default_event_buffer),
                check_on_startup: parse_var("SYNC_CHECK_ON_STARTUP")?
                    .unwrap_or_else(default_check_on_startup),
            },
            invite: InviteConfig {
                base_url: env::var("INVITE_BASE_URL").unwrap_or_else(|_| default_invite_base_url()),
            },
        })
    }
}

fn optional_var(name: &'static str) -> Option<String> {
    env::var(name).ok().filter(|s| !s.trim().is_empty())
}

fn parse_var<T: std::str::FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(s) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue(name, s)),
        Err(_) => Ok(None),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
