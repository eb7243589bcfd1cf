//! Configuration management for the Kargo back-office
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with KARGO_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Authentication and token configuration
    pub auth: AuthConfig,

    /// CORS allow-list
    pub cors: CorsConfig,

    /// Frontend base URL for signup/invite links
    pub frontend: FrontendConfig,

    /// External chat directory configuration
    pub chat: ChatConfig,

    /// Outbound mail configuration
    pub mail: MailConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,
}

/// Per-role signing secrets plus the transient-token secrets.
///
/// Each role's session tokens are signed with an independent secret so a
/// leaked secret cannot forge tokens for another role.
#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub admin_secret: String,
    pub forwarder_secret: String,
    pub bco_secret: String,
    pub chb_secret: String,

    /// Secret for 15-minute activation tokens
    pub activation_secret: String,

    /// Secret for 1-day invite tokens
    pub invite_secret: String,

    /// Access token expiration in seconds
    pub access_token_expiry: i64,

    /// Refresh token expiration in seconds
    pub refresh_token_expiry: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    /// Origins allowed to call the API with credentials
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FrontendConfig {
    /// Base URL used when building invite signup links
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChatConfig {
    /// Chat provider API key
    pub api_key: String,

    /// Chat provider API secret (signs server-side and per-user tokens)
    pub api_secret: String,

    /// Chat provider REST endpoint
    pub base_url: String,

    /// Fixed system identity that greets new accounts
    pub welcome_user_id: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MailConfig {
    /// Mail API endpoint (template + data bag delivery)
    pub api_endpoint: String,

    /// Mail API key
    pub api_key: String,

    /// Sender address
    pub sender: String,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("KARGO_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 8000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("auth.access_token_expiry", 86_400)?
            .set_default("auth.refresh_token_expiry", 864_000)?
            .set_default("cors.allowed_origins", Vec::<String>::new())?
            .set_default("frontend.base_url", "http://localhost:3000")?
            .set_default("chat.base_url", "https://chat.stream-io-api.com")?
            .set_default("chat.welcome_user_id", "first-chat")?
            .set_default("mail.sender", "no-reply@kargo.app")?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (KARGO_ prefix)
            .add_source(
                Environment::with_prefix("KARGO")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// True when running with production hardening (secure cookies).
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
