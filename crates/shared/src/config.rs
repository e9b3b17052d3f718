//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Auth (token validation) configuration.
    pub auth: AuthConfig,
    /// Redemption code configuration.
    #[serde(default)]
    pub codes: CodesConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Auth configuration for validating the identity provider's tokens.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Secret key shared with the identity provider.
    pub jwt_secret: String,
}

/// Redemption code configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CodesConfig {
    /// Maximum number of codes per generated batch.
    #[serde(default = "default_max_batch_size")]
    pub max_batch_size: u32,
    /// Length of the random suffix appended to the prefix.
    #[serde(default = "default_suffix_length")]
    pub suffix_length: usize,
    /// Collision retries per code before the batch fails.
    #[serde(default = "default_max_generation_attempts")]
    pub max_generation_attempts: u32,
    /// Price of a one-shot article unlock, in article credits.
    #[serde(default = "default_article_price")]
    pub article_price: i64,
    /// Price of a one-shot course unlock, in universal credits.
    #[serde(default = "default_course_price")]
    pub course_price: i64,
}

fn default_max_batch_size() -> u32 {
    1000
}

fn default_suffix_length() -> usize {
    8
}

fn default_max_generation_attempts() -> u32 {
    5
}

fn default_article_price() -> i64 {
    1
}

fn default_course_price() -> i64 {
    50
}

impl Default for CodesConfig {
    fn default() -> Self {
        Self {
            max_batch_size: default_max_batch_size(),
            suffix_length: default_suffix_length(),
            max_generation_attempts: default_max_generation_attempts(),
            article_price: default_article_price(),
            course_price: default_course_price(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("TABEEB").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
