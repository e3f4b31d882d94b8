use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

use crate::domain::auth::AuthServiceConfig;

fn default_db_connect_timeout() -> u64 {
  5
}

fn default_db_acquire_timeout() -> u64 {
  3
}

fn default_redis_connect_timeout() -> u64 {
  5
}

fn default_cache_ttl() -> u64 {
  300
}

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
  pub server: ServerConfig,
  pub database: DatabaseConfig,
  /// Listing cache backend. Without it the cache lives in process memory.
  #[serde(default)]
  pub redis: Option<RedisConfig>,
  #[serde(default)]
  pub cache: CacheConfig,
  pub security: SecurityConfig,
  pub rate_limit: RateLimitConfig,
  /// Account created at startup if its email is not taken yet
  #[serde(default)]
  pub bootstrap_user: Option<BootstrapUserConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  pub host: String,
  pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
  pub url: String,
  pub max_connections: u32,
  #[serde(default = "default_db_connect_timeout")]
  pub connect_timeout_seconds: u64,
  #[serde(default = "default_db_acquire_timeout")]
  pub acquire_timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
  pub url: String,
  #[serde(default = "default_redis_connect_timeout")]
  pub connect_timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
  /// Lifetime of a cached listing render
  #[serde(default = "default_cache_ttl")]
  pub ttl_seconds: u64,
}

impl Default for CacheConfig {
  fn default() -> Self {
    Self {
      ttl_seconds: default_cache_ttl(),
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
  pub session_ttl_seconds: u64,
  pub remember_me_ttl_seconds: u64,
}

impl SecurityConfig {
  pub fn auth_service_config(&self) -> AuthServiceConfig {
    AuthServiceConfig {
      session_ttl_seconds: self.session_ttl_seconds as i64,
      remember_me_ttl_seconds: self.remember_me_ttl_seconds as i64,
    }
  }
}

/// Token bucket for POST /login, per client IP
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
  /// Seconds until one more attempt is allowed
  pub login_replenish_seconds: u64,
  pub login_burst: u32,
}

#[derive(Clone, Deserialize)]
pub struct BootstrapUserConfig {
  pub name: String,
  pub email: String,
  pub password: String,
}

impl std::fmt::Debug for BootstrapUserConfig {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("BootstrapUserConfig")
      .field("name", &self.name)
      .field("email", &self.email)
      .field("password", &"***")
      .finish()
  }
}

impl Config {
  /// Load configuration from files and environment variables
  ///
  /// Sources, later ones overriding earlier ones:
  /// 1. config/default.toml
  /// 2. config/local.toml (if exists)
  /// 3. config/{RUN_MODE}.toml (if exists)
  /// 4. Environment variables with the INVOICEDESK_ prefix, `__` between
  ///    sections, e.g. `INVOICEDESK_SERVER__PORT=8080`
  /// 5. `DATABASE_URL`, which wins over `database.url`
  ///
  /// # Errors
  ///
  /// Returns a `ConfigError` if the default file is missing, a file is not
  /// valid TOML, or a required value is missing or has the wrong type.
  pub fn load() -> Result<Self, ConfigError> {
    let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

    let config = ConfigBuilder::builder()
      .add_source(File::with_name("config/default").required(true))
      .add_source(File::with_name("config/local").required(false))
      .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
      .add_source(
        Environment::with_prefix("INVOICEDESK")
          .prefix_separator("_")
          .separator("__")
          .try_parsing(true),
      )
      .set_override_option("database.url", env::var("DATABASE_URL").ok())?
      .build()?;

    config.try_deserialize()
  }
}
