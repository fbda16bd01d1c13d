use chrono::TimeDelta;
use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

use crate::domain::auth::entities::Application;

// Default timeout functions
fn default_request_timeout() -> u64 {
  10
}

fn default_shutdown_timeout() -> u64 {
  30
}

fn default_db_connect_timeout() -> u64 {
  5
}

fn default_db_acquire_timeout() -> u64 {
  3
}

/// Deployment environment, selects the log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunEnv {
  Local,
  Dev,
  Prod,
}

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
  pub env: RunEnv,
  pub server: ServerConfig,
  pub database: DatabaseConfig,
  pub security: SecurityConfig,
  /// Client applications provisioned into the registry at startup
  #[serde(default)]
  pub applications: Vec<ApplicationConfig>,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  pub host: String,
  pub port: u16,
  /// Deadline applied to each request handled by the auth endpoints
  #[serde(default = "default_request_timeout")]
  pub request_timeout_seconds: u64,
  /// Time given to in-flight requests after a stop signal
  #[serde(default = "default_shutdown_timeout")]
  pub shutdown_timeout_seconds: u64,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
  /// SQLite URL, e.g. `sqlite://./storage/sso.db`
  pub url: String,
  pub max_connections: u32,
  #[serde(default = "default_db_connect_timeout")]
  pub connect_timeout_seconds: u64,
  #[serde(default = "default_db_acquire_timeout")]
  pub acquire_timeout_seconds: u64,
}

/// Security configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
  /// Lifetime of issued access tokens
  pub token_ttl_seconds: u64,
}

#[derive(Clone, Deserialize)]
pub struct ApplicationConfig {
  pub id: i32,
  pub name: String,
  pub secret: String,
}

impl std::fmt::Debug for ApplicationConfig {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ApplicationConfig")
      .field("id", &self.id)
      .field("name", &self.name)
      .finish_non_exhaustive()
  }
}

impl From<&ApplicationConfig> for Application {
  fn from(app: &ApplicationConfig) -> Self {
    Application::new(app.id, app.name.clone(), app.secret.clone())
  }
}

impl Config {
  /// Load configuration from files and environment variables
  ///
  /// Configuration is loaded in the following order (later sources override earlier ones):
  /// 1. config/default.toml
  /// 2. config/local.toml (if exists)
  /// 3. config/{RUN_MODE}.toml (if exists)
  /// 4. Environment variables with SSO_ prefix
  ///
  /// # Environment Variables
  ///
  /// Environment variables use the SSO_ prefix and are separated by double underscores:
  /// - `SSO_ENV=prod`
  /// - `SSO_SERVER__PORT=44044`
  /// - `SSO_DATABASE__URL=sqlite://./storage/sso.db`
  /// - `SSO_SECURITY__TOKEN_TTL_SECONDS=3600`
  ///
  /// # Errors
  ///
  /// Returns a `ConfigError` if the default file is missing, a value has the
  /// wrong type, or `env` is not one of `local`, `dev`, `prod`.
  pub fn load() -> Result<Self, ConfigError> {
    let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

    let config = ConfigBuilder::builder()
      .add_source(File::with_name("config/default").required(true))
      .add_source(File::with_name("config/local").required(false))
      .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
      .add_source(
        Environment::with_prefix("SSO")
          .prefix_separator("_")
          .separator("__")
          .try_parsing(true),
      )
      .build()?;

    let config: Self = config.try_deserialize()?;
    config.validate()?;

    Ok(config)
  }

  /// Rejects values that deserialize but cannot be used
  pub fn validate(&self) -> Result<(), ConfigError> {
    self.token_ttl().map(|_| ())
  }

  /// Token lifetime; zero and values beyond the representable range are errors
  pub fn token_ttl(&self) -> Result<TimeDelta, ConfigError> {
    let secs = self.security.token_ttl_seconds;
    if secs == 0 {
      return Err(ConfigError::Message(
        "security.token_ttl_seconds must be greater than zero".into(),
      ));
    }

    i64::try_from(secs)
      .ok()
      .and_then(TimeDelta::try_seconds)
      .ok_or_else(|| {
        ConfigError::Message(format!(
          "security.token_ttl_seconds is out of range: {}",
          secs
        ))
      })
  }
}
