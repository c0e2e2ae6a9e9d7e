use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration build error: {0}")]
    Build(#[from] config::ConfigError),
    #[error("Invalid configuration: {0}")]
    Validation(String),
}

#[derive(Clone, Debug, Deserialize)]
pub struct SessionConfig {
    /// Name of the dashboard session cookie.
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    /// Session lifetime in hours before the operator has to sign in again.
    #[serde(default = "default_session_lifetime_hours")]
    pub lifetime_hours: i64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            lifetime_hours: default_session_lifetime_hours(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    #[serde(default)]
    pub session: SessionConfig,
}

fn default_cookie_name() -> String {
    "statuspage_session".to_string()
}

fn default_session_lifetime_hours() -> i64 {
    24 * 7
}

fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

/// Load application configuration from `config.yaml` + environment overrides.
///
/// Any environment variable matching the key path with a double-underscore
/// separator (e.g. `SESSION__LIFETIME_HOURS`) overrides the file value.
///
/// Returns a `ConfigError` instead of panicking so the caller can decide how to fail.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    use config::{Config, Environment, File};
    let cfg = Config::builder()
        .add_source(File::with_name("config.yaml"))
        .add_source(Environment::default().separator("__"))
        .build()?;

    let app: AppConfig = cfg.try_deserialize()?;

    if app.database_url.is_empty() {
        return Err(ConfigError::Validation("database_url must be set".into()));
    }
    if app.session.cookie_name.is_empty() {
        return Err(ConfigError::Validation(
            "session.cookie_name must not be empty".into(),
        ));
    }
    if app.session.lifetime_hours < 1 {
        return Err(ConfigError::Validation(
            "session.lifetime_hours must be at least 1".into(),
        ));
    }

    Ok(app)
}

/// Convenience helper for binaries wanting panic-on-error behaviour.
pub fn load_config_or_panic() -> AppConfig {
    match load_config() {
        Ok(c) => c,
        Err(e) => panic!("Failed to load configuration: {e}"),
    }
}
