//! Configuration loading from disk and the process environment.

use std::env;
use std::fs;
use std::path::Path;

use crate::config::schema::ProxyConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variables recognized as overrides. The names follow the
/// deployment convention this proxy is operated with.
pub const ENV_PORT: &str = "PORT";
pub const ENV_A_CONDITION_URL: &str = "A_CONDITION_URL";
pub const ENV_B_CONDITION_URL: &str = "B_CONDITION_URL";
pub const ENV_DEFAULT_CONDITION_URL: &str = "DEFAULT_CONDITION_URL";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ProxyConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: ProxyConfig = toml::from_str(&content).map_err(ConfigError::Parse)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Apply process-environment overrides on top of a loaded config.
///
/// `PORT` replaces the port of the listen address; the three
/// `*_CONDITION_URL` variables replace the corresponding origin URLs.
/// Variables that are unset leave the config untouched.
pub fn apply_env_overrides(mut config: ProxyConfig) -> ProxyConfig {
    if let Ok(port) = env::var(ENV_PORT) {
        config.listener.bind_address = format!("0.0.0.0:{}", port);
    }
    if let Ok(url) = env::var(ENV_A_CONDITION_URL) {
        config.origins.a_url = url;
    }
    if let Ok(url) = env::var(ENV_B_CONDITION_URL) {
        config.origins.b_url = url;
    }
    if let Ok(url) = env::var(ENV_DEFAULT_CONDITION_URL) {
        config.origins.default_url = url;
    }
    config
}
