use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: String,
    pub ops_path: PathBuf,
    /// Accept administrative overrides (accumulator value and snapshot rebases).
    pub allow_admin_overrides: bool,
    /// Abort the replay at the first failing operation.
    pub stop_on_error: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let database_path = env_map
            .get("DATABASE_PATH")
            .cloned()
            .ok_or_else(|| ConfigError::MissingEnv("DATABASE_PATH".to_string()))?;

        let ops_path = env_map
            .get("OPS_PATH")
            .map(PathBuf::from)
            .ok_or_else(|| ConfigError::MissingEnv("OPS_PATH".to_string()))?;

        let allow_admin_overrides = parse_bool(&env_map, "ALLOW_ADMIN_OVERRIDES", false)?;
        let stop_on_error = parse_bool(&env_map, "STOP_ON_ERROR", true)?;

        Ok(Config {
            database_path,
            ops_path,
            allow_admin_overrides,
            stop_on_error,
        })
    }
}

fn parse_bool(
    env_map: &HashMap<String, String>,
    key: &str,
    default: bool,
) -> Result<bool, ConfigError> {
    match env_map.get(key).map(|s| s.trim().to_ascii_lowercase()) {
        None => Ok(default),
        Some(v) => match v.as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" => Ok(false),
            other => Err(ConfigError::InvalidValue(
                key.to_string(),
                format!("must be true or false, got {}", other),
            )),
        },
    }
}
