use std::fs;
use log::LevelFilter;
use serde::Deserialize;
use thiserror::Error;
use crate::manager_bom::{DEFAULT_HOST, DEFAULT_MAX_ATTEMPTS, DEFAULT_TIMEOUT_SECONDS};
use crate::manager_bom::models::ArgValue;
use crate::self_test::DEFAULT_LOCATION;

#[derive(Deserialize, Debug)]
#[serde(default)]
pub struct General {
    pub log_path: Option<String>,
    pub log_level: LevelFilter,
    pub log_to_stdout: bool,
}

impl Default for General {
    fn default() -> Self {
        General { log_path: None, log_level: LevelFilter::Info, log_to_stdout: true }
    }
}

#[derive(Deserialize, Debug)]
#[serde(default)]
pub struct Scraper {
    pub host: String,
    pub location_name: ArgValue,
    pub timeout_seconds: ArgValue,
    pub max_attempts: ArgValue,
}

impl Default for Scraper {
    fn default() -> Self {
        Scraper {
            host: DEFAULT_HOST.to_string(),
            location_name: ArgValue::Text(DEFAULT_LOCATION.to_string()),
            timeout_seconds: ArgValue::Float(DEFAULT_TIMEOUT_SECONDS),
            max_attempts: ArgValue::Int(DEFAULT_MAX_ATTEMPTS),
        }
    }
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct Config {
    pub general: General,
    pub scraper: Scraper,
}

/// Loads the configuration file and returns a struct with all configuration items
///
/// # Arguments
///
/// * 'config_path' - path to the configuration file, None gives the default configuration
pub fn load_config(config_path: Option<&str>) -> Result<Config, LoadConfigurationError> {
    let Some(config_path) = config_path else {
        return Ok(Config::default());
    };

    let toml = fs::read_to_string(config_path)
        .map_err(|e| LoadConfigurationError::ReadError(format!("{}: {}", config_path, e)))?;

    parse_config(&toml)
}

/// Parses configuration from a TOML document
///
/// # Arguments
///
/// * 'toml' - the TOML document
pub fn parse_config(toml: &str) -> Result<Config, LoadConfigurationError> {
    let config: Config = toml::from_str(toml)?;

    Ok(config)
}

/// Error depicting errors that occur while loading the configuration
///
#[derive(Debug, Error)]
pub enum LoadConfigurationError {
    #[error("ReadError: {0}")]
    ReadError(String),
    #[error("ParseError: {0}")]
    ParseError(#[from] toml::de::Error),
}
