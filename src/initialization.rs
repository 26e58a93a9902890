use std::env;
use log::info;
use thiserror::Error;
use crate::config::{load_config, Config, LoadConfigurationError};
use crate::logging::{setup_logger, LoggerError};
use crate::manager_bom::Bom;

/// Initializes and returns configuration and a Bom struct ready for scraping
///
pub fn init() -> Result<(Config, Bom), InitializationError> {
    let args: Vec<String> = env::args().collect();
    let config_path = config_path(&args);

    // Load configuration
    let config = load_config(config_path)?;

    // Setup logging
    let _ = setup_logger(config.general.log_path.as_deref(), config.general.log_level, config.general.log_to_stdout)?;

    // Print version
    info!("starting bom scraper version: {}", env!("CARGO_PKG_VERSION"));

    let bom = Bom::new(&config.scraper)?;

    Ok((config, bom))
}

/// Picks the value of a '--config=' argument if present
///
/// # Arguments
///
/// * 'args' - command line arguments
fn config_path(args: &[String]) -> Option<&str> {
    args.iter()
        .find(|p| p.starts_with("--config="))
        .and_then(|p| p.split_once('='))
        .map(|(_, path)| path)
}

/// Error depicting errors that occur while initializing the scraper
///
#[derive(Debug, Error)]
pub enum InitializationError {
    #[error("ConfigurationError: {0}")]
    ConfigurationError(#[from] LoadConfigurationError),
    #[error("SetupLoggerError: {0}")]
    SetupLoggerError(#[from] LoggerError),
    #[error("ClientError: {0}")]
    ClientError(#[from] reqwest::Error),
}
