use thiserror::Error;

/// Error depicting a failed smoke check of the scraper
///
#[derive(Debug, Error)]
#[error("self test failed for location {0}")]
pub struct SelfTestError(pub String);
