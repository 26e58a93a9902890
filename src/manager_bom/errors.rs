use thiserror::Error;

/// Error depicting everything that can go wrong while scraping observations from BoM.
/// Variants only carry a constructed message, never the lower level cause.
///
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BomError {
    #[error("InvalidInput: {0}")]
    InvalidInput(String),
    #[error("LocationNotFound: information for location {0} is not found")]
    LocationNotFound(String),
    #[error("ResponseTimedOut: request timed out for location {location}, consider increasing timeout to more than {timeout} seconds")]
    ResponseTimedOut { location: String, timeout: f64 },
    #[error("ConnectionFailed: connection error for location {location} for {attempts} attempts, consider increasing number of attempts")]
    ConnectionFailed { location: String, attempts: u32 },
    #[error("HttpError: HTTP status {status} at the address {url}")]
    HttpError { url: String, status: u16 },
    #[error("SchemaError: {0}")]
    SchemaError(String),
}

impl BomError {
    /// Returns the name of the error kind, used when reporting failures
    ///
    pub fn kind(&self) -> &'static str {
        match self {
            BomError::InvalidInput(_) => "InvalidInput",
            BomError::LocationNotFound(_) => "LocationNotFound",
            BomError::ResponseTimedOut { .. } => "ResponseTimedOut",
            BomError::ConnectionFailed { .. } => "ConnectionFailed",
            BomError::HttpError { .. } => "HttpError",
            BomError::SchemaError(_) => "SchemaError",
        }
    }
}
