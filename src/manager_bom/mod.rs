pub mod errors;
pub mod models;
pub mod stations;
pub mod transport;

use log::warn;
use serde_json::Value;
use crate::config::Scraper;
use crate::manager_bom::errors::BomError;
use crate::manager_bom::models::{ArgValue, FetchRequest, ObservationTable};
use crate::manager_bom::stations::find_station;
use crate::manager_bom::transport::{HttpResponse, HttpTransport, Transport, TransportError};

pub const DEFAULT_HOST: &str = "www.bom.gov.au";
pub const DEFAULT_TIMEOUT_SECONDS: f64 = 10.0;
pub const DEFAULT_MAX_ATTEMPTS: i64 = 3;

const OBSERVATIONS_KEY: &str = "observations";
const DATA_KEY: &str = "data";
const INDEX_FIELD: &str = "aifstime_utc";

/// Struct for scraping latest weather observations from the Bureau of Meteorology
pub struct Bom<T: Transport = HttpTransport> {
    transport: T,
    host: String,
    timeout_seconds: ArgValue,
    max_attempts: ArgValue,
}

impl Bom<HttpTransport> {
    /// Returns a Bom struct using a reqwest backed transport
    ///
    /// # Arguments
    ///
    /// * 'config' - scraper configuration
    pub fn new(config: &Scraper) -> Result<Bom<HttpTransport>, reqwest::Error> {
        let transport = HttpTransport::new()?;

        Ok(Bom::with_transport(transport, &config.host)
            .with_defaults(config.timeout_seconds.clone(), config.max_attempts.clone()))
    }
}

impl<T: Transport> Bom<T> {
    /// Returns a Bom struct using the given transport
    ///
    /// # Arguments
    ///
    /// * 'transport' - transport to perform requests with
    /// * 'host' - host serving the observation documents
    pub fn with_transport(transport: T, host: &str) -> Bom<T> {
        Bom {
            transport,
            host: host.to_string(),
            timeout_seconds: ArgValue::Float(DEFAULT_TIMEOUT_SECONDS),
            max_attempts: ArgValue::Int(DEFAULT_MAX_ATTEMPTS),
        }
    }

    /// Replaces the timeout and number of attempts used by 'fetch_default'.
    /// The values are validated when a fetch is made.
    ///
    /// # Arguments
    ///
    /// * 'timeout_seconds' - seconds to wait for the server per attempt
    /// * 'max_attempts' - number of attempts on connection failures
    pub fn with_defaults(mut self, timeout_seconds: ArgValue, max_attempts: ArgValue) -> Bom<T> {
        self.timeout_seconds = timeout_seconds;
        self.max_attempts = max_attempts;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetches observations using the default timeout and number of attempts,
    /// 10 seconds and 3 attempts unless configured otherwise
    ///
    /// # Arguments
    ///
    /// * 'location_name' - station name, case-insensitive
    pub fn fetch_default(&self, location_name: impl Into<ArgValue>) -> Result<ObservationTable, BomError> {
        self.fetch(location_name, self.timeout_seconds.clone(), self.max_attempts.clone())
    }

    /// Fetches the latest observations for a station and returns them indexed by observation time.
    /// Connection failures are retried up to 'max_attempts', a timeout ends the fetch at once.
    ///
    /// # Arguments
    ///
    /// * 'location_name' - station name, case-insensitive
    /// * 'timeout_seconds' - seconds to wait for the server per attempt, must be greater than zero
    /// * 'max_attempts' - number of attempts on connection failures, must be at least one
    pub fn fetch(&self, location_name: impl Into<ArgValue>, timeout_seconds: impl Into<ArgValue>, max_attempts: impl Into<ArgValue>) -> Result<ObservationTable, BomError> {
        let req = FetchRequest::new(&location_name.into(), &timeout_seconds.into(), &max_attempts.into())?;

        let station = find_station(&req.location_name)
            .ok_or_else(|| BomError::LocationNotFound(req.location_name.clone()))?;
        let url = station.observations_url(&self.host);

        let response = self.get_with_retry(&url, &req)?;
        if !response.is_success() {
            return Err(BomError::HttpError { url, status: response.status });
        }

        parse_observations(&url, &response.body)
    }

    /// Gets the url, retrying on connection failures only
    ///
    /// # Arguments
    ///
    /// * 'url' - url to get
    /// * 'req' - the validated request
    fn get_with_retry(&self, url: &str, req: &FetchRequest) -> Result<HttpResponse, BomError> {
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            match self.transport.get(url, req.timeout) {
                Ok(response) => break Ok(response),
                Err(TransportError::Timeout) => {
                    break Err(BomError::ResponseTimedOut {
                        location: req.location_name.clone(),
                        timeout: req.timeout_seconds,
                    });
                },
                Err(TransportError::Connection(_)) if attempt < req.max_attempts => {
                    warn!("connection error for the connection attempt number {}, continuing", attempt);
                },
                Err(TransportError::Connection(_)) => {
                    break Err(BomError::ConnectionFailed {
                        location: req.location_name.clone(),
                        attempts: attempt,
                    });
                },
            }
        }
    }
}

/// Parses an observations document into a table
///
/// # Arguments
///
/// * 'url' - url the document came from, used in error messages
/// * 'body' - the JSON document
fn parse_observations(url: &str, body: &str) -> Result<ObservationTable, BomError> {
    let mut json: Value = serde_json::from_str(body)
        .map_err(|e| BomError::SchemaError(format!("document at {} is not valid JSON: {}", url, e)))?;

    let data = json
        .get_mut(OBSERVATIONS_KEY)
        .and_then(|o| o.get_mut(DATA_KEY))
        .map(Value::take)
        .ok_or_else(|| BomError::SchemaError(format!(
            "in JSON document at {} there is no key '{}.{}'", url, OBSERVATIONS_KEY, DATA_KEY)))?;

    let Value::Array(records) = data else {
        return Err(BomError::SchemaError(format!(
            "in JSON document at {} '{}.{}' is not an array", url, OBSERVATIONS_KEY, DATA_KEY)));
    };

    ObservationTable::from_records(records, INDEX_FIELD)
        .map_err(|e| BomError::SchemaError(format!("in JSON document at {}: {}", url, e)))
}
