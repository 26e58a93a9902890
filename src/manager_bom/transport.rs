use std::time::Duration;
use reqwest::blocking::Client;
use thiserror::Error;

/// A response as received from the server, body fully read
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Blocking HTTP GET, the seam between the scraper and the network
pub trait Transport {
    /// Performs a single GET attempt
    ///
    /// # Arguments
    ///
    /// * 'url' - url to get
    /// * 'timeout' - time allowed for the attempt
    fn get(&self, url: &str, timeout: Duration) -> Result<HttpResponse, TransportError>;
}

/// Transport backed by a reqwest blocking client
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Returns a transport with a client connecting directly, proxy environment variables are ignored
    ///
    pub fn new() -> Result<HttpTransport, reqwest::Error> {
        let client = Client::builder()
            .user_agent(concat!("bom_scraper/", env!("CARGO_PKG_VERSION")))
            .no_proxy()
            .build()?;

        Ok(HttpTransport { client })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str, timeout: Duration) -> Result<HttpResponse, TransportError> {
        let response = self.client
            .get(url)
            .timeout(timeout)
            .send()
            .map_err(classify)?;

        let status = response.status().as_u16();
        let body = response.text().map_err(classify)?;

        Ok(HttpResponse { status, body })
    }
}

/// Sorts a reqwest error into a timeout or a connection level failure
///
/// # Arguments
///
/// * 'e' - the error to classify
fn classify(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Connection(e.to_string())
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransportError {
    #[error("Timeout")]
    Timeout,
    #[error("ConnectionError: {0}")]
    Connection(String),
}
