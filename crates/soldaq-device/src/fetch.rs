//! ---
//! daq_section: "02-device-access"
//! daq_subsection: "module"
//! daq_type: "source"
//! daq_scope: "code"
//! daq_description: "Device URL templating and HTTP access."
//! daq_version: "v0.0.1-alpha"
//! daq_owner: "tbd"
//! ---
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use thiserror::Error;
use tracing::debug;
use url::Url;

/// Content type expected from JSON device endpoints.
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Errors raised by [`HttpFetcher`]; transport-level failures are kept
/// distinct from protocol-level ones so callers can choose retry vs abort.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The HTTP client itself could not be constructed.
    #[error("http client construction failed")]
    Client(#[source] reqwest::Error),
    /// Network-level failure: timeout, connection refusal, DNS.
    #[error("connection to {url} failed")]
    Connection {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    /// The device answered with a non-success HTTP status.
    #[error("device returned status {status} for {url}")]
    Status { status: StatusCode, url: String },
    /// The device answered with an unexpected content type.
    #[error("unexpected content type `{actual}` from {url}, expected `{expected}`")]
    ContentType {
        url: String,
        expected: String,
        actual: String,
    },
}

/// Issues GET requests against resolved device URLs.
///
/// Holds no per-request state; independent calls may run concurrently. The
/// bounded timeout lives here so one unreachable device cannot stall the
/// scheduler indefinitely.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Build a fetcher whose requests are bounded by `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self { client })
    }

    /// GET `url` and return the response body as text.
    pub async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| FetchError::Connection {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status,
                url: url.to_string(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|source| FetchError::Connection {
                url: url.to_string(),
                source,
            })?;
        debug!(url = %url, bytes = body.len(), "fetched device response");
        Ok(body)
    }

    /// Connectivity probe: GET `url`, require a success status and a matching
    /// content type, discard the payload. Used by the one-shot
    /// "verify configuration" action, not during normal polling.
    pub async fn probe(&self, url: &Url, expected_content_type: &str) -> Result<(), FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| FetchError::Connection {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status,
                url: url.to_string(),
            });
        }

        let actual = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("")
            .to_owned();
        if !actual.starts_with(expected_content_type) {
            return Err(FetchError::ContentType {
                url: url.to_string(),
                expected: expected_content_type.to_owned(),
                actual,
            });
        }
        Ok(())
    }
}
