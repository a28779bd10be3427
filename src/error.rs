//! Error types for the feed and information endpoint.

use thiserror::Error;

/// Errors raised while talking to the telemetry agent.
///
/// None of these are fatal to the dashboard: feed errors close the
/// connection and schedule a reconnect, info errors blank the host panel.
#[derive(Debug, Error)]
pub enum Error {
    /// Could not establish the connection.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// The endpoint answered with a non-success status.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// The connection broke while reading.
    #[error("Read failed: {0}")]
    Read(String),

    /// Failed to parse a response body.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Nothing was received within the idle timeout.
    #[error("No data received for {0:?}")]
    Timeout(std::time::Duration),

    /// The feed address uses a scheme no transport understands.
    #[error("Unsupported feed address: {0}")]
    Unsupported(String),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() {
            Error::Connection(err.to_string())
        } else if err.is_decode() {
            Error::Parse(err.to_string())
        } else if err.is_body() {
            Error::Read(err.to_string())
        } else {
            Error::Http(err.to_string())
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Read(err.to_string())
    }
}
