//! Error types for the HubSpot deals client.
//!
//! Every fallible operation in this crate returns [`Result`], whose error
//! side is the single [`Error`] enum below.

use thiserror::Error;

/// A specialized `Result` type for HubSpot operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for all HubSpot API operations.
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP transport failed (connection, TLS, timeout)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The access token is missing, rejected, or lacks a required scope
    #[error("Credential error: {0}")]
    Credential(String),

    /// API returned an error response
    #[error("API error {status}: {body}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// The server kept answering 429 past the configured retry cap
    #[error("Rate limited; gave up after {attempts} attempts")]
    RateLimited {
        /// Number of requests sent, including the first
        attempts: u32,
    },

    /// Invalid input provided to a function
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// URL parsing error
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Returns `true` if this error is potentially transient and the
    /// operation could be retried by the caller.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Http(_) | Error::RateLimited { .. } => true,
            Error::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Returns `true` if this is an authentication-related error.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Error::Credential(_))
    }

    /// Returns `true` if this error indicates a client-side issue
    /// (invalid input, bad request, etc.).
    pub fn is_client_error(&self) -> bool {
        match self {
            Error::Api { status, .. } => *status >= 400 && *status < 500,
            Error::InvalidInput(_) | Error::Config(_) | Error::UrlParse(_) => true,
            _ => false,
        }
    }

    /// Returns `true` if this error indicates a server-side issue.
    pub fn is_server_error(&self) -> bool {
        match self {
            Error::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }
}
