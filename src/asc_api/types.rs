use std::fmt;
use std::io;
use std::path::PathBuf;

/// SDK error type
///
/// Represents all possible failures when authenticating against or calling
/// the App Store Connect API.
#[derive(Debug)]
pub enum Error {
    /// The private key file could not be read
    KeyRead { path: PathBuf, source: io::Error },
    /// The JWT signing operation failed
    Signing(String),
    /// API request failed (network, HTTP, or response parsing error)
    Api(ApiError),
    /// Configuration error
    Config(String),
    /// Local I/O failed (e.g. writing a downloaded artifact)
    Io(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::KeyRead { path, source } => {
                write!(f, "failed to read private key {}: {}", path.display(), source)
            }
            Error::Signing(msg) => write!(f, "token signing failed: {}", msg),
            Error::Api(err) => write!(f, "API error: {}", err),
            Error::Config(msg) => write!(f, "configuration error: {}", msg),
            Error::Io(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl std::error::Error for Error {}

impl From<ApiError> for Error {
    fn from(err: ApiError) -> Self {
        Error::Api(err)
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<jsonwebtoken::errors::Error> for Error {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        Error::Signing(err.to_string())
    }
}

/// API-specific errors
#[derive(Debug)]
pub enum ApiError {
    /// Network error (connection, timeout, etc.)
    Network(String),
    /// Non-2xx HTTP response, carrying the raw body for diagnostics
    Http { status: u16, body: String },
    /// Failed to parse a response
    Parse(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(msg) => write!(f, "network error: {}", msg),
            ApiError::Http { status, body } => write!(f, "HTTP {} error: {}", status, body),
            ApiError::Parse(msg) => write!(f, "parse error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Network("request timeout".to_string())
        } else if err.is_connect() {
            ApiError::Network(format!("connection failed: {}", err))
        } else if let Some(status) = err.status() {
            ApiError::Http {
                status: status.as_u16(),
                body: err.to_string(),
            }
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Api(ApiError::from(err))
    }
}
