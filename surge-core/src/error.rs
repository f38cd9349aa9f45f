use std::fmt;

/// Result type alias for Surge core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Surge core operations
///
/// Only startup preconditions produce errors here; individual request
/// failures during a run are recorded as results, never raised.
#[derive(Debug)]
pub enum Error {
    /// Invalid run configuration, rejected before any worker starts
    Config(String),

    /// The target's health probe did not succeed before the run
    Health {
        /// Status code the probe observed, if a response arrived at all
        status: Option<u16>,
        message: String,
    },

    /// HTTP client errors outside the request loop (client construction)
    Http(reqwest::Error),

    /// Other errors
    Other(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(msg) => write!(f, "Configuration error: {msg}"),
            Error::Health { status: Some(code), message } => {
                write!(f, "Health check failed (status {code}): {message}")
            }
            Error::Health { status: None, message } => {
                write!(f, "Health check failed: {message}")
            }
            Error::Http(e) => write!(f, "HTTP client error: {e}"),
            Error::Other(msg) => write!(f, "Error: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Http(err)
    }
}
