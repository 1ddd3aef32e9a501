use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("user with id {id} not found")]
    NotFound { id: i64 },

    #[error("API error (status {status}): {message}")]
    UnexpectedStatus { status: u16, message: String },

    #[error("Failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Request to {url} timed out")]
    Timeout { url: String },

    #[error("Request was cancelled")]
    Cancelled,

    #[error("Gave up after {fetched} page fetches; total_pages kept moving (last reported {last_total_pages})")]
    PageLimitExceeded { fetched: u32, last_total_pages: u32 },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to read config file at {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to write config file at {path}: {source}")]
    ConfigWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize config: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("Could not determine config directory")]
    NoConfigDir,
}

impl DirectoryError {
    /// Whether a retry has a reasonable chance of succeeding.
    ///
    /// Server errors, 408 and transport-level failures are transient; every
    /// other status (404 included) is a permanent answer from the upstream.
    pub fn is_transient(&self) -> bool {
        match self {
            DirectoryError::Http(e) => {
                e.is_connect() || e.is_timeout() || e.is_request() || e.is_body()
            }
            DirectoryError::Timeout { .. } => true,
            DirectoryError::UnexpectedStatus { status, .. } => is_transient_status(*status),
            _ => false,
        }
    }

    pub(crate) fn from_transport(err: reqwest::Error, url: &str) -> Self {
        if err.is_timeout() {
            DirectoryError::Timeout {
                url: url.to_string(),
            }
        } else {
            DirectoryError::Http(err)
        }
    }
}

pub(crate) fn is_transient_status(status: u16) -> bool {
    status == 408 || (500..600).contains(&status)
}

pub type Result<T> = std::result::Result<T, DirectoryError>;
