//! Error types.
//!
//! None of these escape [`IconLoader`](crate::IconLoader): every failure is
//! logged and degraded to a fallback. They are public so custom
//! [`Fetcher`](crate::Fetcher) and [`Document`](crate::Document)
//! implementations can produce them.

use thiserror::Error;

/// Failure to obtain a response at all.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[cfg(feature = "http")]
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[cfg(feature = "web")]
    #[error("browser fetch failed: {0}")]
    Js(String),
}

/// Failure to load an icon or the configuration resource.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to load {path}: status {status}")]
    Status { path: String, status: u16 },

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

/// Failure to parse a selector string.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,

    #[error("unexpected {found:?} at position {position}")]
    Unexpected { position: usize, found: char },

    #[error("unterminated attribute selector")]
    Unterminated,
}
