//! Error types for fetching and resolving market data.

use thiserror::Error;

/// Failure of a single HTTP attempt against one endpoint
#[derive(Error, Debug)]
pub enum AttemptError {
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("JSON decode failed: {0}")]
    Decode(#[source] reqwest::Error),

    #[error("empty payload")]
    Empty,
}

/// Configuration problems detected while building a query
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    MissingVar(String),

    #[error("invalid Eastern time '{0}' (expected YYYY-MM-DD HH:MM)")]
    InvalidTime(String),

    #[error("unsupported candle interval '{0}'")]
    InvalidInterval(String),
}

/// Fetch layer errors surfaced to callers.
///
/// `DataUnavailable` is returned once per fetch, after the primary and (if
/// configured) the fallback endpoint both failed.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("data unavailable: primary {primary}{}", fallback_suffix(.fallback))]
    DataUnavailable {
        primary: AttemptError,
        fallback: Option<AttemptError>,
    },

    #[error("HTTP client setup failed: {0}")]
    Client(#[source] reqwest::Error),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("kline paging stopped after {0} pages before the window end")]
    Truncated(usize),
}

fn fallback_suffix(fallback: &Option<AttemptError>) -> String {
    match fallback {
        Some(err) => format!(", fallback {}", err),
        None => ", no fallback configured".to_string(),
    }
}

impl FetchError {
    /// Number of endpoints that were tried before giving up
    pub fn attempts(&self) -> usize {
        match self {
            FetchError::DataUnavailable { fallback, .. } => 1 + usize::from(fallback.is_some()),
            _ => 0,
        }
    }

    /// True when an endpoint answered with an empty payload
    pub fn is_empty_payload(&self) -> bool {
        matches!(
            self,
            FetchError::DataUnavailable {
                primary: AttemptError::Empty,
                ..
            } | FetchError::DataUnavailable {
                fallback: Some(AttemptError::Empty),
                ..
            }
        )
    }
}
