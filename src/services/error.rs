use std::time::Duration;

use thiserror::Error;

/// Why a discovery tier produced nothing usable. Never leaves the aggregator.
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("upstream unavailable: {0}")]
    Unavailable(String),
    #[error("upstream did not answer within {0:?}")]
    Timeout(Duration),
    #[error("malformed upstream payload: {0}")]
    MalformedPayload(String),
    #[error("upstream returned no usable tokens")]
    Empty,
}

impl From<reqwest::Error> for FeedError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            FeedError::MalformedPayload(e.to_string())
        } else {
            FeedError::Unavailable(e.to_string())
        }
    }
}

/// Failures of the payment and mint operations, reported to the caller.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("network error: {0}")]
    Network(String),
}
