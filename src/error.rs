//! Poll failure taxonomy

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PollError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server answered {status} for {path}")]
    Status {
        path: &'static str,
        status: reqwest::StatusCode,
    },

    #[error("malformed response from {path}: expected {expected} fields, got {got}")]
    Malformed {
        path: &'static str,
        expected: usize,
        got: usize,
    },
}
