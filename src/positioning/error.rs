/// Failures of the remote positioning call

use reqwest::StatusCode;
use thiserror::Error;

/// Every way a call to the positioning service can fail.
///
/// All variants are surfaced to the user as the same generic API error; the
/// distinction only matters for logs.
#[derive(Error, Debug)]
pub enum PositioningError {
    #[error("positioning request timed out: {0}")]
    Timeout(#[source] reqwest::Error),

    #[error("positioning request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("positioning service answered with status {0}")]
    Status(StatusCode),

    #[error("positioning service returned a body that is not JSON: {0}")]
    Decode(#[source] serde_json::Error),
}

impl From<reqwest::Error> for PositioningError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            PositioningError::Timeout(error)
        } else {
            PositioningError::Transport(error)
        }
    }
}
