/// Failures of a single submission

use crate::positioning::PositioningError;
use thiserror::Error;

/// User-visible message for text that does not parse as JSON
pub const INVALID_JSON_MESSAGE: &str = "❌ Invalid JSON format";
/// User-visible message for undecodable uploads
pub const NOT_UTF8_MESSAGE: &str = "❌ Uploaded file is not valid UTF-8 text";
/// User-visible message for bodies that were too large or not a readable form
pub const UNREADABLE_INPUT_MESSAGE: &str = "❌ Workflow could not be read - too large or malformed upload";
/// User-visible message for every remote failure
pub const API_ERROR_MESSAGE: &str = "❌ Positioning failed - API error";

/// Why a submission did not produce a new result
#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("invalid JSON format: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("uploaded file is not valid UTF-8: {0}")]
    NotUtf8(#[from] std::string::FromUtf8Error),

    #[error("request body could not be read: {0}")]
    Unreadable(String),

    #[error("positioning failed: {0}")]
    Api(#[from] PositioningError),
}

impl SubmitError {
    /// Message shown above the input; API details stay in the logs
    pub fn user_message(&self) -> &'static str {
        match self {
            SubmitError::InvalidJson(_) => INVALID_JSON_MESSAGE,
            SubmitError::NotUtf8(_) => NOT_UTF8_MESSAGE,
            SubmitError::Unreadable(_) => UNREADABLE_INPUT_MESSAGE,
            SubmitError::Api(_) => API_ERROR_MESSAGE,
        }
    }

    /// Malformed input never reaches the network
    pub fn is_malformed_input(&self) -> bool {
        matches!(
            self,
            SubmitError::InvalidJson(_) | SubmitError::NotUtf8(_) | SubmitError::Unreadable(_)
        )
    }
}
