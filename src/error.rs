use thiserror::Error;

/// Message shown to the user for any failed recognition attempt.
pub const RECOGNITION_FAILED_MESSAGE: &str =
    "Failed to recognize license plate. Please try again with a clearer image.";

/// Failure of a single recognition call.
///
/// Every variant collapses to [`RECOGNITION_FAILED_MESSAGE`] at the user
/// surface; the variants only exist so the logs say what went wrong.
#[derive(Debug, Error)]
pub enum RecognitionError {
    #[error("recognition API key not configured")]
    MissingApiKey,

    #[error("request to recognition provider failed: {0}")]
    Transport(String),

    #[error("recognition provider returned {status}: {message}")]
    Provider { status: u16, message: String },

    #[error("recognition provider returned no usable payload")]
    EmptyResponse,

    #[error("recognition payload is not valid JSON: {0}")]
    Malformed(String),

    #[error("recognition payload is missing field `{0}`")]
    MissingField(&'static str),
}

impl From<reqwest::Error> for RecognitionError {
    fn from(e: reqwest::Error) -> Self {
        RecognitionError::Transport(e.to_string())
    }
}

/// Failure reading or writing local state. Never surfaced to the user.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("stored value could not be (de)serialized: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// A user intent the controller refused to act on.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ControllerError {
    #[error("a recognition request is already in progress")]
    Busy,

    #[error("no image selected")]
    NoImage,

    #[error("clearing the history requires confirmation")]
    ConfirmationRequired,

    #[error("not a supported image: {0}")]
    InvalidImage(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to determine {0} directory")]
    NoPlatformDir(&'static str),

    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config file is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),
}
