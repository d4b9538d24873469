//! Error types for the drive_upload crate.

use thiserror::Error;

/// Errors that can occur when uploading to or listing Google Drive.
#[derive(Error, Debug)]
pub enum DriveError {
    #[error("Authentication token is missing.")]
    MissingCredential,

    #[error("Please select a folder to upload files to.")]
    MissingDestination,

    #[error("Please select files to upload.")]
    EmptySelection,

    #[error("Google Drive API error ({status}): {message}")]
    Transport { status: u16, message: String },

    /// No response was received.
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// The request could not be built; nothing was sent.
    #[error("Invalid request: {0}")]
    InvalidRequest(#[source] reqwest::Error),

    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid folder URL or ID: {0}")]
    InvalidUrlOrId(String),

    #[error("File not found: {0}")]
    FileNotFound(String),
}

impl From<reqwest::Error> for DriveError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            DriveError::InvalidRequest(err)
        } else {
            DriveError::Network(err)
        }
    }
}

impl DriveError {
    /// HTTP status code carried by the error, if a response was received.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            DriveError::Transport { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type alias for DriveError.
pub type Result<T> = std::result::Result<T, DriveError>;
