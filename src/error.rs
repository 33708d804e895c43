use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the humanization pipeline.
#[derive(Debug, Error)]
pub enum HumanizeError {
    #[error("No Gemini API key is configured. Enter one below or set GEMINI_API_KEY.")]
    MissingApiKey,

    #[error("File is too large ({size} bytes). The limit is {limit} bytes (20 MiB).")]
    FileTooLarge { size: u64, limit: u64 },

    #[error("Could not read {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Gemini API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Gemini service error: {0}")]
    Service(String),

    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Stream interrupted: {0}")]
    Stream(String),

    #[error("Clipboard error: {0}")]
    Clipboard(String),
}

impl HumanizeError {
    /// Message shown in the UI. Configuration and validation problems are
    /// actionable by the user and pass through verbatim; transport-level
    /// detail stays in the log.
    pub fn user_message(&self) -> String {
        match self {
            HumanizeError::MissingApiKey
            | HumanizeError::FileTooLarge { .. }
            | HumanizeError::FileRead { .. }
            | HumanizeError::Clipboard(_) => self.to_string(),
            _ => "Failed to process the document. Please try again.".to_string(),
        }
    }
}
