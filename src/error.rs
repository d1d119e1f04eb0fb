use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, GhostError>;

#[derive(Debug, thiserror::Error)]
pub enum GhostError {
    /// A required input is missing or has an unsupported value.
    #[error("{0}")]
    Validation(String),

    #[error("Image file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Failed to read {}: {cause}", path.display())]
    Io { path: PathBuf, cause: std::io::Error },

    /// The request never produced a response.
    #[error("{0}")]
    Transport(String),

    /// Ghost answered with a non-2xx status.
    #[error("Ghost API error ({status}): {message}")]
    Api {
        status: u16,
        message: String,
        body: Option<String>,
    },

    /// A 2xx response that does not have the documented shape.
    #[error("Unexpected response from Ghost: {0}")]
    Protocol(String),

    #[error("Failed to write outputs: {0}")]
    Output(std::io::Error),
}

impl GhostError {
    /// Server-supplied response body captured alongside the error, if any.
    pub fn diagnostic_body(&self) -> Option<&str> {
        match self {
            GhostError::Api { body, .. } => body.as_deref(),
            _ => None,
        }
    }
}
