use thiserror::Error;

pub type Result<T> = std::result::Result<T, ChargenError>;

// Enum for handling the errors the chargen core can surface to its host.
#[derive(Debug, Error)]
pub enum ChargenError {
    #[error("IO error: {0:#}")]
    Io(#[from] std::io::Error), // Input/output errors while reading or writing settings and catalogs.

    #[error("Serialization error: {0:#}")]
    Serialization(#[from] serde_json::Error), // Errors related to data serialization.

    #[error("Invalid update patch: {0}")]
    InvalidPatch(String), // A queued patch could not be applied to the character state.

    #[error("Could not resolve the home directory")]
    HomeDirUnavailable,

    #[error("Logger error: {0:#}")]
    Logger(#[from] log::SetLoggerError),
}
