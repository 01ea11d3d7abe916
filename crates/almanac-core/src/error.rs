use thiserror::Error;

/// Top-level error type for the Almanac system.
///
/// Subsystem crates define their own error types and convert into this one
/// so the `?` operator works across crate boundaries. Nothing in the core is
/// fatal to the process: every failure either surfaces to the user or
/// degrades to a safe default.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AlmanacError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Identity provider error: {0}")]
    Identity(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for AlmanacError {
    fn from(err: toml::de::Error) -> Self {
        AlmanacError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for AlmanacError {
    fn from(err: toml::ser::Error) -> Self {
        AlmanacError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for AlmanacError {
    fn from(err: serde_json::Error) -> Self {
        AlmanacError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Almanac operations.
pub type Result<T> = std::result::Result<T, AlmanacError>;
