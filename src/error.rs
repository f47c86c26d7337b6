//! Error types for circulate
//!
//! Failures fall into three kinds:
//! - Invalid argument: a required value is missing or blank, an amount is
//!   negative, or an operation targets something that is not there
//! - Invalid state: the entity is in a state that forbids the operation
//! - Operation failure: config, I/O, serialization or lock failures

use thiserror::Error;

/// Coarse classification of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Caller passed a bad or unknown argument
    InvalidArgument,
    /// Caller violated a lifecycle or protocol rule
    InvalidState,
    /// Ambient failure outside the domain rules
    Operation,
}

/// Main error type for circulate operations
#[derive(Error, Debug)]
pub enum Error {
    // Caller bugs
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // Protocol violations
    #[error("Invalid state: {0}")]
    InvalidState(String),

    // Ambient failures
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Library lock poisoned")]
    LockPoisoned,
}

impl Error {
    /// Get the kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidArgument(_) => ErrorKind::InvalidArgument,

            Error::InvalidState(_) => ErrorKind::InvalidState,

            Error::InvalidConfig(_)
            | Error::Io(_)
            | Error::Json(_)
            | Error::TomlParse(_)
            | Error::TomlSerialize(_)
            | Error::LockPoisoned => ErrorKind::Operation,
        }
    }

    /// True if the caller attempted an operation the current state forbids
    pub fn is_invalid_state(&self) -> bool {
        self.kind() == ErrorKind::InvalidState
    }

    /// True if the caller passed a bad or unknown argument
    pub fn is_invalid_argument(&self) -> bool {
        self.kind() == ErrorKind::InvalidArgument
    }
}

/// Result type alias for circulate operations
pub type Result<T> = std::result::Result<T, Error>;
