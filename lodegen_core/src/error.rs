//! Error types for lodegen_core.

use crate::report::FailureKind;
use thiserror::Error;

/// Result type alias using lodegen_core's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while discovering, transforming or writing documents.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error occurred during file operations.
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// An address could not be turned into a locator.
    #[error("Cannot resolve {address}: {reason}")]
    Resolution { address: String, reason: String },

    /// Container/leaf determination failed.
    #[error("Cannot classify {address}: {reason}")]
    Classification { address: String, reason: String },

    /// Archive container could not be opened or enumerated.
    #[error("Cannot read archive {container}: {reason}")]
    ArchiveRead { container: String, reason: String },

    /// The transformer failed for a document.
    #[error("Transform failed for {address}: {reason}")]
    Transform { address: String, reason: String },

    /// Output directory or file could not be written.
    #[error("Cannot write {path}: {reason}")]
    Write { path: String, reason: String },

    /// Invalid run configuration.
    #[error("Invalid configuration: {reason}")]
    Config { reason: String },
}

impl Error {
    /// Create a Resolution error.
    pub fn resolution(address: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Resolution {
            address: address.into(),
            reason: reason.into(),
        }
    }

    /// Create a Classification error.
    pub fn classification(address: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Classification {
            address: address.into(),
            reason: reason.into(),
        }
    }

    /// Create an ArchiveRead error.
    pub fn archive_read(container: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::ArchiveRead {
            container: container.into(),
            reason: reason.into(),
        }
    }

    /// Create a Transform error.
    pub fn transform(address: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Transform {
            address: address.into(),
            reason: reason.into(),
        }
    }

    /// Create a Write error.
    pub fn write(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Write {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a Config error.
    pub fn config(reason: impl Into<String>) -> Self {
        Error::Config {
            reason: reason.into(),
        }
    }

    /// The report category this error is filed under.
    pub fn kind(&self) -> FailureKind {
        match self {
            Error::Resolution { .. } => FailureKind::Resolution,
            Error::Classification { .. } => FailureKind::Classification,
            Error::ArchiveRead { .. } => FailureKind::ArchiveRead,
            Error::Transform { .. } => FailureKind::Transform,
            Error::Write { .. } | Error::Io { .. } => FailureKind::Write,
            Error::Config { .. } => FailureKind::Config,
        }
    }
}

// Additional From implementations for external error types

impl From<tempfile::PersistError> for Error {
    fn from(err: tempfile::PersistError) -> Self {
        Error::Io { source: err.error }
    }
}

impl From<ignore::Error> for Error {
    fn from(err: ignore::Error) -> Self {
        // ignore::Error can wrap an io::Error or be a path error
        match err.io_error() {
            Some(io_err) => Error::Io {
                source: std::io::Error::new(io_err.kind(), io_err.to_string()),
            },
            None => Error::Io {
                source: std::io::Error::other(err.to_string()),
            },
        }
    }
}
