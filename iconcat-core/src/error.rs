//! Typed error handling for iconcat.
//!
//! Provides structured errors that library consumers can match on,
//! with full context about what went wrong and where.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for iconcat operations.
///
/// Only [`IconcatError::Parse`] and [`IconcatError::Interchange`] are
/// batch-continuable; every other variant aborts the run.
#[derive(Error, Debug)]
pub enum IconcatError {
    /// I/O error when reading/writing files
    #[error("I/O error at {path}: {message}")]
    Io {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Malformed or incomplete vector file
    #[error("Parse error in {path}: {message}")]
    Parse {
        path: PathBuf,
        message: String,
        /// Line number (1-indexed) if available
        line: Option<usize>,
        /// Column number (1-indexed) if available
        column: Option<usize>,
    },

    /// Configuration file errors
    #[error("Config error at {path}: {message}")]
    Config { path: PathBuf, message: String },

    /// Legacy alias targets missing from the generated catalog
    #[error("Alias integrity error: {} target(s) missing from catalog: {}", missing.len(), missing.join(", "))]
    AliasIntegrity { missing: Vec<String> },

    /// Incremental patch could not be applied
    #[error("Patch error at {path}: {message}")]
    Patch { path: PathBuf, message: String },

    /// Malformed interchange line
    #[error("Interchange error at {path}:{line}: {message}")]
    Interchange {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// Invalid argument provided
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// Generic internal error
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl IconcatError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Create a parse error without location.
    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
            line: None,
            column: None,
        }
    }

    /// Create a parse error with line/column info.
    pub fn parse_at(
        path: impl Into<PathBuf>,
        message: impl Into<String>,
        line: usize,
        column: usize,
    ) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
            line: Some(line),
            column: Some(column),
        }
    }

    /// Create a config error.
    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a patch error.
    pub fn patch(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Patch {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an interchange error for a 1-indexed line.
    pub fn interchange(path: impl Into<PathBuf>, line: usize, message: impl Into<String>) -> Self {
        Self::Interchange {
            path: path.into(),
            line,
            message: message.into(),
        }
    }

    /// Create an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Check if this is a recoverable error (the batch can continue).
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Parse { .. } | Self::Interchange { .. })
    }

    /// Get the path associated with this error, if any.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Io { path, .. } => Some(path),
            Self::Parse { path, .. } => Some(path),
            Self::Config { path, .. } => Some(path),
            Self::Patch { path, .. } => Some(path),
            Self::Interchange { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// Convenience type alias for iconcat results.
pub type IconcatResult<T> = Result<T, IconcatError>;

/// Extension trait for converting std::io::Error with path context.
pub trait IoResultExt<T> {
    /// Add path context to an I/O error.
    fn with_path(self, path: impl Into<PathBuf>) -> IconcatResult<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> IconcatResult<T> {
        self.map_err(|e| IconcatError::io(path, e))
    }
}
