//! Error types shared by the button model and the profile store

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Coarse classification of a [`ProfileError`], for callers that only need to branch on it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Corrupt,
    Io,
    InvalidFunction,
    InvalidButton,
    InvalidValue,
}

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("profile '{name}' not found at {path:?}")]
    NotFound { name: String, path: PathBuf },

    #[error("profile file {path:?} is corrupt: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("button {index}: unknown function '{value}'")]
    InvalidFunction { index: usize, value: String },

    #[error("button index {0} out of range (valid: 0-11)")]
    InvalidButton(usize),

    #[error("DPI {0} out of range (400-19000)")]
    InvalidDpi(u32),

    #[error("unsupported polling rate '{0}'")]
    InvalidPollingRate(String),
}

impl ProfileError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProfileError::NotFound { .. } => ErrorKind::NotFound,
            ProfileError::Corrupt { .. } => ErrorKind::Corrupt,
            ProfileError::Io { .. } => ErrorKind::Io,
            ProfileError::InvalidFunction { .. } => ErrorKind::InvalidFunction,
            ProfileError::InvalidButton(_) => ErrorKind::InvalidButton,
            ProfileError::InvalidDpi(_) | ProfileError::InvalidPollingRate(_) => {
                ErrorKind::InvalidValue
            }
        }
    }

    /// NotFound and Corrupt both mean "no usable profile yet"; the caller warns and carries on
    pub fn is_recoverable_as_missing(&self) -> bool {
        matches!(self.kind(), ErrorKind::NotFound | ErrorKind::Corrupt)
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ProfileError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn corrupt(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        ProfileError::Corrupt {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ProfileError>;
