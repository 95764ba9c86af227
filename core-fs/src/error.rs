use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use bridge_traits::error::BridgeError;
use thiserror::Error;

use crate::encoding::ContentEncoding;

/// Failure taxonomy of the filesystem façade
///
/// Every variant is an expected outcome; callers that only care about
/// success can use `.is_ok()`.
#[derive(Error, Debug)]
pub enum FsError {
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("No such file or directory: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Entry already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("Expected a {expected} at {}", .path.display())]
    WrongType {
        path: PathBuf,
        expected: &'static str,
    },

    #[error("Content is not valid {encoding}: {message}")]
    InvalidContent {
        encoding: ContentEncoding,
        message: String,
    },

    #[error("I/O failure: {0}")]
    Io(#[source] BridgeError),
}

impl FsError {
    /// Classify a bridge error, using `path` when the bridge did not name one
    pub fn from_bridge(err: BridgeError, path: &Path) -> Self {
        match err {
            BridgeError::NotFound(p) => Self::NotFound(p),
            BridgeError::AlreadyExists(p) => Self::AlreadyExists(p),
            BridgeError::NotADirectory(p) => Self::WrongType {
                path: p,
                expected: "directory",
            },
            BridgeError::NotAFile(p) => Self::WrongType {
                path: p,
                expected: "file",
            },
            BridgeError::InvalidPath(msg) => Self::InvalidPath(msg),
            BridgeError::Io(e) => match e.kind() {
                ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
                ErrorKind::AlreadyExists => Self::AlreadyExists(path.to_path_buf()),
                _ => Self::Io(BridgeError::Io(e)),
            },
            other => Self::Io(other),
        }
    }

    pub(crate) fn invalid_content(encoding: ContentEncoding, message: impl ToString) -> Self {
        Self::InvalidContent {
            encoding,
            message: message.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<BridgeError> for FsError {
    fn from(err: BridgeError) -> Self {
        Self::from_bridge(err, Path::new(""))
    }
}

pub type FsResult<T> = std::result::Result<T, FsError>;
