//! Error types shared by every backend.

use std::fmt;

use store::StoreError;

/// Errors returned by [`FileSystem`](crate::fs::FileSystem) operations.
#[derive(Debug, thiserror::Error)]
pub enum FsError {
    #[error("file does not exist: {0}")]
    FileNotFound(String),

    #[error("directory does not exist: {0}")]
    DirNotFound(String),

    #[error("expected path to be a file: {0}")]
    ExpectedFile(String),

    #[error("expected path to be a directory: {0}")]
    ExpectedDir(String),

    #[error("path already exists: {0}")]
    AlreadyExists(String),

    /// Failure reported by the store client, passed through untouched
    #[error("store error: {0}")]
    Transport(#[from] StoreError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{operation} is not supported by the {backend} backend")]
    Unsupported {
        backend: &'static str,
        operation: &'static str,
    },
}

/// Coarse classification of an [`FsError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The target path, key or file is absent
    NotFound,
    /// Expected a file and found a directory, or the reverse
    WrongKind,
    /// The target already exists
    AlreadyExists,
    /// Network or service failure from the store client
    Transport,
    /// Local I/O failure
    Io,
    /// The backend does not implement the operation
    Unsupported,
}

impl FsError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FsError::FileNotFound(_) | FsError::DirNotFound(_) => ErrorKind::NotFound,
            FsError::ExpectedFile(_) | FsError::ExpectedDir(_) => ErrorKind::WrongKind,
            FsError::AlreadyExists(_) => ErrorKind::AlreadyExists,
            FsError::Transport(_) => ErrorKind::Transport,
            FsError::Io(_) => ErrorKind::Io,
            FsError::Unsupported { .. } => ErrorKind::Unsupported,
        }
    }

    pub(crate) fn unsupported(backend: &'static str, operation: &'static str) -> Self {
        FsError::Unsupported { backend, operation }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::NotFound => "not found",
            ErrorKind::WrongKind => "wrong kind",
            ErrorKind::AlreadyExists => "already exists",
            ErrorKind::Transport => "transport",
            ErrorKind::Io => "i/o",
            ErrorKind::Unsupported => "unsupported",
        };
        f.write_str(s)
    }
}

pub type Result<T> = std::result::Result<T, FsError>;
