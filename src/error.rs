use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Facade-level error returned by every fallible [`FsBackend`](crate::FsBackend) operation.
///
/// Each variant carries the resolved path(s) the operation was working on, so the message is
/// useful without any extra context from the caller.
#[derive(Error, Debug)]
pub enum FsError {
    /// Nothing exists at the resolved path.
    #[error("{} does not exist", .0.display())]
    NotFound(PathBuf),
    /// The resolved path exists but is not a directory.
    #[error("{} is not a directory", .0.display())]
    NotADirectory(PathBuf),
    /// The resolved path is a directory where a file was expected.
    #[error("{} is a directory", .0.display())]
    IsADirectory(PathBuf),
    /// The move destination exists and its kind is incompatible with the source.
    #[error("cannot move {} to {}: destination already exists", .from.display(), .to.display())]
    Conflict { from: PathBuf, to: PathBuf },
    /// The storage layer failed for an environmental reason.
    #[error("i/o error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Copyable discriminant of [`FsError`], handy for `assert_eq!` and `match` without
/// destructuring the payload.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    NotADirectory,
    IsADirectory,
    Conflict,
    Io,
}

impl FsError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FsError::NotFound(_) => ErrorKind::NotFound,
            FsError::NotADirectory(_) => ErrorKind::NotADirectory,
            FsError::IsADirectory(_) => ErrorKind::IsADirectory,
            FsError::Conflict { .. } => ErrorKind::Conflict,
            FsError::Io { .. } => ErrorKind::Io,
        }
    }

    /// Translates a storage-layer error raised while working on `path`.
    pub fn from_io<P: AsRef<Path>>(path: P, err: io::Error) -> Self {
        let path = path.as_ref().to_path_buf();
        match err.kind() {
            io::ErrorKind::NotFound => FsError::NotFound(path),
            io::ErrorKind::NotADirectory => FsError::NotADirectory(path),
            io::ErrorKind::IsADirectory => FsError::IsADirectory(path),
            _ => FsError::Io { path, source: err },
        }
    }
}
