//! This module provides the local disk implementation of [`FsBackend`]. Every operation is
//! resolved against the backend's root directory and performed directly on the host file
//! system; nothing is cached.
//!
//! ### Key Features:
//! - **Rooted paths**: All paths are joined under `root` and normalized lexically (`.` and `..`
//!   are applied without touching the disk).
//! - **Cheap scoping**: `cd()` returns a new `DiskFS` and leaves the receiver untouched, so one
//!   instance can be shared across threads and scoped freely.
//! - **Shell-like edges**: `rm()` of a missing entry and `ls()` of a missing directory are not
//!   errors; `write()` and `mv()` create missing parent directories.

use std::fs::{self, DirBuilder, File};
use std::io;
use std::path::{Path, PathBuf};

use crate::core::{FsBackend, Result, utils};
use crate::error::FsError;
use crate::filter::{self, FileFilter};
use crate::vfs::{DiskFile, FileInfo};

const DEFAULT_DIR_MODE: u32 = 0o755;

/// A file store whose operations interact with the local file system.
///
/// `DiskFS` is a plain value holding its root path and options. The root may be relative or
/// absolute and does not need to exist: operations report missing paths when they run.
///
/// ### Usage notes:
/// - Paths escape the root only through explicit `..` segments; a leading `/` is ignored.
/// - Symbolic links are followed by `stat()`/`read()`, but `rm()` removes the link itself.
/// - Errors are returned as [`FsError`] values carrying the resolved path.
///
/// ### Example:
/// ```
/// use filestore::{DiskFS, FsBackend};
///
/// let tmp = std::env::temp_dir().join("filestore_doc");
/// let fs = DiskFS::new(&tmp);
///
/// fs.write_all("docs/note.txt", b"Hello").unwrap();
/// assert!(fs.exists("docs/note.txt"));
///
/// let docs = fs.cd("docs");
/// assert_eq!(docs.read_all("note.txt").unwrap(), b"Hello");
///
/// fs.rm(".").unwrap();
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DiskFS {
    root: PathBuf, // normalized, possibly relative
    dir_mode: u32,
}

impl DiskFS {
    /// Creates a new `DiskFS` rooted at `root`. Nothing is created on disk.
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        DiskFS {
            root: utils::normalize(root),
            dir_mode: DEFAULT_DIR_MODE,
        }
    }

    /// Sets the permission bits used for directories this store creates (unix only).
    pub fn with_dir_mode(mut self, mode: u32) -> Self {
        self.dir_mode = mode;
        self
    }

    pub fn dir_mode(&self) -> u32 {
        self.dir_mode
    }

    /// Returns the host path for `path`.
    fn resolve<P: AsRef<Path>>(&self, path: P) -> PathBuf {
        let resolved = utils::join(&self.root, path.as_ref());
        tracing::trace!(
            path = %path.as_ref().display(),
            resolved = %resolved.display(),
            "resolve"
        );
        resolved
    }

    /// Creates `dir` and all its missing parents.
    ///
    /// Returns the topmost directory that did not exist before, if any.
    fn mkdir_all(&self, dir: &Path) -> Result<Option<PathBuf>> {
        if dir.as_os_str().is_empty() || dir.is_dir() {
            return Ok(None);
        }
        let created = dir
            .ancestors()
            .take_while(|p| !p.as_os_str().is_empty() && fs::symlink_metadata(p).is_err())
            .last()
            .map(Path::to_path_buf);
        tracing::debug!(
            dir = %dir.display(),
            mode = format_args!("{:o}", self.dir_mode),
            "creating directories"
        );

        let mut builder = DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(self.dir_mode);
        }
        builder.create(dir).map_err(|e| match e.kind() {
            // a file sits where a directory is needed
            io::ErrorKind::AlreadyExists | io::ErrorKind::NotADirectory => {
                FsError::NotADirectory(dir.to_path_buf())
            }
            _ => FsError::from_io(dir, e),
        })?;
        Ok(created)
    }

    fn mkdir_parent(&self, path: &Path) -> Result<Option<PathBuf>> {
        match path.parent() {
            Some(parent) => self.mkdir_all(parent),
            None => Ok(None),
        }
    }
}

impl FsBackend for DiskFS {
    type Reader = DiskFile;
    type Writer = DiskFile;

    /// Returns the normalized root of this store.
    fn cwd(&self) -> &Path {
        self.root.as_path()
    }

    fn stat<P: AsRef<Path>>(&self, path: P) -> Result<FileInfo> {
        let host = self.resolve(path);
        let metadata = fs::metadata(&host).map_err(|e| FsError::from_io(&host, e))?;
        Ok(FileInfo::from_metadata(utils::base_name(&host), &metadata))
    }

    fn exists<P: AsRef<Path>>(&self, path: P) -> bool {
        fs::metadata(self.resolve(path)).is_ok()
    }

    /// Opens the file at `path` for reading.
    ///
    /// # Returns
    /// * `Ok(DiskFile)` - A handle positioned at the start of the file.
    /// * `Err(FsError)` - If:
    ///   - nothing exists at `path` ([`FsError::NotFound`]);
    ///   - `path` is a directory ([`FsError::IsADirectory`]);
    ///   - the host refuses to open the file ([`FsError::Io`]).
    fn read<P: AsRef<Path>>(&self, path: P) -> Result<DiskFile> {
        let host = self.resolve(path);
        let metadata = fs::metadata(&host).map_err(|e| FsError::from_io(&host, e))?;
        if metadata.is_dir() {
            return Err(FsError::IsADirectory(host));
        }
        let file = File::open(&host).map_err(|e| FsError::from_io(&host, e))?;
        Ok(DiskFile::reader(host, file))
    }

    /// Opens the file at `path` for writing.
    ///
    /// # Behavior
    /// - **Overwrites completely**: An existing file is truncated, not appended to.
    /// - **Parent creation**: Missing parent directories are created with `dir_mode`.
    /// - **Root**: The store's own root is a directory, never a file target.
    fn write<P: AsRef<Path>>(&self, path: P) -> Result<DiskFile> {
        let host = self.resolve(path);
        if host == self.root {
            return Err(FsError::IsADirectory(host));
        }
        self.mkdir_parent(&host)?;

        tracing::debug!(path = %host.display(), "opening file for writing");
        let file = File::create(&host).map_err(|e| FsError::from_io(&host, e))?;
        Ok(DiskFile::writer(host, file))
    }

    /// Returns the immediate children of the directory at `path` that pass every filter.
    ///
    /// # Notes
    /// - **No recursion**: Nested entries are not included.
    /// - **Ordering**: Entries are sorted by name.
    /// - **Missing directory**: Yields an empty list, not an error.
    /// - **Not a directory**: Listing a file fails with [`FsError::NotADirectory`].
    fn ls<P: AsRef<Path>>(&self, path: P, filters: &[FileFilter]) -> Result<Vec<FileInfo>> {
        let host = self.resolve(path);
        let entries = match fs::read_dir(&host) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(FsError::from_io(&host, e)),
        };

        let mut infos = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| FsError::from_io(&host, e))?;
            let metadata = entry
                .metadata()
                .map_err(|e| FsError::from_io(entry.path(), e))?;
            let info = FileInfo::from_metadata(entry.file_name().to_string_lossy(), &metadata);
            if filter::matches_all(&info, filters) {
                infos.push(info);
            }
        }
        infos.sort_by(|a, b| a.name().cmp(b.name()));

        tracing::trace!(dir = %host.display(), count = infos.len(), "listed directory");
        Ok(infos)
    }

    fn cd<P: AsRef<Path>>(&self, path: P) -> Self {
        DiskFS {
            root: self.resolve(path),
            dir_mode: self.dir_mode,
        }
    }

    /// Removes a file or directory at `path`.
    ///
    /// If `path` is a directory, all its contents are removed recursively. A missing `path`
    /// is silently ignored.
    fn rm<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let host = self.resolve(path);
        let metadata = match fs::symlink_metadata(&host) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(FsError::from_io(&host, e)),
        };

        tracing::debug!(path = %host.display(), dir = metadata.is_dir(), "removing");
        let removed = if metadata.is_dir() {
            fs::remove_dir_all(&host)
        } else {
            fs::remove_file(&host)
        };
        match removed {
            // someone else got there first
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other.map_err(|e| FsError::from_io(&host, e)),
        }
    }

    /// Moves the entry at `from` to `to`.
    ///
    /// # Behavior
    /// - A file replaces an existing file at `to`.
    /// - A file never replaces a directory, and a directory never replaces anything; both
    ///   fail with [`FsError::Conflict`] before anything is touched.
    /// - Missing parents of `to` are created, and removed again if the rename fails.
    /// - Moving an entry beneath itself fails with [`FsError::Conflict`].
    fn mv<P: AsRef<Path>, Q: AsRef<Path>>(&self, from: P, to: Q) -> Result<()> {
        let from = self.resolve(from);
        let to = self.resolve(to);

        let source = fs::metadata(&from).map_err(|e| FsError::from_io(&from, e))?;
        if to != from && to.starts_with(&from) {
            return Err(FsError::Conflict { from, to });
        }
        match fs::symlink_metadata(&to) {
            Ok(target) if source.is_dir() || target.is_dir() => {
                return Err(FsError::Conflict { from, to });
            }
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(FsError::from_io(&to, e)),
        }

        let created = self.mkdir_parent(&to)?;

        tracing::debug!(from = %from.display(), to = %to.display(), "moving");
        rename_or_undo(&from, &to, created)
    }
}

/// Renames `from` to `to`. On failure `created` (the parents made for `to`) is removed again.
fn rename_or_undo(from: &Path, to: &Path, created: Option<PathBuf>) -> Result<()> {
    let Err(e) = fs::rename(from, to) else {
        return Ok(());
    };
    if let Some(dir) = created {
        if let Err(cleanup) = fs::remove_dir_all(&dir) {
            tracing::debug!(dir = %dir.display(), %cleanup, "failed to remove created parents");
        }
    }
    Err(FsError::from_io(from, e))
}
