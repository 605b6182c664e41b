use std::io::{self, Read, Seek, Write};
use std::path::Path;

use crate::error::FsError;
use crate::filter::FileFilter;
use crate::vfs::FileInfo;

pub type Result<T> = std::result::Result<T, FsError>;

/// A file tree rooted at some working directory.
///
/// Every path argument is resolved against [`cwd`](FsBackend::cwd): a leading `/` is ignored,
/// `.` and `..` segments are applied lexically. Implementations are immutable values; `cd`
/// hands out a new, independently rooted backend and never touches the receiver.
pub trait FsBackend {
    type Reader: ReadableFile;
    type Writer: WritableFile;

    /// Returns the normalized root of this backend.
    fn cwd(&self) -> &Path;

    /// Fetches metadata about the entry w/o opening it for reading/writing.
    fn stat<P: AsRef<Path>>(&self, path: P) -> Result<FileInfo>;

    /// Returns `true` if anything exists at `path`. Never fails.
    fn exists<P: AsRef<Path>>(&self, path: P) -> bool;

    /// Opens an existing regular file for reading.
    fn read<P: AsRef<Path>>(&self, path: P) -> Result<Self::Reader>;

    /// Opens a file for writing, truncating it if it already exists.
    /// Missing parent directories are created.
    fn write<P: AsRef<Path>>(&self, path: P) -> Result<Self::Writer>;

    /// Lists the immediate children of the directory at `path`, keeping only the entries
    /// accepted by every filter.
    ///
    /// A missing directory yields an empty list; a path that points to a file is an error.
    fn ls<P: AsRef<Path>>(&self, path: P, filters: &[FileFilter]) -> Result<Vec<FileInfo>>;

    /// Returns a new backend rooted at `path` relative to this one.
    /// The target is not required to exist.
    fn cd<P: AsRef<Path>>(&self, path: P) -> Self;

    /// Removes a file, or a directory with everything beneath it.
    /// Removing something that does not exist is a no-op.
    fn rm<P: AsRef<Path>>(&self, path: P) -> Result<()>;

    /// Moves the entry at `from` to `to`.
    ///
    /// | from      | existing `to` | result                        |
    /// |-----------|---------------|-------------------------------|
    /// | file      | none          | moved, parents of `to` created |
    /// | file      | file          | `to` overwritten              |
    /// | file      | directory     | [`FsError::Conflict`]         |
    /// | directory | none          | moved, parents of `to` created |
    /// | directory | any           | [`FsError::Conflict`]         |
    ///
    /// Moving an entry into its own subtree is a [`FsError::Conflict`] as well. A failed move
    /// leaves both `from` and `to` as they were.
    fn mv<P: AsRef<Path>, Q: AsRef<Path>>(&self, from: P, to: Q) -> Result<()>;

    /// Reads the entire contents of a file into a byte vector.
    fn read_all<P: AsRef<Path>>(&self, path: P) -> Result<Vec<u8>> {
        let path = path.as_ref();
        let mut file = self.read(path)?;
        let mut content = Vec::new();
        let read = file.read_to_end(&mut content);
        let closed = file.close();
        read.map_err(|e| FsError::from_io(utils::join(self.cwd(), path), e))?;
        closed?;
        Ok(content)
    }

    /// Replaces the entire contents of a file, creating it (and its parents) if necessary.
    fn write_all<P: AsRef<Path>>(&self, path: P, content: &[u8]) -> Result<()> {
        let path = path.as_ref();
        let mut file = self.write(path)?;
        let written = Write::write_all(&mut file, content);
        let closed = file.close();
        written.map_err(|e| FsError::from_io(utils::join(self.cwd(), path), e))?;
        closed
    }
}

/// An open file that can be read sequentially or at arbitrary offsets.
pub trait ReadableFile: Read + Seek {
    /// Reads from `offset` without moving the cursor.
    fn read_at(&self, buf: &mut [u8], offset: u64) -> io::Result<usize>;

    /// Releases the handle. Any further I/O fails; closing twice is a no-op.
    fn close(&mut self) -> Result<()>;
}

/// An open file that can be written sequentially or at arbitrary offsets.
pub trait WritableFile: Write + Seek {
    /// Writes at `offset` without moving the cursor.
    fn write_at(&self, buf: &[u8], offset: u64) -> io::Result<usize>;

    /// Flushes and releases the handle. Any further I/O fails; closing twice is a no-op.
    fn close(&mut self) -> Result<()>;
}

pub mod utils {
    use std::path::{Component, Path, PathBuf};

    /// Lexically normalizes `path`: drops `.` segments and trailing separators, lets `..` eat
    /// the previous segment. Leading `..` survive on relative paths and vanish at a root.
    /// An empty result is `.`.
    pub fn normalize<P: AsRef<Path>>(path: P) -> PathBuf {
        let mut parts: Vec<Component> = Vec::new();

        for component in path.as_ref().components() {
            match component {
                Component::CurDir => {}
                Component::ParentDir => match parts.last() {
                    Some(Component::Normal(_)) => {
                        parts.pop();
                    }
                    Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                    _ => parts.push(component),
                },
                _ => parts.push(component),
            }
        }

        if parts.is_empty() {
            return PathBuf::from(".");
        }
        parts.iter().collect()
    }

    /// Joins `path` under `base` and normalizes the result.
    /// Root and prefix components of `path` are ignored, so it can't replace `base`.
    pub fn join<P: AsRef<Path>, Q: AsRef<Path>>(base: P, path: Q) -> PathBuf {
        let mut joined = base.as_ref().to_path_buf();
        for component in path.as_ref().components() {
            match component {
                Component::Prefix(_) | Component::RootDir => {}
                other => joined.push(other),
            }
        }
        normalize(joined)
    }

    /// Last segment of a normalized path, e.g. `b.txt` for `a/b.txt`, `..` for `../..`.
    pub fn base_name<P: AsRef<Path>>(path: P) -> String {
        match path.as_ref().components().next_back() {
            Some(component) => component.as_os_str().to_string_lossy().into_owned(),
            None => String::from("."),
        }
    }

}
