use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::core::{ReadableFile, Result, WritableFile};
use crate::error::FsError;

/// An open file on local disk, handed out by [`DiskFS`](crate::DiskFS) `read` and `write`.
///
/// The handle owns its file exclusively. After [`close`](ReadableFile::close) every I/O call
/// fails with an error; dropping an unclosed handle still releases the file, but any error
/// raised while doing so is lost.
#[derive(Debug)]
pub struct DiskFile {
    path: PathBuf,
    file: Option<File>,
    writable: bool,
}

impl DiskFile {
    pub(crate) fn reader(path: PathBuf, file: File) -> Self {
        DiskFile {
            path,
            file: Some(file),
            writable: false,
        }
    }

    pub(crate) fn writer(path: PathBuf, file: File) -> Self {
        DiskFile {
            path,
            file: Some(file),
            writable: true,
        }
    }

    /// Resolved path of the underlying file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_closed(&self) -> bool {
        self.file.is_none()
    }

    fn file(&self) -> io::Result<&File> {
        self.file.as_ref().ok_or_else(|| released(&self.path))
    }

    fn file_mut(&mut self) -> io::Result<&mut File> {
        match self.file.as_mut() {
            Some(file) => Ok(file),
            None => Err(released(&self.path)),
        }
    }

    fn release(&mut self) -> Result<()> {
        let Some(file) = self.file.take() else {
            return Ok(());
        };
        tracing::trace!(path = %self.path.display(), "closing disk file");
        if self.writable {
            file.sync_all().map_err(|e| FsError::from_io(&self.path, e))?;
        }
        Ok(())
    }
}

fn released(path: &Path) -> io::Error {
    io::Error::other(format!("{}: file handle has been released", path.display()))
}

impl Read for DiskFile {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.file_mut()?.read(buf)
    }
}

impl Write for DiskFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file_mut()?.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file_mut()?.flush()
    }
}

impl Seek for DiskFile {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.file_mut()?.seek(pos)
    }
}

impl ReadableFile for DiskFile {
    fn read_at(&self, buf: &mut [u8], offset: u64) -> io::Result<usize> {
        read_at(self.file()?, buf, offset)
    }

    fn close(&mut self) -> Result<()> {
        self.release()
    }
}

impl WritableFile for DiskFile {
    fn write_at(&self, buf: &[u8], offset: u64) -> io::Result<usize> {
        write_at(self.file()?, buf, offset)
    }

    fn close(&mut self) -> Result<()> {
        self.release()
    }
}

#[cfg(unix)]
fn read_at(file: &File, buf: &mut [u8], offset: u64) -> io::Result<usize> {
    std::os::unix::fs::FileExt::read_at(file, buf, offset)
}

#[cfg(unix)]
fn write_at(file: &File, buf: &[u8], offset: u64) -> io::Result<usize> {
    std::os::unix::fs::FileExt::write_at(file, buf, offset)
}

// Windows' positional I/O moves the cursor, so it's saved and restored around the call.
#[cfg(windows)]
fn read_at(file: &File, buf: &mut [u8], offset: u64) -> io::Result<usize> {
    let mut cursor = file;
    let pos = cursor.stream_position()?;
    let n = std::os::windows::fs::FileExt::seek_read(file, buf, offset);
    cursor.seek(SeekFrom::Start(pos))?;
    n
}

#[cfg(windows)]
fn write_at(file: &File, buf: &[u8], offset: u64) -> io::Result<usize> {
    let mut cursor = file;
    let pos = cursor.stream_position()?;
    let n = std::os::windows::fs::FileExt::seek_write(file, buf, offset);
    cursor.seek(SeekFrom::Start(pos))?;
    n
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    fn setup_test_env() -> TempDir {
        TempDir::new("diskfile_test").unwrap()
    }

    fn open_reader(dir: &TempDir, name: &str, content: &[u8]) -> DiskFile {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        let file = File::open(&path).unwrap();
        DiskFile::reader(path, file)
    }

    fn open_writer(dir: &TempDir, name: &str) -> DiskFile {
        let path = dir.path().join(name);
        let file = File::create(&path).unwrap();
        DiskFile::writer(path, file)
    }

    #[test]
    fn test_sequential_and_positional_read() {
        let temp_dir = setup_test_env();
        let mut file = open_reader(&temp_dir, "abc.txt", b"abcdef");

        let mut buf = [0u8; 2];
        file.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"ab");

        // read_at leaves the cursor alone
        let mut at = [0u8; 3];
        assert_eq!(file.read_at(&mut at, 3).unwrap(), 3);
        assert_eq!(&at, b"def");

        let mut rest = Vec::new();
        file.read_to_end(&mut rest).unwrap();
        assert_eq!(rest, b"cdef");
    }

    #[test]
    fn test_seek_then_read() {
        let temp_dir = setup_test_env();
        let mut file = open_reader(&temp_dir, "abc.txt", b"abcdef");

        assert_eq!(file.seek(SeekFrom::End(-2)).unwrap(), 4);
        let mut rest = String::new();
        file.read_to_string(&mut rest).unwrap();
        assert_eq!(rest, "ef");
    }

    #[test]
    fn test_sequential_and_positional_write() {
        let temp_dir = setup_test_env();
        let mut file = open_writer(&temp_dir, "out.txt");

        file.write_all(b"hello world").unwrap();
        file.write_at(b"W", 6).unwrap();
        file.seek(SeekFrom::Start(0)).unwrap();
        file.write_all(b"J").unwrap();
        WritableFile::close(&mut file).unwrap();

        let content = std::fs::read(temp_dir.path().join("out.txt")).unwrap();
        assert_eq!(content, b"Jello World");
    }

    #[test]
    fn test_io_after_close_fails() {
        let temp_dir = setup_test_env();
        let mut reader = open_reader(&temp_dir, "abc.txt", b"abc");
        ReadableFile::close(&mut reader).unwrap();

        assert!(reader.is_closed());
        let mut buf = [0u8; 1];
        assert!(reader.read(&mut buf).is_err());
        assert!(reader.read_at(&mut buf, 0).is_err());
        assert!(reader.seek(SeekFrom::Start(0)).is_err());

        let mut writer = open_writer(&temp_dir, "out.txt");
        WritableFile::close(&mut writer).unwrap();
        assert!(writer.write(b"x").is_err());
        assert!(writer.write_at(b"x", 0).is_err());
        assert!(writer.flush().is_err());
    }

    #[test]
    fn test_close_twice_is_noop() {
        let temp_dir = setup_test_env();
        let mut writer = open_writer(&temp_dir, "out.txt");
        WritableFile::close(&mut writer).unwrap();
        assert!(WritableFile::close(&mut writer).is_ok());
    }
}
