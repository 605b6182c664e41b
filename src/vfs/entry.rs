use std::fs::Metadata;
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum EntryType {
    File,
    Directory,
}

/// Point-in-time snapshot of an entry's metadata, as returned by `stat` and `ls`.
#[derive(Debug, Clone, PartialEq)]
pub struct FileInfo {
    name: String,
    len: u64,
    entry_type: EntryType,
    modified: SystemTime,
    mode: u32,
}

impl FileInfo {
    #[cfg(test)]
    pub(crate) fn new<S: Into<String>>(name: S, entry_type: EntryType) -> FileInfo {
        FileInfo {
            name: name.into(),
            len: 0,
            entry_type,
            modified: UNIX_EPOCH,
            mode: 0,
        }
    }

    pub(crate) fn from_metadata<S: Into<String>>(name: S, metadata: &Metadata) -> FileInfo {
        let entry_type = if metadata.is_dir() {
            EntryType::Directory
        } else {
            EntryType::File
        };
        FileInfo {
            name: name.into(),
            len: metadata.len(),
            entry_type,
            modified: metadata.modified().unwrap_or(UNIX_EPOCH),
            mode: permission_bits(metadata),
        }
    }

    /// Base name of the entry, without any parent path.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Size in bytes.
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn entry_type(&self) -> EntryType {
        self.entry_type
    }

    pub fn is_file(&self) -> bool {
        self.entry_type == EntryType::File
    }

    pub fn is_dir(&self) -> bool {
        self.entry_type == EntryType::Directory
    }

    /// Last modification time; `UNIX_EPOCH` if the platform can't report it.
    pub fn modified(&self) -> SystemTime {
        self.modified
    }

    /// Permission bits (`0o644` and friends).
    pub fn mode(&self) -> u32 {
        self.mode
    }
}

#[cfg(unix)]
fn permission_bits(metadata: &Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o7777
}

#[cfg(not(unix))]
fn permission_bits(metadata: &Metadata) -> u32 {
    match (metadata.is_dir(), metadata.permissions().readonly()) {
        (true, true) => 0o555,
        (true, false) => 0o755,
        (false, true) => 0o444,
        (false, false) => 0o644,
    }
}
