mod disk_file;
mod disk_fs;
mod entry;

pub use disk_file::DiskFile;
pub use disk_fs::DiskFS;
pub use entry::{EntryType, FileInfo};
