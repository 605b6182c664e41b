//! A small, storage-agnostic file system facade for Rust.
//! Calling code works against the `FsBackend` trait instead of hardcoding "local disk", so the
//! same code can later run on other storages.
//!
//! ### Overview
//!
//! `filestore` exposes a handful of shell-like operations (`stat`, `read`, `write`, `exists`,
//! `ls`, `cd`, `rm`, `mv`) rooted in a working directory. `DiskFS` implements them on the
//! local file system.
//!
//! **Key ideas**:
//! - **Rooted**: Every path is resolved against the backend's working directory.
//! - **Immutable**: `cd()` returns a new backend; the receiver never changes.
//! - **Shell ergonomics**: Removing a missing entry or listing a missing directory is not an
//!   error; writing or moving into a missing directory creates it.
//! - **Composable filters**: `ls()` keeps entries accepted by every filter (see [`filter`]).
//!
//! ```no_run
//! use filestore::{DiskFS, FsBackend, filter::with_ext};
//!
//! let files = DiskFS::new("./data");
//! let configs = files.ls("conf", &[with_ext("json")]).unwrap();
//! for info in configs {
//!     println!("{} ({} bytes)", info.name(), info.len());
//! }
//! ```

mod core;
mod error;
pub mod filter;
pub mod path;
mod vfs;

pub use crate::core::{FsBackend, ReadableFile, Result, WritableFile, utils};
pub use error::{ErrorKind, FsError};
pub use filter::FileFilter;
pub use vfs::{DiskFS, DiskFile, EntryType, FileInfo};
