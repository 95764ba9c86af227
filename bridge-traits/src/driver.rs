//! Native File System Driver Abstraction
//!
//! Provides the narrow, platform-agnostic contract the filesystem core needs
//! from a host filesystem. All cross-platform policy (create/exists/overwrite
//! decisions, encodings, base64 append) lives in the core; a driver only maps
//! each call onto the host primitive.

use bytes::Bytes;
use std::borrow::Cow;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Leading character that marks an entry as hidden on every supported platform.
///
/// Recursive copy and move never filter these entries out.
pub const HIDDEN_FILE_MARKER: char = '.';

/// Label for `path` in adapter log fields
///
/// Adapters only ever log the last segment of a path; directory names above
/// it stay out of the logs. A path without a last segment (a root) is
/// returned whole.
pub fn entry_name(path: &Path) -> Cow<'_, str> {
    match path.file_name() {
        Some(name) => name.to_string_lossy(),
        None => path.to_string_lossy(),
    }
}

/// Native entry type as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeFileType {
    File,
    Directory,
    /// Sockets, FIFOs, devices, dangling links and anything else.
    Other,
}

/// Raw attributes of a single entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeStat {
    pub file_type: NativeFileType,
    pub size: u64,
    /// Creation time in epoch milliseconds, `None` when the platform can't report it
    pub created_at: Option<i64>,
    /// Last modification time in epoch milliseconds
    pub modified_at: Option<i64>,
}

impl NativeStat {
    pub fn is_directory(&self) -> bool {
        self.file_type == NativeFileType::Directory
    }
}

/// Open handle used for byte-level appends.
///
/// Dropping a handle must release the underlying descriptor, so a handle that
/// is abandoned on an early-return path never leaks. [`close`](Self::close)
/// exists to surface flush errors on the success path.
pub trait AppendHandle: Send {
    /// Move the cursor to the end of the entry, returning the new offset.
    fn seek_to_end(&mut self) -> Result<u64>;

    /// Write all of `data` at the current cursor.
    fn write(&mut self, data: &[u8]) -> Result<()>;

    /// Flush and release the handle.
    fn close(self: Box<Self>) -> Result<()>;
}

/// Native filesystem driver trait
///
/// Abstracts the host filesystem so one policy core can run on:
/// - Desktop: `std::fs`
/// - Sandboxed or embedded hosts: an in-process store
/// - Mobile hosts: app-container directories exposed through FFI
///
/// Paths handed to a driver are always absolute and lexically normalized by
/// the caller. Every call is synchronous and runs to completion.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::driver::NativeDriver;
///
/// fn ensure_log(driver: &dyn NativeDriver, path: &Path) -> Result<()> {
///     if !driver.exists(path, false) {
///         driver.create_empty(path, false)?;
///     }
///     Ok(())
/// }
/// ```
pub trait NativeDriver: Send + Sync {
    /// Resolve symbolic links for the existing prefix of `path`.
    ///
    /// The path does not have to exist; any non-existent suffix is appended
    /// to the resolved prefix unchanged.
    fn canonicalize(&self, path: &Path) -> Result<PathBuf>;

    /// Check whether an entry exists.
    ///
    /// With `expect_directory` set, only a directory satisfies the check.
    fn exists(&self, path: &Path, expect_directory: bool) -> bool;

    /// Read the attributes of exactly one entry.
    fn stat(&self, path: &Path) -> Result<NativeStat>;

    /// List the names of the immediate children of a directory, hidden ones included.
    fn list_children(&self, path: &Path) -> Result<Vec<String>>;

    /// Read entire file contents into memory
    fn read_all(&self, path: &Path) -> Result<Bytes>;

    /// Create an empty file or directory. Fails if the entry already exists
    /// or its parent is missing.
    fn create_empty(&self, path: &Path, is_directory: bool) -> Result<()>;

    /// Open an existing file for byte-level updates
    fn open_for_append(&self, path: &Path) -> Result<Box<dyn AppendHandle>>;

    /// Replace the full contents of an existing file
    fn overwrite(&self, path: &Path, data: &[u8]) -> Result<()>;

    /// Delete a file, or a directory and all its contents
    fn delete(&self, path: &Path) -> Result<()>;

    /// Move an entry, recursively for directories.
    fn move_entry(&self, src: &Path, dest: &Path) -> Result<()>;

    /// Copy an entry, recursively for directories, hidden entries included.
    fn copy_entry(&self, src: &Path, dest: &Path) -> Result<()>;

    /// Create a directory, with all missing ancestors when `recursive` is set.
    fn mkdir(&self, path: &Path, recursive: bool) -> Result<()>;
}
