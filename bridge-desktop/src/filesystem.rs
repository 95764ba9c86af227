//! Native File System Driver Implementation using `std::fs`

use bridge_traits::{
    driver::{entry_name, AppendHandle, NativeDriver, NativeFileType, NativeStat},
    error::{BridgeError, Result},
};
use bytes::Bytes;
use std::fs;
use std::io::{self, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};

/// `std::fs`-based driver implementation
///
/// Maps each driver call onto the host filesystem:
/// - `fs::rename` for moves, with a copy-then-delete fallback across volumes
/// - Hand-rolled recursive copy that walks every entry, hidden ones included,
///   and never replaces an existing destination
/// - `fs::metadata` with a `symlink_metadata` fallback for dangling links
#[derive(Debug, Clone, Default)]
pub struct StdFileSystemDriver;

impl StdFileSystemDriver {
    pub fn new() -> Self {
        Self
    }

    /// Convert std::io::Error to BridgeError, keeping the offending path
    fn map_io_error(path: &Path, e: io::Error) -> BridgeError {
        match e.kind() {
            io::ErrorKind::NotFound => BridgeError::NotFound(path.to_path_buf()),
            io::ErrorKind::AlreadyExists => BridgeError::AlreadyExists(path.to_path_buf()),
            _ => BridgeError::Io(e),
        }
    }

    /// Map a two-path failure onto whichever side caused it
    ///
    /// `NotFound` blames `src` when it is gone, otherwise the destination
    /// side (usually its missing parent). Everything else blames `dest`.
    fn map_transfer_error(src: &Path, dest: &Path, e: io::Error) -> BridgeError {
        match e.kind() {
            io::ErrorKind::NotFound if fs::symlink_metadata(src).is_err() => {
                BridgeError::NotFound(src.to_path_buf())
            }
            _ => Self::map_io_error(dest, e),
        }
    }

    fn ensure_vacant(dest: &Path) -> Result<()> {
        if fs::symlink_metadata(dest).is_ok() {
            return Err(BridgeError::already_exists(dest));
        }
        Ok(())
    }

    /// Copy `src` to `dest` without replacing anything already there.
    ///
    /// `created` flips once `dest` itself exists on disk, so a failed copy
    /// only ever cleans up what it made.
    fn copy_new(src: &Path, dest: &Path, created: &mut bool) -> io::Result<()> {
        let meta = fs::symlink_metadata(src)?;

        if meta.file_type().is_symlink() {
            return Self::copy_symlink(src, dest, created);
        }

        if meta.is_dir() {
            fs::create_dir(dest)?;
            *created = true;
            for entry in fs::read_dir(src)? {
                let entry = entry?;
                Self::copy_new(&entry.path(), &dest.join(entry.file_name()), &mut false)?;
            }
            return Ok(());
        }

        let mut reader = fs::File::open(src)?;
        let mut writer = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(dest)?;
        *created = true;
        io::copy(&mut reader, &mut writer)?;
        writer.set_permissions(meta.permissions())?;
        Ok(())
    }

    #[cfg(unix)]
    fn copy_symlink(src: &Path, dest: &Path, created: &mut bool) -> io::Result<()> {
        let target = fs::read_link(src)?;
        std::os::unix::fs::symlink(target, dest)?;
        *created = true;
        Ok(())
    }

    #[cfg(not(unix))]
    fn copy_symlink(src: &Path, dest: &Path, created: &mut bool) -> io::Result<()> {
        Self::copy_new(&fs::canonicalize(src)?, dest, created)
    }

    /// Copy a whole tree into a vacant `dest`, removing the partial copy on
    /// failure.
    fn copy_tree(src: &Path, dest: &Path) -> Result<()> {
        let mut created = false;
        if let Err(e) = Self::copy_new(src, dest, &mut created) {
            if created {
                if let Err(cleanup) = Self::remove_any(dest) {
                    warn!(
                        entry = %entry_name(dest),
                        error = %cleanup,
                        "Failed to remove partial copy"
                    );
                }
            }
            return Err(Self::map_transfer_error(src, dest, e));
        }
        Ok(())
    }

    fn is_cross_device(e: &io::Error) -> bool {
        // EXDEV on unix, ERROR_NOT_SAME_DEVICE on windows
        #[cfg(unix)]
        const CROSS_DEVICE: i32 = 18;
        #[cfg(windows)]
        const CROSS_DEVICE: i32 = 17;
        #[cfg(not(any(unix, windows)))]
        const CROSS_DEVICE: i32 = -1;

        e.raw_os_error() == Some(CROSS_DEVICE)
    }

    fn epoch_millis(time: io::Result<SystemTime>) -> Option<i64> {
        time.ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map(|d| d.as_millis() as i64)
    }

    fn remove_any(path: &Path) -> io::Result<()> {
        if fs::symlink_metadata(path)?.is_dir() {
            fs::remove_dir_all(path)
        } else {
            fs::remove_file(path)
        }
    }
}

struct StdAppendHandle {
    file: fs::File,
}

impl AppendHandle for StdAppendHandle {
    fn seek_to_end(&mut self) -> Result<u64> {
        Ok(self.file.seek(SeekFrom::End(0))?)
    }

    fn write(&mut self, data: &[u8]) -> Result<()> {
        self.file.write_all(data)?;
        Ok(())
    }

    fn close(mut self: Box<Self>) -> Result<()> {
        self.file.flush()?;
        self.file.sync_data()?;
        Ok(())
    }
}

impl NativeDriver for StdFileSystemDriver {
    fn canonicalize(&self, path: &Path) -> Result<PathBuf> {
        // Resolve the deepest existing ancestor, then re-attach the rest
        let mut existing = path.to_path_buf();
        let mut suffix = Vec::new();

        loop {
            match fs::canonicalize(&existing) {
                Ok(resolved) => {
                    let mut out = resolved;
                    for part in suffix.iter().rev() {
                        out.push(part);
                    }
                    return Ok(out);
                }
                Err(_) => match (existing.file_name(), existing.parent()) {
                    (Some(name), Some(parent)) => {
                        suffix.push(name.to_os_string());
                        existing = parent.to_path_buf();
                    }
                    _ => return Ok(path.to_path_buf()),
                },
            }
        }
    }

    fn exists(&self, path: &Path, expect_directory: bool) -> bool {
        match fs::symlink_metadata(path) {
            Ok(_) if expect_directory => path.is_dir(),
            Ok(_) => true,
            Err(_) => false,
        }
    }

    fn stat(&self, path: &Path) -> Result<NativeStat> {
        let metadata = match fs::metadata(path) {
            Ok(metadata) => metadata,
            // Dangling links still exist as entries
            Err(_) => fs::symlink_metadata(path).map_err(|e| Self::map_io_error(path, e))?,
        };

        let file_type = if metadata.is_dir() {
            NativeFileType::Directory
        } else if metadata.is_file() {
            NativeFileType::File
        } else {
            NativeFileType::Other
        };

        Ok(NativeStat {
            file_type,
            size: metadata.len(),
            created_at: Self::epoch_millis(metadata.created()),
            modified_at: Self::epoch_millis(metadata.modified()),
        })
    }

    fn list_children(&self, path: &Path) -> Result<Vec<String>> {
        let mut names = Vec::new();
        let read_dir = fs::read_dir(path).map_err(|e| Self::map_io_error(path, e))?;

        for entry in read_dir {
            let entry = entry?;
            names.push(entry.file_name().to_string_lossy().into_owned());
        }

        debug!(entry = %entry_name(path), count = names.len(), "Listed directory");
        Ok(names)
    }

    fn read_all(&self, path: &Path) -> Result<Bytes> {
        let data = fs::read(path).map_err(|e| Self::map_io_error(path, e))?;
        debug!(entry = %entry_name(path), size = data.len(), "Read file");
        Ok(Bytes::from(data))
    }

    fn create_empty(&self, path: &Path, is_directory: bool) -> Result<()> {
        if is_directory {
            fs::create_dir(path).map_err(|e| Self::map_io_error(path, e))?;
        } else {
            fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(path)
                .map_err(|e| Self::map_io_error(path, e))?;
        }
        debug!(entry = %entry_name(path), is_directory, "Created entry");
        Ok(())
    }

    fn open_for_append(&self, path: &Path) -> Result<Box<dyn AppendHandle>> {
        let file = fs::OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|e| Self::map_io_error(path, e))?;
        debug!(entry = %entry_name(path), "Opened file for update");
        Ok(Box::new(StdAppendHandle { file }))
    }

    fn overwrite(&self, path: &Path, data: &[u8]) -> Result<()> {
        fs::write(path, data).map_err(|e| Self::map_io_error(path, e))?;
        debug!(entry = %entry_name(path), size = data.len(), "Wrote file");
        Ok(())
    }

    fn delete(&self, path: &Path) -> Result<()> {
        Self::remove_any(path).map_err(|e| Self::map_io_error(path, e))?;
        debug!(entry = %entry_name(path), "Deleted entry");
        Ok(())
    }

    fn move_entry(&self, src: &Path, dest: &Path) -> Result<()> {
        Self::ensure_vacant(dest)?;
        match fs::rename(src, dest) {
            Ok(()) => {}
            Err(e) if Self::is_cross_device(&e) => {
                debug!(
                    src = %entry_name(src),
                    dest = %entry_name(dest),
                    "Rename crosses volumes, copying instead"
                );
                Self::copy_tree(src, dest)?;
                Self::remove_any(src).map_err(|e| Self::map_io_error(src, e))?;
            }
            Err(e) => return Err(Self::map_transfer_error(src, dest, e)),
        }
        debug!(src = %entry_name(src), dest = %entry_name(dest), "Moved entry");
        Ok(())
    }

    fn copy_entry(&self, src: &Path, dest: &Path) -> Result<()> {
        Self::ensure_vacant(dest)?;
        Self::copy_tree(src, dest)?;
        debug!(src = %entry_name(src), dest = %entry_name(dest), "Copied entry");
        Ok(())
    }

    fn mkdir(&self, path: &Path, recursive: bool) -> Result<()> {
        let result = if recursive {
            fs::create_dir_all(path)
        } else {
            fs::create_dir(path)
        };
        result.map_err(|e| Self::map_io_error(path, e))?;
        debug!(entry = %entry_name(path), recursive, "Created directory");
        Ok(())
    }
}
