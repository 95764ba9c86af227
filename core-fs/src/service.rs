//! # Filesystem Façade
//!
//! [`FileSystemService`] holds every cross-platform policy decision and
//! delegates the raw calls to the injected [`NativeDriver`]:
//!
//! - inputs are normalized into a [`PathComponent`] first; a null-backed
//!   component fails with `InvalidPath` before the driver is consulted
//! - mutating calls perform exactly one existence check (a `stat`) and then
//!   apply the create/exists/overwrite matrix
//! - base64 appends decode the stored text, concatenate, and rewrite the
//!   whole file
//! - append handles are closed on every exit path
//!
//! All operations are synchronous. The service keeps no mutable state, so it
//! can be cloned and shared across threads; ordering between concurrent calls
//! on the same path is whatever the host filesystem provides.

use std::collections::HashSet;
use std::path::{Path as StdPath, PathBuf};
use std::sync::Arc;

use bridge_traits::{LocationResolver, NativeDriver, NativeStat, StandardLocation};
use bytes::Bytes;
use core_runtime::config::FileSystemConfig;
use core_runtime::logging::display_path;
use tracing::{debug, warn};

use crate::encoding::ContentEncoding;
use crate::error::{FsError, FsResult};
use crate::options::WriteOptions;
use crate::path::{Path, PathComponent};
use crate::property::FileProperty;

/// Uniform filesystem API over a native driver
#[derive(Clone)]
pub struct FileSystemService {
    driver: Arc<dyn NativeDriver>,
    locations: Arc<dyn LocationResolver>,
    base64_line_width: Option<usize>,
    redact_paths: bool,
}

impl std::fmt::Debug for FileSystemService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileSystemService")
            .field("base64_line_width", &self.base64_line_width)
            .field("redact_paths", &self.redact_paths)
            .finish_non_exhaustive()
    }
}

impl FileSystemService {
    /// Create a service from a validated configuration
    pub fn new(config: FileSystemConfig) -> Self {
        Self {
            driver: config.driver,
            locations: config.locations,
            base64_line_width: config.base64_line_width,
            redact_paths: config.redact_paths,
        }
    }

    // ------------------------------------------------------------------
    // Standard locations
    // ------------------------------------------------------------------

    /// Common contents directory; exists when returned
    pub fn contents_directory(&self) -> FsResult<Path> {
        self.location(StandardLocation::Contents)
    }

    /// Caches directory; exists when returned
    pub fn caches_directory(&self) -> FsResult<Path> {
        self.location(StandardLocation::Caches)
    }

    /// Temporary directory; exists when returned
    pub fn temporary_directory(&self) -> FsResult<Path> {
        self.location(StandardLocation::Temporary)
    }

    fn location(&self, location: StandardLocation) -> FsResult<Path> {
        let dir = self
            .locations
            .resolve(location)
            .map_err(|e| FsError::from_bridge(e, &PathBuf::from(location.to_string())))?;
        debug!(%location, path = %self.shown(&dir), "Resolved standard location");
        Ok(Path::from_path_string(&dir.to_string_lossy()))
    }

    // ------------------------------------------------------------------
    // Metadata
    // ------------------------------------------------------------------

    /// Properties of the immediate children of a directory
    ///
    /// An empty directory yields an empty list. A missing path fails with
    /// `NotFound`, a file with `WrongType`. Entries are sorted by name.
    pub fn read_dir(&self, path: impl Into<PathComponent>) -> FsResult<Vec<FileProperty>> {
        let (component, target) = self.resolve(path)?;

        match self.lookup(&target)? {
            None => return Err(FsError::NotFound(target)),
            Some(stat) if !stat.is_directory() => {
                return Err(FsError::WrongType {
                    path: target,
                    expected: "directory",
                })
            }
            Some(_) => {}
        }

        let mut names = self
            .driver
            .list_children(&target)
            .map_err(|e| FsError::from_bridge(e, &target))?;
        names.sort();

        let mut properties = Vec::with_capacity(names.len());
        for name in names {
            let Some(child) = component.by_appending(&name) else {
                continue;
            };
            match self.property(child) {
                Ok(property) => properties.push(property),
                // Removed between listing and stat
                Err(FsError::NotFound(_)) => continue,
                Err(err) => return Err(err),
            }
        }

        debug!(path = %self.shown(&target), count = properties.len(), "Read directory");
        Ok(properties)
    }

    /// Stats for a single entry
    pub fn property(&self, path: impl Into<PathComponent>) -> FsResult<FileProperty> {
        let (component, target) = self.resolve(path)?;

        let stat = self
            .driver
            .stat(&target)
            .map_err(|e| FsError::from_bridge(e, &target))?;

        let canonical = match self.driver.canonicalize(&target) {
            Ok(resolved) => PathComponent::from(resolved),
            Err(err) => {
                debug!(
                    path = %self.shown(&target),
                    error = %self.shown_error(&err, &target),
                    "Falling back to lexical path"
                );
                component.clone()
            }
        };

        Ok(FileProperty::from_stat(component, canonical, stat))
    }

    /// Total size in bytes of every file below a directory
    ///
    /// Hidden entries are counted. Directories reached twice through
    /// symbolic links are counted once.
    pub fn directory_size(&self, path: impl Into<PathComponent>) -> FsResult<u64> {
        let (_, target) = self.resolve(path)?;

        match self.lookup(&target)? {
            None => return Err(FsError::NotFound(target)),
            Some(stat) if !stat.is_directory() => {
                return Err(FsError::WrongType {
                    path: target,
                    expected: "directory",
                })
            }
            Some(_) => {}
        }

        let mut total = 0u64;
        let mut visited = HashSet::new();
        let mut pending = vec![target.clone()];

        while let Some(dir) = pending.pop() {
            let key = self.driver.canonicalize(&dir).unwrap_or_else(|_| dir.clone());
            if !visited.insert(key) {
                continue;
            }

            let names = self
                .driver
                .list_children(&dir)
                .map_err(|e| FsError::from_bridge(e, &dir))?;

            for name in names {
                let child = dir.join(&name);
                match self.lookup(&child)? {
                    Some(stat) if stat.is_directory() => pending.push(child),
                    Some(stat) => total = total.saturating_add(stat.size),
                    None => {}
                }
            }
        }

        debug!(path = %self.shown(&target), size = total, "Computed directory size");
        Ok(total)
    }

    // ------------------------------------------------------------------
    // Read
    // ------------------------------------------------------------------

    /// Contents of a file decoded with `encoding`
    pub fn read_file(
        &self,
        path: impl Into<PathComponent>,
        encoding: ContentEncoding,
    ) -> FsResult<String> {
        let (_, target) = self.resolve(path)?;
        let bytes = self.read_existing(&target)?;
        let text = encoding.decode(&bytes)?;

        debug!(path = %self.shown(&target), %encoding, size = bytes.len(), "Read file");
        Ok(text)
    }

    /// Raw contents of a file
    pub fn read_bytes(&self, path: impl Into<PathComponent>) -> FsResult<Bytes> {
        let (_, target) = self.resolve(path)?;
        let bytes = self.read_existing(&target)?;

        debug!(path = %self.shown(&target), size = bytes.len(), "Read file bytes");
        Ok(bytes)
    }

    fn read_existing(&self, target: &StdPath) -> FsResult<Bytes> {
        if let Some(stat) = self.lookup(target)? {
            if stat.is_directory() {
                return Err(FsError::WrongType {
                    path: target.to_path_buf(),
                    expected: "file",
                });
            }
        }

        self.driver
            .read_all(target)
            .map_err(|e| FsError::from_bridge(e, target))
    }

    // ------------------------------------------------------------------
    // Write
    // ------------------------------------------------------------------

    /// Write text to a file
    ///
    /// With `append` and [`ContentEncoding::Base64`] the stored text is
    /// decoded, the new text is added, and the whole file is rewritten.
    /// Stored content that cannot be decoded counts as empty. This
    /// read-modify-write is not atomic: concurrent writers to the same file
    /// can lose updates.
    pub fn write_file(
        &self,
        path: impl Into<PathComponent>,
        contents: &str,
        options: WriteOptions,
    ) -> FsResult<()> {
        let (_, target) = self.resolve(path)?;
        let encoding = options.encoding;

        if options.append && encoding == ContentEncoding::Base64 {
            self.prepare_target(&target, options.create)?;
            return self.rewrite_base64(&target, contents);
        }

        // Encode before touching the filesystem so bad input leaves no trace
        let line_width = if options.append {
            None
        } else {
            self.base64_line_width
        };
        let bytes = encoding.encode(contents, line_width)?;

        self.prepare_target(&target, options.create)?;
        if options.append {
            self.append_to(&target, &bytes)?;
        } else {
            self.overwrite(&target, &bytes)?;
        }

        debug!(
            path = %self.shown(&target),
            %encoding,
            append = options.append,
            size = bytes.len(),
            "Wrote file"
        );
        Ok(())
    }

    /// Write raw bytes to a file
    ///
    /// `options.encoding` is ignored; appends are byte-level.
    pub fn write_bytes(
        &self,
        path: impl Into<PathComponent>,
        contents: &[u8],
        options: WriteOptions,
    ) -> FsResult<()> {
        let (_, target) = self.resolve(path)?;

        self.prepare_target(&target, options.create)?;
        if options.append {
            self.append_to(&target, contents)?;
        } else {
            self.overwrite(&target, contents)?;
        }

        debug!(
            path = %self.shown(&target),
            append = options.append,
            size = contents.len(),
            "Wrote file bytes"
        );
        Ok(())
    }

    /// Existence gate shared by every write
    fn prepare_target(&self, target: &StdPath, create: bool) -> FsResult<()> {
        match self.lookup(target)? {
            Some(stat) if stat.is_directory() => Err(FsError::WrongType {
                path: target.to_path_buf(),
                expected: "file",
            }),
            Some(_) => Ok(()),
            None if create => self
                .driver
                .create_empty(target, false)
                .map_err(|e| FsError::from_bridge(e, target)),
            None => Err(FsError::NotFound(target.to_path_buf())),
        }
    }

    fn overwrite(&self, target: &StdPath, bytes: &[u8]) -> FsResult<()> {
        self.driver
            .overwrite(target, bytes)
            .map_err(|e| FsError::from_bridge(e, target))
    }

    fn append_to(&self, target: &StdPath, bytes: &[u8]) -> FsResult<()> {
        let mut handle = self
            .driver
            .open_for_append(target)
            .map_err(|e| FsError::from_bridge(e, target))?;

        let written = handle.seek_to_end().and_then(|_| handle.write(bytes));
        let closed = handle.close();

        written.map_err(|e| FsError::from_bridge(e, target))?;
        closed.map_err(|e| FsError::from_bridge(e, target))
    }

    fn rewrite_base64(&self, target: &StdPath, contents: &str) -> FsResult<()> {
        let existing = self
            .driver
            .read_all(target)
            .map_err(|e| FsError::from_bridge(e, target))
            .and_then(|bytes| ContentEncoding::Base64.decode(&bytes));

        let mut combined = match existing {
            Ok(text) => text,
            Err(err) => {
                warn!(
                    path = %self.shown(target),
                    error = %self.shown_error(&err, target),
                    "Existing content is not readable as base64, rewriting from empty"
                );
                String::new()
            }
        };
        combined.push_str(contents);

        let bytes = ContentEncoding::Base64.encode(&combined, self.base64_line_width)?;
        self.overwrite(target, &bytes)?;

        debug!(
            path = %self.shown(target),
            size = bytes.len(),
            "Rewrote base64 file with appended content"
        );
        Ok(())
    }

    // ------------------------------------------------------------------
    // Create / delete
    // ------------------------------------------------------------------

    /// Create an empty file
    ///
    /// Fails with `AlreadyExists` when anything is already at the path.
    pub fn touch(&self, path: impl Into<PathComponent>) -> FsResult<()> {
        let (_, target) = self.resolve(path)?;

        if self.lookup(&target)?.is_some() {
            return Err(FsError::AlreadyExists(target));
        }
        self.driver
            .create_empty(&target, false)
            .map_err(|e| FsError::from_bridge(e, &target))?;

        debug!(path = %self.shown(&target), "Touched file");
        Ok(())
    }

    /// Create a directory
    ///
    /// Fails with `AlreadyExists` whenever the leaf exists, for either value
    /// of `recursive`. Without `recursive` a missing parent is `NotFound`.
    pub fn mkdir(&self, path: impl Into<PathComponent>, recursive: bool) -> FsResult<()> {
        let (_, target) = self.resolve(path)?;

        if self.lookup(&target)?.is_some() {
            return Err(FsError::AlreadyExists(target));
        }
        self.driver
            .mkdir(&target, recursive)
            .map_err(|e| FsError::from_bridge(e, &target))?;

        debug!(path = %self.shown(&target), recursive, "Created directory");
        Ok(())
    }

    /// Whether any entry exists at the path
    pub fn exists(&self, path: impl Into<PathComponent>) -> bool {
        match self.resolve(path) {
            Ok((_, target)) => self.driver.exists(&target, false),
            Err(_) => false,
        }
    }

    /// Delete a file, or a directory with its whole subtree
    pub fn remove(&self, path: impl Into<PathComponent>) -> FsResult<()> {
        let (_, target) = self.resolve(path)?;

        self.driver
            .delete(&target)
            .map_err(|e| FsError::from_bridge(e, &target))?;

        debug!(path = %self.shown(&target), "Removed entry");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Move / copy
    // ------------------------------------------------------------------

    /// Move a file or directory tree, hidden entries included
    pub fn move_file(
        &self,
        src: impl Into<PathComponent>,
        dest: impl Into<PathComponent>,
    ) -> FsResult<()> {
        let (source, destination) = self.prepare_transfer(src, dest)?;

        self.driver
            .move_entry(&source, &destination)
            .map_err(|e| FsError::from_bridge(e, &destination))?;

        debug!(
            src = %self.shown(&source),
            dest = %self.shown(&destination),
            "Moved entry"
        );
        Ok(())
    }

    /// Copy a file or directory tree, hidden entries included
    pub fn copy_file(
        &self,
        src: impl Into<PathComponent>,
        dest: impl Into<PathComponent>,
    ) -> FsResult<()> {
        let (source, destination) = self.prepare_transfer(src, dest)?;

        self.driver
            .copy_entry(&source, &destination)
            .map_err(|e| FsError::from_bridge(e, &destination))?;

        debug!(
            src = %self.shown(&source),
            dest = %self.shown(&destination),
            "Copied entry"
        );
        Ok(())
    }

    /// Checks shared by move and copy
    ///
    /// The source must exist, the destination must not, the destination's
    /// parent must be a directory, and the destination may not lie inside
    /// the source.
    fn prepare_transfer(
        &self,
        src: impl Into<PathComponent>,
        dest: impl Into<PathComponent>,
    ) -> FsResult<(PathBuf, PathBuf)> {
        let (_, source) = self.resolve(src)?;
        let (_, destination) = self.resolve(dest)?;

        if self.lookup(&source)?.is_none() {
            return Err(FsError::NotFound(source));
        }
        if self.lookup(&destination)?.is_some() {
            return Err(FsError::AlreadyExists(destination));
        }
        if destination.starts_with(&source) {
            return Err(FsError::InvalidPath(format!(
                "cannot place {} inside itself",
                self.shown(&source)
            )));
        }

        let parent = destination
            .parent()
            .ok_or_else(|| FsError::InvalidPath("destination has no parent".to_string()))?;
        match self.lookup(parent)? {
            None => return Err(FsError::NotFound(parent.to_path_buf())),
            Some(stat) if !stat.is_directory() => {
                return Err(FsError::WrongType {
                    path: parent.to_path_buf(),
                    expected: "directory",
                })
            }
            Some(_) => {}
        }

        Ok((source, destination))
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    fn resolve(&self, path: impl Into<PathComponent>) -> FsResult<(PathComponent, PathBuf)> {
        let component = path.into();
        match component.canonical() {
            Some(canonical) => {
                let target = canonical.to_path_buf();
                Ok((component, target))
            }
            None => Err(FsError::InvalidPath(format!(
                "cannot resolve {:?}",
                component.raw().unwrap_or_default()
            ))),
        }
    }

    /// Stat that treats absence as `None`
    fn lookup(&self, target: &StdPath) -> FsResult<Option<NativeStat>> {
        match self.driver.stat(target) {
            Ok(stat) => Ok(Some(stat)),
            Err(err) if err.is_not_found() => Ok(None),
            Err(err) => Err(FsError::from_bridge(err, target)),
        }
    }

    fn shown(&self, path: &StdPath) -> String {
        display_path(path, self.redact_paths)
    }

    /// Error text for a log field, with `path` shortened like `shown`
    fn shown_error(&self, err: &dyn std::fmt::Display, path: &StdPath) -> String {
        let text = err.to_string();
        if !self.redact_paths {
            return text;
        }
        let full = path.to_string_lossy();
        if full.is_empty() {
            return text;
        }
        text.replace(full.as_ref(), &self.shown(path))
    }
}
