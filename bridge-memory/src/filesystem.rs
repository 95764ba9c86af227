//! In-Process File System Driver
//!
//! This module provides a filesystem that lives entirely in memory. It
//! implements the `NativeDriver` and `LocationResolver` traits from
//! `bridge-traits`.
//!
//! # Architecture
//!
//! Entries are kept in a single ordered map keyed by normalized path:
//!
//! - **Key**: absolute path using forward slashes, root is `/`
//! - **Value**: entry kind (directory or file bytes) plus timestamps
//!
//! Because the map is ordered, the subtree of a directory is the contiguous
//! key range starting at `"{dir}/"`, which makes recursive delete, move and
//! copy a range scan.
//!
//! # Path Handling
//!
//! Backslashes are treated as separators, redundant separators and `.` are
//! dropped, and `..` pops one segment (clamped at the root).
//!
//! # Limitations
//!
//! - No symbolic links or hard links
//! - Path operations are case-sensitive
//! - Contents are lost when the driver is dropped

use bridge_traits::{
    clock::{Clock, SystemClock},
    driver::{entry_name, AppendHandle, NativeDriver, NativeFileType, NativeStat},
    error::{BridgeError, Result},
    location::{LocationResolver, StandardLocation},
};
use bytes::Bytes;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

const CONTENTS_DIR: &str = "/contents";
const CACHES_DIR: &str = "/caches";
const TEMPORARY_DIR: &str = "/tmp";

#[derive(Debug, Clone)]
enum EntryKind {
    Directory,
    File(Vec<u8>),
}

/// Entry stored in the map
#[derive(Debug, Clone)]
struct MemoryEntry {
    kind: EntryKind,
    /// Creation timestamp (Unix timestamp in milliseconds)
    created_at: i64,
    /// Modification timestamp (Unix timestamp in milliseconds)
    modified_at: i64,
}

impl MemoryEntry {
    fn directory(now: i64) -> Self {
        Self {
            kind: EntryKind::Directory,
            created_at: now,
            modified_at: now,
        }
    }

    fn file(data: Vec<u8>, now: i64) -> Self {
        Self {
            kind: EntryKind::File(data),
            created_at: now,
            modified_at: now,
        }
    }

    fn is_directory(&self) -> bool {
        matches!(self.kind, EntryKind::Directory)
    }
}

type EntryMap = BTreeMap<String, MemoryEntry>;

/// In-memory file system implementation
///
/// Clones share the same tree.
#[derive(Clone)]
pub struct MemoryFileSystemDriver {
    entries: Arc<RwLock<EntryMap>>,
    clock: Arc<dyn Clock>,
    report_creation_time: bool,
    open_handles: Arc<AtomicUsize>,
}

impl MemoryFileSystemDriver {
    /// Create an empty file system with the standard directories in place
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create an empty file system stamping entries with `clock`
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        let now = clock.now_millis();
        let mut entries = EntryMap::new();
        entries.insert("/".to_string(), MemoryEntry::directory(now));
        for dir in [CONTENTS_DIR, CACHES_DIR, TEMPORARY_DIR] {
            entries.insert(dir.to_string(), MemoryEntry::directory(now));
        }

        Self {
            entries: Arc::new(RwLock::new(entries)),
            clock,
            report_creation_time: true,
            open_handles: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Model a platform that cannot report creation time
    pub fn without_creation_time(mut self) -> Self {
        self.report_creation_time = false;
        self
    }

    /// Number of append handles that have not been closed or dropped yet
    pub fn open_handle_count(&self) -> usize {
        self.open_handles.load(Ordering::SeqCst)
    }

    /// Normalize a path to use forward slashes and resolve `.`/`..` segments
    fn normalize_path(path: &Path) -> String {
        let path_str = path.to_string_lossy();
        let normalized = path_str.replace('\\', "/");

        let mut parts: Vec<&str> = Vec::new();
        for segment in normalized.split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    parts.pop();
                }
                other => parts.push(other),
            }
        }

        if parts.is_empty() {
            "/".to_string()
        } else {
            format!("/{}", parts.join("/"))
        }
    }

    fn parent_key(key: &str) -> Option<String> {
        if key == "/" {
            return None;
        }
        match key.rsplit_once('/') {
            Some(("", _)) => Some("/".to_string()),
            Some((parent, _)) => Some(parent.to_string()),
            None => None,
        }
    }

    fn subtree_prefix(key: &str) -> String {
        if key == "/" {
            "/".to_string()
        } else {
            format!("{}/", key)
        }
    }

    /// Keys of `key` and everything below it
    fn subtree_keys(entries: &EntryMap, key: &str) -> Vec<String> {
        let prefix = Self::subtree_prefix(key);
        let mut keys = vec![key.to_string()];
        keys.extend(
            entries
                .range(prefix.clone()..)
                .take_while(|(k, _)| k.starts_with(&prefix))
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, _)| k.clone()),
        );
        keys
    }

    fn rebase(key: &str, from: &str, to: &str) -> String {
        if key == from {
            to.to_string()
        } else {
            let rest = &key[Self::subtree_prefix(from).len()..];
            format!("{}/{}", to.trim_end_matches('/'), rest)
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, EntryMap>> {
        self.entries
            .read()
            .map_err(|_| BridgeError::OperationFailed("memory filesystem lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, EntryMap>> {
        self.entries
            .write()
            .map_err(|_| BridgeError::OperationFailed("memory filesystem lock poisoned".into()))
    }

    fn now(&self) -> i64 {
        self.clock.now_millis()
    }

    /// Check that the parent of `key` exists and is a directory
    fn require_parent(entries: &EntryMap, key: &str) -> Result<()> {
        let Some(parent) = Self::parent_key(key) else {
            return Err(BridgeError::InvalidPath("the root has no parent".to_string()));
        };

        match entries.get(&parent) {
            Some(entry) if entry.is_directory() => Ok(()),
            Some(_) => Err(BridgeError::NotADirectory(PathBuf::from(parent))),
            None => Err(BridgeError::NotFound(PathBuf::from(parent))),
        }
    }

    /// Validate a move/copy and return the normalized (source, destination) keys
    fn check_transfer(entries: &EntryMap, src: &Path, dest: &Path) -> Result<(String, String)> {
        let src_key = Self::normalize_path(src);
        let dest_key = Self::normalize_path(dest);

        if !entries.contains_key(&src_key) {
            return Err(BridgeError::not_found(src));
        }
        if entries.contains_key(&dest_key) {
            return Err(BridgeError::already_exists(dest));
        }
        if dest_key.starts_with(&Self::subtree_prefix(&src_key)) {
            return Err(BridgeError::InvalidPath(format!(
                "cannot place {} inside itself",
                src_key
            )));
        }
        Self::require_parent(entries, &dest_key)?;

        Ok((src_key, dest_key))
    }
}

impl Default for MemoryFileSystemDriver {
    fn default() -> Self {
        Self::new()
    }
}

/// Append handle writing straight into the shared map
struct MemoryAppendHandle {
    entries: Arc<RwLock<EntryMap>>,
    clock: Arc<dyn Clock>,
    open_handles: Arc<AtomicUsize>,
    key: String,
    cursor: usize,
}

impl MemoryAppendHandle {
    fn with_contents<T>(&self, f: impl FnOnce(&mut MemoryEntry) -> Result<T>) -> Result<T> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| BridgeError::OperationFailed("memory filesystem lock poisoned".into()))?;
        let entry = entries
            .get_mut(&self.key)
            .ok_or_else(|| BridgeError::NotFound(PathBuf::from(&self.key)))?;
        f(entry)
    }
}

impl AppendHandle for MemoryAppendHandle {
    fn seek_to_end(&mut self) -> Result<u64> {
        let key = self.key.clone();
        let len = self.with_contents(|entry| match &entry.kind {
            EntryKind::File(data) => Ok(data.len()),
            EntryKind::Directory => Err(BridgeError::NotAFile(PathBuf::from(key))),
        })?;
        self.cursor = len;
        Ok(len as u64)
    }

    fn write(&mut self, data: &[u8]) -> Result<()> {
        let key = self.key.clone();
        let cursor = self.cursor;
        let now = self.clock.now_millis();

        self.with_contents(|entry| {
            let EntryKind::File(contents) = &mut entry.kind else {
                return Err(BridgeError::NotAFile(PathBuf::from(key)));
            };
            let end = cursor + data.len();
            if contents.len() < end {
                contents.resize(end, 0);
            }
            contents[cursor..end].copy_from_slice(data);
            entry.modified_at = now;
            Ok(())
        })?;

        self.cursor += data.len();
        Ok(())
    }

    fn close(self: Box<Self>) -> Result<()> {
        Ok(())
    }
}

impl Drop for MemoryAppendHandle {
    fn drop(&mut self) {
        self.open_handles.fetch_sub(1, Ordering::SeqCst);
    }
}

impl NativeDriver for MemoryFileSystemDriver {
    fn canonicalize(&self, path: &Path) -> Result<PathBuf> {
        Ok(PathBuf::from(Self::normalize_path(path)))
    }

    fn exists(&self, path: &Path, expect_directory: bool) -> bool {
        let key = Self::normalize_path(path);
        match self.read() {
            Ok(entries) => match entries.get(&key) {
                Some(entry) => !expect_directory || entry.is_directory(),
                None => false,
            },
            Err(_) => false,
        }
    }

    fn stat(&self, path: &Path) -> Result<NativeStat> {
        let entries = self.read()?;
        let entry = entries
            .get(&Self::normalize_path(path))
            .ok_or_else(|| BridgeError::not_found(path))?;

        let (file_type, size) = match &entry.kind {
            EntryKind::Directory => (NativeFileType::Directory, 0),
            EntryKind::File(data) => (NativeFileType::File, data.len() as u64),
        };

        Ok(NativeStat {
            file_type,
            size,
            created_at: self.report_creation_time.then_some(entry.created_at),
            modified_at: Some(entry.modified_at),
        })
    }

    fn list_children(&self, path: &Path) -> Result<Vec<String>> {
        let key = Self::normalize_path(path);
        let entries = self.read()?;

        match entries.get(&key) {
            Some(entry) if entry.is_directory() => {}
            Some(_) => return Err(BridgeError::NotADirectory(path.to_path_buf())),
            None => return Err(BridgeError::not_found(path)),
        }

        // Filter to direct children only
        let prefix = Self::subtree_prefix(&key);
        let children: Vec<String> = entries
            .range(prefix.clone()..)
            .take_while(|(k, _)| k.starts_with(&prefix))
            .map(|(k, _)| &k[prefix.len()..])
            .filter(|rest| !rest.is_empty() && !rest.contains('/'))
            .map(str::to_string)
            .collect();

        debug!(
            entry = %entry_name(Path::new(&key)),
            count = children.len(),
            "Listed directory"
        );
        Ok(children)
    }

    fn read_all(&self, path: &Path) -> Result<Bytes> {
        let entries = self.read()?;
        match entries.get(&Self::normalize_path(path)) {
            Some(MemoryEntry {
                kind: EntryKind::File(data),
                ..
            }) => Ok(Bytes::copy_from_slice(data)),
            Some(_) => Err(BridgeError::NotAFile(path.to_path_buf())),
            None => Err(BridgeError::not_found(path)),
        }
    }

    fn create_empty(&self, path: &Path, is_directory: bool) -> Result<()> {
        let key = Self::normalize_path(path);
        let now = self.now();
        let mut entries = self.write()?;

        if entries.contains_key(&key) {
            return Err(BridgeError::already_exists(path));
        }
        Self::require_parent(&entries, &key)?;

        let entry = if is_directory {
            MemoryEntry::directory(now)
        } else {
            MemoryEntry::file(Vec::new(), now)
        };
        entries.insert(key.clone(), entry);

        debug!(entry = %entry_name(Path::new(&key)), is_directory, "Created entry");
        Ok(())
    }

    fn open_for_append(&self, path: &Path) -> Result<Box<dyn AppendHandle>> {
        let key = Self::normalize_path(path);
        {
            let entries = self.read()?;
            match entries.get(&key) {
                Some(entry) if !entry.is_directory() => {}
                Some(_) => return Err(BridgeError::NotAFile(path.to_path_buf())),
                None => return Err(BridgeError::not_found(path)),
            }
        }

        self.open_handles.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MemoryAppendHandle {
            entries: Arc::clone(&self.entries),
            clock: Arc::clone(&self.clock),
            open_handles: Arc::clone(&self.open_handles),
            key,
            cursor: 0,
        }))
    }

    fn overwrite(&self, path: &Path, data: &[u8]) -> Result<()> {
        let key = Self::normalize_path(path);
        let now = self.now();
        let mut entries = self.write()?;

        match entries.get_mut(&key) {
            Some(entry) => match &mut entry.kind {
                EntryKind::File(contents) => {
                    *contents = data.to_vec();
                    entry.modified_at = now;
                }
                EntryKind::Directory => return Err(BridgeError::NotAFile(path.to_path_buf())),
            },
            None => {
                Self::require_parent(&entries, &key)?;
                entries.insert(key.clone(), MemoryEntry::file(data.to_vec(), now));
            }
        }

        debug!(entry = %entry_name(Path::new(&key)), size = data.len(), "Wrote file");
        Ok(())
    }

    fn delete(&self, path: &Path) -> Result<()> {
        let key = Self::normalize_path(path);
        if key == "/" {
            return Err(BridgeError::InvalidPath("refusing to delete the root".to_string()));
        }

        let mut entries = self.write()?;
        if !entries.contains_key(&key) {
            return Err(BridgeError::not_found(path));
        }

        let doomed = Self::subtree_keys(&entries, &key);
        for k in &doomed {
            entries.remove(k);
        }

        debug!(
            entry = %entry_name(Path::new(&key)),
            removed = doomed.len(),
            "Deleted entry"
        );
        Ok(())
    }

    fn move_entry(&self, src: &Path, dest: &Path) -> Result<()> {
        let mut entries = self.write()?;
        let (src_key, dest_key) = Self::check_transfer(&entries, src, dest)?;

        for key in Self::subtree_keys(&entries, &src_key) {
            if let Some(entry) = entries.remove(&key) {
                entries.insert(Self::rebase(&key, &src_key, &dest_key), entry);
            }
        }

        debug!(
            src = %entry_name(Path::new(&src_key)),
            dest = %entry_name(Path::new(&dest_key)),
            "Moved entry"
        );
        Ok(())
    }

    fn copy_entry(&self, src: &Path, dest: &Path) -> Result<()> {
        let now = self.now();
        let mut entries = self.write()?;
        let (src_key, dest_key) = Self::check_transfer(&entries, src, dest)?;

        let copies: Vec<(String, MemoryEntry)> = Self::subtree_keys(&entries, &src_key)
            .into_iter()
            .filter_map(|key| {
                entries.get(&key).map(|entry| {
                    let mut copy = entry.clone();
                    copy.created_at = now;
                    copy.modified_at = now;
                    (Self::rebase(&key, &src_key, &dest_key), copy)
                })
            })
            .collect();

        let count = copies.len();
        entries.extend(copies);

        debug!(
            src = %entry_name(Path::new(&src_key)),
            dest = %entry_name(Path::new(&dest_key)),
            count,
            "Copied entry"
        );
        Ok(())
    }

    fn mkdir(&self, path: &Path, recursive: bool) -> Result<()> {
        let key = Self::normalize_path(path);
        let now = self.now();
        let mut entries = self.write()?;

        if let Some(entry) = entries.get(&key) {
            return if recursive && entry.is_directory() {
                Ok(())
            } else {
                Err(BridgeError::already_exists(path))
            };
        }

        if !recursive {
            Self::require_parent(&entries, &key)?;
            entries.insert(key.clone(), MemoryEntry::directory(now));
            debug!(entry = %entry_name(Path::new(&key)), "Created directory");
            return Ok(());
        }

        let mut pending = vec![key.clone()];
        let mut cursor = Self::parent_key(&key);
        while let Some(ancestor) = cursor {
            match entries.get(&ancestor) {
                Some(entry) if entry.is_directory() => break,
                Some(_) => return Err(BridgeError::NotADirectory(PathBuf::from(ancestor))),
                None => {
                    cursor = Self::parent_key(&ancestor);
                    pending.push(ancestor);
                }
            }
        }

        for dir in pending.into_iter().rev() {
            entries.insert(dir, MemoryEntry::directory(now));
        }

        debug!(entry = %entry_name(Path::new(&key)), "Created directory tree");
        Ok(())
    }
}

impl LocationResolver for MemoryFileSystemDriver {
    fn resolve(&self, location: StandardLocation) -> Result<PathBuf> {
        let dir = PathBuf::from(match location {
            StandardLocation::Contents => CONTENTS_DIR,
            StandardLocation::Caches => CACHES_DIR,
            StandardLocation::Temporary => TEMPORARY_DIR,
        });

        if !self.exists(&dir, true) {
            self.mkdir(&dir, true)?;
        }
        Ok(dir)
    }
}
