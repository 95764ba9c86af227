//! Metadata snapshots

use bridge_traits::{NativeFileType, NativeStat, HIDDEN_FILE_MARKER};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::path::PathComponent;

/// Type of a filesystem entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileType {
    /// A regular file
    File,
    /// A directory
    Directory,
    /// Anything else the platform reports (sockets, devices, ...)
    Unknown,
}

impl From<NativeFileType> for FileType {
    fn from(native: NativeFileType) -> Self {
        match native {
            NativeFileType::File => FileType::File,
            NativeFileType::Directory => FileType::Directory,
            NativeFileType::Other => FileType::Unknown,
        }
    }
}

/// Stats for one entry, taken at the moment of the call
///
/// The snapshot is not updated when the entry changes; query again for
/// fresh values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileProperty {
    /// Last path segment including the extension
    pub name: String,
    /// Text after the last `.` of the name
    pub extension: Option<String>,
    /// Lexically resolved absolute path
    pub absolute_path: PathComponent,
    /// Path with symbolic links resolved by the driver
    pub canonical_path: PathComponent,
    /// Creation time in epoch milliseconds, `None` where the platform cannot tell
    pub created_at: Option<i64>,
    /// Last modification time in epoch milliseconds
    pub modified_at: Option<i64>,
    /// Size in bytes
    pub size: Option<u64>,
    #[serde(rename = "type")]
    pub file_type: FileType,
}

impl FileProperty {
    pub(crate) fn from_stat(
        absolute_path: PathComponent,
        canonical_path: PathComponent,
        stat: NativeStat,
    ) -> Self {
        let name = absolute_path.name().unwrap_or_default().to_string();
        let extension = extension_of(&name);

        Self {
            name,
            extension,
            absolute_path,
            canonical_path,
            created_at: stat.created_at,
            modified_at: stat.modified_at,
            size: Some(stat.size),
            file_type: stat.file_type.into(),
        }
    }

    pub fn is_file(&self) -> bool {
        self.file_type == FileType::File
    }

    pub fn is_directory(&self) -> bool {
        self.file_type == FileType::Directory
    }

    /// Whether the name starts with the hidden-file marker
    pub fn is_hidden(&self) -> bool {
        self.name.starts_with(HIDDEN_FILE_MARKER)
    }

    pub fn created(&self) -> Option<DateTime<Utc>> {
        self.created_at.and_then(millis_to_datetime)
    }

    pub fn modified(&self) -> Option<DateTime<Utc>> {
        self.modified_at.and_then(millis_to_datetime)
    }
}

fn extension_of(name: &str) -> Option<String> {
    match name.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => Some(ext.to_string()),
        _ => None,
    }
}

fn millis_to_datetime(millis: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(millis).single()
}
