//! # Core Filesystem
//!
//! Uniform filesystem API on top of an injected native driver.
//!
//! ## Overview
//!
//! The crate is split into a pure model and a façade:
//!
//! - [`PathComponent`] / [`Path`]: lexical path normalization, no I/O
//! - [`FileProperty`]: metadata snapshot of a single entry
//! - [`ContentEncoding`]: UTF-8, ASCII and base64 text codecs
//! - [`FileSystemService`]: every operation, driven through a
//!   [`NativeDriver`](bridge_traits::NativeDriver)
//!
//! All operations are synchronous and return [`FsResult`].
//!
//! ## Usage
//!
//! ```no_run
//! use core_fs::{ContentEncoding, FileSystemConfig, FileSystemService, WriteOptions};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Desktop defaults are injected by the `desktop-shims` feature
//! let fs = FileSystemService::new(FileSystemConfig::builder().build()?);
//!
//! let tmp = fs.temporary_directory()?;
//! let note = tmp.by_appending("note.txt").ok_or("unresolvable path")?;
//!
//! fs.write_file(&note, "hello", WriteOptions::new().create(true))?;
//! assert_eq!(fs.read_file(&note, ContentEncoding::Utf8)?, "hello");
//! # Ok(())
//! # }
//! ```

pub mod encoding;
pub mod error;
pub mod options;
pub mod path;
pub mod property;
pub mod service;

pub use encoding::ContentEncoding;
pub use error::{FsError, FsResult};
pub use options::WriteOptions;
pub use path::{Path, PathComponent};
pub use property::{FileProperty, FileType};
pub use service::FileSystemService;

pub use core_runtime::config::{FileSystemConfig, FileSystemConfigBuilder};
