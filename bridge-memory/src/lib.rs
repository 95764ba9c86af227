//! In-Process Bridge Implementations
//!
//! This crate provides an in-memory implementation of the bridge traits
//! defined in `bridge-traits`. It behaves like a small POSIX-style
//! filesystem rooted at `/` and is useful for hosts without a writable
//! disk and for deterministic tests.
//!
//! # Implementations
//!
//! - `MemoryFileSystemDriver`: ordered-map backed `NativeDriver` that also
//!   resolves its own standard locations (`/contents`, `/caches`, `/tmp`)
//!
//! # Examples
//!
//! ```ignore
//! use bridge_memory::MemoryFileSystemDriver;
//! use bridge_traits::{LocationResolver, NativeDriver, StandardLocation};
//!
//! let fs = MemoryFileSystemDriver::new();
//! let caches = fs.resolve(StandardLocation::Caches)?;
//! fs.overwrite(&caches.join("hello.txt"), b"hello")?;
//! ```

#![warn(missing_docs)]

pub mod filesystem;

// Re-export commonly used types
pub use filesystem::MemoryFileSystemDriver;
