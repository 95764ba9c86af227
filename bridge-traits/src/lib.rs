//! # Host Bridge Traits
//!
//! Platform abstraction traits that must be implemented by each host platform.
//!
//! ## Overview
//!
//! This crate defines the contract between the filesystem core and
//! platform-specific implementations. Each trait represents a capability that
//! the core requires but that must be implemented differently per platform.
//!
//! ## Traits
//!
//! ### File System
//! - [`NativeDriver`](driver::NativeDriver) - Stat, list, read, overwrite, append, move, copy, delete
//! - [`AppendHandle`](driver::AppendHandle) - Scoped handle for byte-level appends
//! - [`LocationResolver`](location::LocationResolver) - Contents, caches and temporary directories
//!
//! ### Utilities
//! - [`Clock`](clock::Clock) - Time source for deterministic testing
//! - [`LoggerSink`](log::LoggerSink) - Forward structured logs to host logging
//!
//! ## Platform Requirements
//!
//! | Platform | Implementation Crate | Status |
//! |----------|---------------------|--------|
//! | Desktop  | `bridge-desktop`    | ✅ Available |
//! | In-process | `bridge-memory`   | ✅ Available |
//! | iOS      | TBD                 | 📋 Planned |
//! | Android  | TBD                 | 📋 Planned |
//!
//! ## Error Handling
//!
//! All bridge traits use the [`BridgeError`](error::BridgeError) type. Platform
//! implementations should:
//!
//! - Convert platform-specific errors to `BridgeError`
//! - Prefer the typed variants (`NotFound`, `AlreadyExists`, ...) over `Io`
//!   when the cause is known
//! - Include the offending path
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` so a driver can be shared by every
//! thread of the embedding application. Drivers keep no per-call state.
//!
//! ## Examples
//!
//! ### Implementing LocationResolver
//!
//! ```ignore
//! use bridge_traits::location::{LocationResolver, StandardLocation};
//! use bridge_traits::error::Result;
//!
//! pub struct AppContainer {
//!     root: PathBuf,
//! }
//!
//! impl LocationResolver for AppContainer {
//!     fn resolve(&self, location: StandardLocation) -> Result<PathBuf> {
//!         let dir = self.root.join(location.to_string());
//!         std::fs::create_dir_all(&dir)?;
//!         Ok(dir)
//!     }
//! }
//! ```

pub mod clock;
pub mod driver;
pub mod error;
pub mod location;
pub mod log;

pub use error::BridgeError;

// Re-export commonly used types
pub use driver::{
    entry_name, AppendHandle, NativeDriver, NativeFileType, NativeStat, HIDDEN_FILE_MARKER,
};
pub use location::{LocationResolver, StandardLocation};
pub use clock::{Clock, ManualClock, SystemClock};
pub use log::{ConsoleLogger, LogEntry, LogLevel, LoggerSink};
