//! # Desktop Bridge Implementations
//!
//! Default implementations of bridge traits for desktop platforms
//! (macOS, Windows, Linux).
//!
//! ## Overview
//!
//! This crate provides production-ready implementations of the filesystem
//! bridge traits using desktop-appropriate libraries:
//! - `NativeDriver` using `std::fs`
//! - `LocationResolver` using the `dirs` crate, with explicit overrides
//!
//! Creation timestamps come from `Metadata::created`, which some Linux
//! filesystems don't support; those entries report no creation time.
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::{DesktopLocationResolver, StdFileSystemDriver};
//! use bridge_traits::{LocationResolver, NativeDriver, StandardLocation};
//!
//! let driver = StdFileSystemDriver::new();
//! let locations = DesktopLocationResolver::new();
//! let caches = locations.resolve(StandardLocation::Caches)?;
//! let names = driver.list_children(&caches)?;
//! ```

mod filesystem;
mod locations;

pub use filesystem::StdFileSystemDriver;
pub use locations::DesktopLocationResolver;
